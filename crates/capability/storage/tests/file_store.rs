use domain::DeviceStatus;
use grid_storage::{
    DatasetStore, FileDatasetStore, StorageError, TopologyIssue, load_dataset, parse_topology,
    validate_topology,
};
use std::path::PathBuf;

const TOPOLOGY: &str = r#"{
    "infrastructure_hierarchy": {
        "level_1_power_plants": [{"id": "P1", "coordinates": [147.0, -35.0]}],
        "level_2_substations": [{"id": "S1", "coordinates": [147.1, -35.1], "status": "high_load"}],
        "level_3_transformers": [],
        "level_4_communication_towers": []
    },
    "hierarchical_power_cables": [
        {"cable_id": "C1", "from": "P1", "to": "S1", "from_level": 1, "to_level": 2}
    ]
}"#;

const STATUS: &str = r#"{
    "infra_status": {
        "S1": [{"time_start": "20221024_000000", "time_end": "20221024_060000", "risk_level": 3, "info": "inundated"}]
    }
}"#;

const PRECIPITATION: &str = r#"[
    {"coordinates": [147.0, -35.0], "precipitation": 0},
    {"coordinates": [147.1, -35.1], "precipitation": 12.5, "station": "Wagga"}
]"#;

fn scratch_dir(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "grid-storage-{}-{}-{}",
        name,
        std::process::id(),
        nanos
    ));
    std::fs::create_dir_all(&dir).expect("mkdir");
    dir
}

#[tokio::test]
async fn file_store_loads_all_documents() {
    let dir = scratch_dir("load");
    std::fs::write(dir.join("infra_meta.json"), TOPOLOGY).expect("write");
    std::fs::write(dir.join("infra_status.json"), STATUS).expect("write");
    std::fs::write(dir.join("precipitation.json"), PRECIPITATION).expect("write");
    let store = FileDatasetStore::new(
        dir.join("infra_meta.json"),
        dir.join("infra_status.json"),
        dir.join("precipitation.json"),
    );

    let topology = store.load_topology().await.expect("topology");
    assert_eq!(
        topology.infrastructure_hierarchy.level_2_substations[0].status,
        DeviceStatus::Warning
    );
    let status = store.load_status().await.expect("status");
    assert_eq!(status.infra_status["S1"][0].info.as_deref(), Some("inundated"));

    let points = store.load_precipitation().await.expect("precipitation");
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].precipitation, 12.5);
    assert_eq!(points[0].extra.get("station"), Some(&serde_json::json!("Wagga")));

    let dataset = load_dataset(&store).await.expect("dataset");
    assert!(dataset.topology.is_some());
    assert!(dataset.status.is_some());
    assert_eq!(dataset.precipitation.len(), 1);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn missing_files_degrade_to_empty_dataset() {
    let dir = scratch_dir("missing");
    let store = FileDatasetStore::new(
        dir.join("nope.json"),
        dir.join("nope.json"),
        dir.join("nope.json"),
    );
    let err = store.load_topology().await.expect_err("missing");
    assert!(matches!(err, StorageError::Io { .. }));

    let dataset = load_dataset(&store).await.expect("degraded dataset");
    assert!(dataset.topology.is_none());
    assert!(dataset.status.is_none());
    assert!(dataset.precipitation.is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn malformed_topology_fails_dataset_load() {
    let dir = scratch_dir("malformed");
    std::fs::write(
        dir.join("infra_meta.json"),
        r#"{"infrastructure_hierarchy": {"level_1_power_plants": []}, "hierarchical_power_cables": []}"#,
    )
    .expect("write");
    std::fs::write(dir.join("infra_status.json"), STATUS).expect("write");
    let store = FileDatasetStore::new(
        dir.join("infra_meta.json"),
        dir.join("infra_status.json"),
        dir.join("precipitation.json"),
    );

    let err = load_dataset(&store).await.expect_err("structure");
    assert!(matches!(err, StorageError::Structure { document: "topology", .. }));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unrecognized_values_stay_local() {
    let payload = r#"{
        "infrastructure_hierarchy": {
            "level_1_power_plants": [{"id": "P1", "coordinates": [0, 0], "status": "maintenance"}],
            "level_2_substations": [{"id": "S1", "coordinates": [1, 1], "risk_level": "n/a"}],
            "level_3_transformers": [],
            "level_4_communication_towers": []
        },
        "hierarchical_power_cables": [
            {"cable_id": "C1", "from": "P1", "to": "S1", "cable_type": "feeder"}
        ]
    }"#;
    let topology = parse_topology(payload).expect("parse");
    assert_eq!(
        topology.infrastructure_hierarchy.level_1_power_plants[0].status,
        DeviceStatus::Operational
    );
    assert_eq!(topology.infrastructure_hierarchy.level_2_substations[0].risk_level, 1);

    let status = grid_storage::parse_status(
        r#"{"infra_status": {"S1": [{"time_start": "20221024_000000", "time_end": "20221024_060000", "risk_level": 3.0}]}}"#,
    )
    .expect("status");
    assert_eq!(status.infra_status["S1"][0].risk_level, Some(3));
}

#[test]
fn missing_hierarchy_level_is_structural_error() {
    let payload = r#"{
        "infrastructure_hierarchy": {
            "level_1_power_plants": [],
            "level_2_substations": [],
            "level_3_transformers": []
        },
        "hierarchical_power_cables": []
    }"#;
    let err = parse_topology(payload).expect_err("structure");
    assert!(matches!(err, StorageError::Structure { document: "topology", .. }));
    assert!(err.to_string().contains("level_4_communication_towers"));
}

#[test]
fn validation_reports_inconsistencies() {
    let payload = r#"{
        "infrastructure_hierarchy": {
            "level_1_power_plants": [{"id": "P1", "coordinates": [0, 0]}],
            "level_2_substations": [{"id": "S1", "coordinates": [1, 1]}],
            "level_3_transformers": [{"id": "P1", "coordinates": [2, 2]}],
            "level_4_communication_towers": []
        },
        "hierarchical_power_cables": [
            {"cable_id": "C1", "from": "P1", "to": "S1", "from_level": 1, "to_level": 3},
            {"cable_id": "C2", "from": "S1", "to": "GHOST"}
        ]
    }"#;
    let topology = parse_topology(payload).expect("parse");
    let issues = validate_topology(&topology);
    assert_eq!(issues.len(), 3);
    assert!(matches!(issues[0], TopologyIssue::DuplicateId { .. }));
    assert!(matches!(issues[1], TopologyIssue::LevelMismatch { .. }));
    assert_eq!(
        issues[2].to_string(),
        "cable C2 references unknown device GHOST"
    );
}
