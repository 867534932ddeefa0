use domain::{StatusDocument, Topology};
use grid_storage::{DatasetStore, InMemoryDatasetStore, PrecipitationPoint, StorageError};

#[tokio::test]
async fn in_memory_store_round_trips_documents() {
    let store = InMemoryDatasetStore::new()
        .with_topology(Topology::default())
        .with_status(StatusDocument::default());
    store.set_precipitation(vec![
        PrecipitationPoint {
            coordinates: [147.0, -35.0],
            precipitation: 0.0,
            extra: Default::default(),
        },
        PrecipitationPoint {
            coordinates: [147.1, -35.1],
            precipitation: 3.0,
            extra: Default::default(),
        },
    ]);

    assert_eq!(store.load_topology().await.expect("topology"), Topology::default());
    assert!(store.load_status().await.expect("status").infra_status.is_empty());
    assert_eq!(store.load_precipitation().await.expect("points").len(), 1);
}

#[tokio::test]
async fn in_memory_store_reports_missing_topology() {
    let store = InMemoryDatasetStore::new();
    let err = store.load_topology().await.expect_err("missing");
    assert!(matches!(err, StorageError::NotAvailable("topology")));
    assert_eq!(err.to_string(), "topology not available");
}
