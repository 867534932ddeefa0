//! 电网洪涝韧性领域模型：四级基础设施拓扑、异常时间段与时间步。

pub mod status;
pub mod timestep;
pub mod topology;

pub use status::{AnomalyInterval, DeviceStatus, ResolvedStatus, StatusDocument, StatusMap};
pub use timestep::{Timestep, WATERDEPTH_PREFIX};
pub use topology::{
    Attributes, Cable, CableType, CommunicationTower, Coordinates, DeviceRef, HierarchyLevel,
    InfrastructureHierarchy, PowerPlant, Rating, Substation, Topology, Transformer,
};
