//! Handlers 模块

pub mod dataset;
pub mod health;
pub mod metrics;
pub mod power;
pub mod snapshot;
pub mod timeline;

pub use dataset::*;
pub use health::*;
pub use metrics::*;
pub use power::*;
pub use snapshot::*;
pub use timeline::*;
