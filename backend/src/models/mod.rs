//! Domain models for the production line

pub mod event;
pub mod line;
pub mod station;
pub mod work_item;

// Re-exports
pub use event::{Event, EventLog};
pub use line::{ProductionLine, Routed};
pub use station::{StartOutcome, Station, StationStatus};
pub use work_item::{ItemStatus, WorkItem};
