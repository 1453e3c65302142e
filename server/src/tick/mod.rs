mod snapshot;
mod synchronizer;

pub use snapshot::{serialize_fastener, FastenerSnapshot};
pub use synchronizer::{StepReport, TickSynchronizer};
