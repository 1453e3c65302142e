mod anchor_state;
#[allow(clippy::module_inception)]
mod fastener;
mod fasteners;

pub use anchor_state::AnchorState;
pub use fastener::{AnchorSite, Fastener, FastenerKind};
pub use fasteners::{Fasteners, Lookup};

pub(crate) use fastener::SiteIndex;
