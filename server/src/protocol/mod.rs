mod establishment;
mod fence_use;

pub use establishment::{ConnectionEstablishment, Phase, Rejection, UseContext, UseOutcome};
pub use fence_use::{fence_use_rule, FenceUse};
