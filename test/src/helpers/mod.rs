pub mod observer;
pub mod test_host;

pub use observer::RecordingObserver;
pub use stacks::{
    captured_only, connection_stack, init_logging, leash, stripped_stack, use_on, PLAYER, WORLD,
};
pub use test_host::TestHost;
