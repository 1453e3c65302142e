//! # Festoon Server
//! The binding core of decorative connections: anchors that hold cords, the
//! protocol that strings a cord between two of them, and the per-tick upkeep
//! that keeps both ends consistent and observers informed.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod host;
pub mod shared {
    pub use festoon_shared::{
        BlockPos, Compound, ConnectionType, DyeColor, Facing, Hand, Hands, ItemKind, ItemStack,
        PlayerKey, StateIntegrityGuard, Tag, WorldKey,
    };
}

mod connection;
mod error;
mod fastener;
mod key_generator;
mod protocol;
mod server;
mod tick;

pub use connection::{
    deserialize_connection, deserialize_site, serialize_connection, serialize_site, Connection,
    ConnectionRecord, Endpoint,
};
pub use error::{CodecError, ConnectError, Refusal};
pub use fastener::{AnchorSite, AnchorState, Fastener, FastenerKind, Fasteners, Lookup};
pub use key_generator::{ConnectionKey, FastenerKey};
pub use protocol::{
    fence_use_rule, ConnectionEstablishment, FenceUse, Phase, Rejection, UseContext, UseOutcome,
};
pub use server::{FestoonServer, ServerConfig};
pub use tick::{serialize_fastener, FastenerSnapshot, StepReport, TickSynchronizer};
