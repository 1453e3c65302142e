//! # Festoon Shared
//! Persisted records, dye colors, connection payloads and the integrity guard
//! shared between the festoon server and its hosts.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod color;
mod connection;
mod integrity;
mod item;
mod record;
mod types;

pub use color::{channels, DyeColor};
pub use connection::{
    connection_type::ConnectionType,
    error::PayloadError,
    keys,
    pattern::{
        canonical_payload, canonical_record, DEFAULT_LIGHT, DEFAULT_PENNANT, DEFAULT_STRING,
        HANGING_LIGHTS_LENGTH, PENNANT_BUNTING_LENGTH,
    },
    payload::{Element, Payload},
    styled_text::StyledText,
};
pub use integrity::{
    fallback::{resolve as resolve_fallback_color, ColorSource, FallbackColor},
    guard::{Inspection, StateIntegrityGuard},
};
pub use item::{Hands, ItemKind, ItemStack};
pub use record::{Compound, Tag};
pub use types::{BlockPos, Facing, Hand, PlayerKey, Tick, WorldKey};
