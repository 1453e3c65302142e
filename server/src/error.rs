use thiserror::Error;

use festoon_shared::{BlockPos, PayloadError, WorldKey};

/// Why an anchor declined to take its side of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// Both endpoints are the same anchor
    SelfConnection,
    /// The endpoints do not reside in the world the bind was requested in
    WorldMismatch,
    /// The anchor already holds as many connections as it may
    Capacity,
}

impl std::fmt::Display for Refusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Refusal::SelfConnection => "an anchor cannot connect to itself",
            Refusal::WorldMismatch => "the endpoints are in different worlds",
            Refusal::Capacity => "the anchor has no room for another connection",
        };
        f.write_str(reason)
    }
}

/// Errors that can occur while binding, re-binding or releasing connections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// The payload handed to a bind does not have the shape of its connection type
    #[error(transparent)]
    InvalidPayloadKind(#[from] PayloadError),

    /// A fence post already carries a decoration that is not one of our anchors
    #[error("Fence at {pos:?} in {world:?} is occupied by another decoration")]
    SiteOccupied { world: WorldKey, pos: BlockPos },

    /// An endpoint's host object is unavailable or vanished mid-bind
    #[error("Connection could not be created: {reason}")]
    ConnectionCreationFailed { reason: String },

    /// The target side refused the bind. The source side has been rolled back.
    #[error("Target anchor refused the connection: {reason}")]
    TargetRefused { reason: Refusal },

    /// The anchor does not hold the given connection
    #[error("Connection not found on the anchor")]
    ConnectionNotFound,

    /// A persisted connection could not be read back
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Errors raised while reading a persisted connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A required field is absent or has the wrong type
    #[error("Persisted connection is missing its `{field}` field")]
    MissingField { field: &'static str },

    #[error("Unknown connection type `{name}`")]
    UnknownConnectionType { name: String },

    #[error("Unknown anchor kind `{name}`")]
    UnknownAnchorKind { name: String },
}
