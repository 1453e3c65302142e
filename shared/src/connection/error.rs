use thiserror::Error;

use super::connection_type::ConnectionType;

/// Errors raised while reading a persisted connection payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The payload's structure does not match the shape its connection type requires
    #[error("Payload for {kind} connection has a missing or malformed `{field}` field")]
    InvalidPayloadKind {
        kind: ConnectionType,
        field: &'static str,
    },
}

impl PayloadError {
    pub fn kind(&self) -> ConnectionType {
        match self {
            PayloadError::InvalidPayloadKind { kind, .. } => *kind,
        }
    }
}
