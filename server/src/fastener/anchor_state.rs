use festoon_shared::WorldKey;

use crate::key_generator::ConnectionKey;

/// Per-anchor persisted record: the anchor's outgoing connections and the
/// world it currently resides in.
///
/// Only the owning [`Fastener`](super::Fastener) (through the registry) and
/// the tick commit phase mutate it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnchorState {
    connections: Vec<ConnectionKey>,
    world: Option<WorldKey>,
}

impl AnchorState {
    pub fn new(world: Option<WorldKey>) -> Self {
        Self {
            connections: Vec::new(),
            world,
        }
    }

    /// Connections in creation order.
    pub fn connections(&self) -> &[ConnectionKey] {
        &self.connections
    }

    pub fn contains(&self, connection: &ConnectionKey) -> bool {
        self.connections.contains(connection)
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn world(&self) -> Option<WorldKey> {
        self.world
    }

    pub(crate) fn set_world(&mut self, world: Option<WorldKey>) {
        self.world = world;
    }

    pub(crate) fn push(&mut self, connection: ConnectionKey) {
        if !self.contains(&connection) {
            self.connections.push(connection);
        }
    }

    /// Returns whether the connection was present.
    pub(crate) fn remove(&mut self, connection: &ConnectionKey) -> bool {
        let before = self.connections.len();
        self.connections.retain(|key| key != connection);
        before != self.connections.len()
    }
}
