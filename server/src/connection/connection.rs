use festoon_shared::{keys, Compound, ConnectionType, ItemKind, ItemStack, Payload, PayloadError};

use crate::{
    fastener::AnchorSite,
    key_generator::{ConnectionKey, FastenerKey},
};

/// One side of a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub key: FastenerKey,
    pub site: AnchorSite,
}

/// A cord joining two anchors. Co-owned by both endpoints' states: it lives
/// in the registry for as long as at least one of them references it.
#[derive(Clone, Debug)]
pub struct Connection {
    key: ConnectionKey,
    kind: ConnectionType,
    fastener: Endpoint,
    destination: Endpoint,
    logic: Compound,
    payload: Payload,
    drop_on_break: bool,
    age: u32,
}

impl Connection {
    pub(crate) fn new(
        key: ConnectionKey,
        kind: ConnectionType,
        fastener: Endpoint,
        destination: Endpoint,
        logic: Compound,
        is_reconnect: bool,
    ) -> Result<Self, PayloadError> {
        let payload = Payload::from_record(kind, Some(&logic))?;
        Ok(Self {
            key,
            kind,
            fastener,
            destination,
            logic,
            payload,
            drop_on_break: !is_reconnect,
            age: 0,
        })
    }

    pub fn key(&self) -> ConnectionKey {
        self.key
    }

    pub fn kind(&self) -> ConnectionType {
        self.kind
    }

    /// The owning endpoint.
    pub fn fastener(&self) -> &Endpoint {
        &self.fastener
    }

    pub fn destination(&self) -> &Endpoint {
        &self.destination
    }

    pub fn logic(&self) -> &Compound {
        &self.logic
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn drop_on_break(&self) -> bool {
        self.drop_on_break
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn captured_color(&self) -> Option<&str> {
        self.logic.get_string(keys::CAPTURED_COLOR)
    }

    pub fn captured_rgb(&self) -> Option<i32> {
        self.logic.get_int(keys::CAPTURED_RGB)
    }

    pub fn has_endpoint(&self, key: &FastenerKey) -> bool {
        self.fastener.key == *key || self.destination.key == *key
    }

    /// The endpoint across from `key`, if `key` is one of them.
    pub fn other_end(&self, key: &FastenerKey) -> Option<&Endpoint> {
        if self.fastener.key == *key {
            Some(&self.destination)
        } else if self.destination.key == *key {
            Some(&self.fastener)
        } else {
            None
        }
    }

    /// Still waiting for its second click: the destination is a player.
    pub fn is_pending(&self) -> bool {
        matches!(self.destination.site, AnchorSite::Player(_))
    }

    /// Whether `stack` could have produced this connection. The persisted
    /// logic must be a partial match of the stack's payload; an empty logic
    /// only matches a stack without one.
    pub fn matches_stack(&self, stack: &ItemStack) -> bool {
        if stack.connection_type() != Some(self.kind) {
            return false;
        }
        match stack.tag.as_ref().filter(|tag| !tag.is_empty()) {
            None => self.logic.is_empty(),
            Some(tag) => !self.logic.is_empty() && self.logic.matches_partial(tag),
        }
    }

    /// The item dropped when the connection is broken.
    pub fn to_stack(&self) -> ItemStack {
        ItemStack::with_tag(ItemKind::Connection(self.kind), 1, self.logic.clone())
    }

    pub(crate) fn set_destination(&mut self, destination: Endpoint) {
        self.destination = destination;
    }

    pub(crate) fn replace_logic(&mut self, logic: Compound, payload: Payload) {
        self.logic = logic;
        self.payload = payload;
    }

    pub(crate) fn set_age(&mut self, age: u32) {
        self.age = age;
    }

    pub(crate) fn advance_age(&mut self) {
        self.age = self.age.wrapping_add(1);
    }
}
