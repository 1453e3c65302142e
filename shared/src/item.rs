use crate::{connection::connection_type::ConnectionType, record::Compound};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A cord item that places a connection of the given type
    Connection(ConnectionType),
    /// A generic leash-type tool
    Leash,
    Other(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemStack {
    pub kind: ItemKind,
    pub count: u32,
    pub tag: Option<Compound>,
}

impl ItemStack {
    pub fn new(kind: ItemKind, count: u32) -> Self {
        Self {
            kind,
            count,
            tag: None,
        }
    }

    pub fn with_tag(kind: ItemKind, count: u32, tag: Compound) -> Self {
        Self {
            kind,
            count,
            tag: Some(tag),
        }
    }

    pub fn empty() -> Self {
        Self::new(ItemKind::Other("air".to_string()), 0)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn connection_type(&self) -> Option<ConnectionType> {
        match self.kind {
            ItemKind::Connection(kind) if !self.is_empty() => Some(kind),
            _ => None,
        }
    }

    pub fn is_connection_item(&self) -> bool {
        self.connection_type().is_some()
    }

    pub fn is_leash(&self) -> bool {
        !self.is_empty() && self.kind == ItemKind::Leash
    }

    pub fn shrink(&mut self, amount: u32) {
        self.count = self.count.saturating_sub(amount);
    }

    pub fn tag_mut(&mut self) -> &mut Compound {
        self.tag.get_or_insert_with(Compound::new)
    }
}

/// The two stacks an acting player holds.
#[derive(Clone, Debug, PartialEq)]
pub struct Hands {
    pub main: ItemStack,
    pub off: ItemStack,
}

impl Hands {
    pub fn new(main: ItemStack, off: ItemStack) -> Self {
        Self { main, off }
    }

    pub fn main_only(main: ItemStack) -> Self {
        Self::new(main, ItemStack::empty())
    }
}
