use festoon_shared::{Compound, Tag, WorldKey};

use crate::{
    connection::{serialize_connection, serialize_site},
    fastener::{AnchorSite, Fastener, Fasteners},
    key_generator::{ConnectionKey, FastenerKey},
};

const SITE: &str = "Site";
const WORLD: &str = "World";
const CONNECTIONS: &str = "Connections";
const REMOVED: &str = "Removed";

/// Full state of one anchor as broadcast to observers.
#[derive(Clone, Debug, PartialEq)]
pub struct FastenerSnapshot {
    pub key: FastenerKey,
    pub site: AnchorSite,
    pub world: Option<WorldKey>,
    /// Keys of the connections the anchor holds, in creation order
    pub connection_keys: Vec<ConnectionKey>,
    /// Serialized form of the same connections
    pub connections: Vec<Compound>,
    /// Set once, on the snapshot announcing the anchor is gone
    pub removed: bool,
}

impl FastenerSnapshot {
    pub fn capture(fastener: &Fastener, fasteners: &Fasteners) -> Self {
        let (connection_keys, connections) = fastener
            .state()
            .connections()
            .iter()
            .filter_map(|key| fasteners.connection(key))
            .map(|connection| (connection.key(), serialize_connection(connection)))
            .unzip();
        Self {
            key: fastener.key(),
            site: *fastener.site(),
            world: fastener.world(),
            connection_keys,
            connections,
            removed: false,
        }
    }

    pub fn removed(fastener: &Fastener) -> Self {
        Self {
            key: fastener.key(),
            site: *fastener.site(),
            world: fastener.world(),
            connection_keys: Vec::new(),
            connections: Vec::new(),
            removed: true,
        }
    }
}

pub fn serialize_fastener(snapshot: &FastenerSnapshot) -> Compound {
    let mut record = Compound::new();
    record.insert(SITE, serialize_site(&snapshot.site));
    if let Some(world) = snapshot.world {
        record.insert(WORLD, Tag::Long(i64::from(world.0)));
    }
    record.insert(
        CONNECTIONS,
        Tag::List(
            snapshot
                .connections
                .iter()
                .cloned()
                .map(Tag::Compound)
                .collect(),
        ),
    );
    if snapshot.removed {
        record.insert(REMOVED, Tag::Byte(1));
    }
    record
}
