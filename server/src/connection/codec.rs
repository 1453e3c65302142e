//! Persisted form of connections and anchor sites.

use festoon_shared::{BlockPos, Compound, ConnectionType, Facing, PlayerKey, Tag, WorldKey};

use crate::{error::CodecError, fastener::AnchorSite};

use super::connection::Connection;

const TYPE: &str = "Type";
const FASTENER: &str = "Fastener";
const DESTINATION: &str = "Destination";
const LOGIC: &str = "Logic";
const AGE: &str = "Age";

const SITE_KIND: &str = "Kind";
const SITE_WORLD: &str = "World";
const SITE_X: &str = "X";
const SITE_Y: &str = "Y";
const SITE_Z: &str = "Z";
const SITE_FACING: &str = "Facing";
const SITE_PLAYER: &str = "Player";

const KIND_BLOCK: &str = "block";
const KIND_PLAYER: &str = "player";
const KIND_FENCE: &str = "fence";

/// A connection as read back from persistence, not yet bound to live anchors.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionRecord {
    pub kind: ConnectionType,
    pub fastener: AnchorSite,
    pub destination: AnchorSite,
    /// The payload exactly as stored. It may have been stripped.
    pub logic: Compound,
    pub age: u32,
}

pub fn serialize_connection(connection: &Connection) -> Compound {
    let mut record = Compound::new();
    record.insert(TYPE, connection.kind().name());
    record.insert(FASTENER, serialize_site(&connection.fastener().site));
    record.insert(DESTINATION, serialize_site(&connection.destination().site));
    record.insert(LOGIC, connection.logic().clone());
    record.insert(AGE, i64::from(connection.age()));
    record
}

/// Reads a connection back. A missing `Logic` is tolerated and read as an
/// empty record, since that is exactly what a stripped save looks like; the
/// guard deals with it when the connection is restored.
pub fn deserialize_connection(record: &Compound) -> Result<ConnectionRecord, CodecError> {
    let name = record
        .get_string(TYPE)
        .ok_or(CodecError::MissingField { field: TYPE })?;
    let kind = ConnectionType::from_name(name).ok_or_else(|| CodecError::UnknownConnectionType {
        name: name.to_string(),
    })?;
    let fastener = record
        .get_compound(FASTENER)
        .ok_or(CodecError::MissingField { field: FASTENER })
        .and_then(deserialize_site)?;
    let destination = record
        .get_compound(DESTINATION)
        .ok_or(CodecError::MissingField { field: DESTINATION })
        .and_then(deserialize_site)?;
    let logic = record.get_compound(LOGIC).cloned().unwrap_or_default();
    let age = record
        .get_long(AGE)
        .and_then(|age| u32::try_from(age).ok())
        .unwrap_or(0);

    Ok(ConnectionRecord {
        kind,
        fastener,
        destination,
        logic,
        age,
    })
}

pub fn serialize_site(site: &AnchorSite) -> Compound {
    let mut record = Compound::new();
    match site {
        AnchorSite::Block { world, pos, facing } => {
            record.insert(SITE_KIND, KIND_BLOCK);
            write_position(&mut record, *world, *pos);
            record.insert(SITE_FACING, facing.name());
        }
        AnchorSite::Player(player) => {
            record.insert(SITE_KIND, KIND_PLAYER);
            record.insert(SITE_PLAYER, Tag::Long(player.0 as i64));
        }
        AnchorSite::Fence { world, pos } => {
            record.insert(SITE_KIND, KIND_FENCE);
            write_position(&mut record, *world, *pos);
        }
    }
    record
}

pub fn deserialize_site(record: &Compound) -> Result<AnchorSite, CodecError> {
    let kind = record
        .get_string(SITE_KIND)
        .ok_or(CodecError::MissingField { field: SITE_KIND })?;
    match kind {
        KIND_BLOCK => {
            let (world, pos) = read_position(record)?;
            let facing = record
                .get_string(SITE_FACING)
                .and_then(Facing::from_name)
                .ok_or(CodecError::MissingField { field: SITE_FACING })?;
            Ok(AnchorSite::Block { world, pos, facing })
        }
        KIND_PLAYER => {
            let player = record
                .get_long(SITE_PLAYER)
                .ok_or(CodecError::MissingField { field: SITE_PLAYER })?;
            Ok(AnchorSite::Player(PlayerKey(player as u64)))
        }
        KIND_FENCE => {
            let (world, pos) = read_position(record)?;
            Ok(AnchorSite::Fence { world, pos })
        }
        other => Err(CodecError::UnknownAnchorKind {
            name: other.to_string(),
        }),
    }
}

fn write_position(record: &mut Compound, world: WorldKey, pos: BlockPos) {
    record.insert(SITE_WORLD, Tag::Long(i64::from(world.0)));
    record.insert(SITE_X, pos.x);
    record.insert(SITE_Y, pos.y);
    record.insert(SITE_Z, pos.z);
}

fn read_position(record: &Compound) -> Result<(WorldKey, BlockPos), CodecError> {
    let world = record
        .get_long(SITE_WORLD)
        .and_then(|world| u32::try_from(world).ok())
        .ok_or(CodecError::MissingField { field: SITE_WORLD })?;
    let int = |field: &'static str| {
        record
            .get_int(field)
            .ok_or(CodecError::MissingField { field })
    };
    Ok((
        WorldKey(world),
        BlockPos::new(int(SITE_X)?, int(SITE_Y)?, int(SITE_Z)?),
    ))
}
