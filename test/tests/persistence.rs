/// Saving connections and binding them again on a fresh server, including
/// saves whose payloads were stripped on the way.

use festoon_server::{
    deserialize_connection, serialize_fastener, AnchorSite, CodecError, FastenerSnapshot,
    FestoonServer, ServerConfig, UseOutcome,
};
use festoon_shared::{keys, BlockPos, Compound, ConnectionType, Facing, Hands, Tag};
use festoon_test::{connection_stack, init_logging, use_on, TestHost, PLAYER, WORLD};

const FENCE: BlockPos = BlockPos::new(5, 64, 5);
const GROUND: BlockPos = BlockPos::new(0, 63, 0);

fn strung_server() -> FestoonServer {
    let mut server = FestoonServer::new(ServerConfig::default());
    server.player_join(PLAYER, WORLD, &mut []);
    let mut host = TestHost::new()
        .with_placeable(WORLD, GROUND.offset(Facing::Up))
        .with_fence(WORLD, FENCE);
    let mut hands = Hands::main_only(connection_stack(
        ConnectionType::PennantBunting,
        0xFFFF00,
        4,
    ));
    server.use_item(&mut host, use_on(GROUND, Facing::Up), &mut hands);
    let outcome = server.use_item(&mut host, use_on(FENCE, Facing::Up), &mut hands);
    assert!(matches!(outcome, UseOutcome::Bound { reconnected: true, .. }));
    server
}

fn fresh_server_with_anchors() -> FestoonServer {
    let mut server = FestoonServer::new(ServerConfig::default());
    server.fasteners_mut().create(AnchorSite::Block {
        world: WORLD,
        pos: GROUND.offset(Facing::Up),
        facing: Facing::Up,
    });
    server.fasteners_mut().create(AnchorSite::Fence {
        world: WORLD,
        pos: FENCE,
    });
    server
}

#[test]
fn saved_connections_bind_again() {
    let saved = strung_server().save_connections();
    assert_eq!(saved.len(), 1);

    let mut server = fresh_server_with_anchors();
    let restored = server.load_connections(&saved);
    assert_eq!(restored.len(), 1);

    let connection = server.fasteners().connection(&restored[0]).unwrap();
    assert_eq!(connection.kind(), ConnectionType::PennantBunting);
    assert_eq!(connection.captured_color(), Some("yellow"));
    assert!(matches!(connection.destination().site, AnchorSite::Fence { .. }));
    // Restored cords never yield a drop.
    assert!(!connection.drop_on_break());
}

#[test]
fn stripped_save_is_rebuilt_on_load() {
    init_logging();

    let mut saved = strung_server().save_connections();
    let mut stripped = Compound::new();
    stripped.insert(keys::ORIGINAL_COLOR, "purple");
    saved[0].insert("Logic", stripped);

    let mut server = fresh_server_with_anchors();
    let restored = server.load_connections(&saved);
    assert_eq!(restored.len(), 1);

    let connection = server.fasteners().connection(&restored[0]).unwrap();
    assert_eq!(connection.captured_color(), Some("purple"));
    assert_eq!(connection.captured_rgb(), Some(0x800080));
    assert_eq!(connection.payload().pattern().len(), 6);
}

#[test]
fn unreadable_or_unbindable_records_are_skipped() {
    let mut saved = strung_server().save_connections();
    let mut unknown = saved[0].clone();
    unknown.insert("Type", "fishing_line");
    assert_eq!(
        deserialize_connection(&unknown),
        Err(CodecError::UnknownConnectionType {
            name: "fishing_line".to_string()
        })
    );
    saved.push(unknown);

    // No anchors registered at all: nothing can bind.
    let mut empty = FestoonServer::new(ServerConfig::default());
    assert!(empty.load_connections(&saved).is_empty());

    let mut server = fresh_server_with_anchors();
    assert_eq!(server.load_connections(&saved).len(), 1);
}

#[test]
fn snapshot_serializes_held_connections() {
    let server = strung_server();
    let fence = server.fasteners().fence_fastener(WORLD, FENCE).unwrap();
    let fasteners = server.fasteners();
    let snapshot = FastenerSnapshot::capture(fasteners.get(&fence).unwrap(), fasteners);

    let record = serialize_fastener(&snapshot);
    let connections = record.get_list("Connections").unwrap();
    assert_eq!(connections.len(), 1);
    let Tag::Compound(connection) = &connections[0] else {
        panic!("connection should serialize as a compound");
    };
    assert_eq!(connection.get_string("Type"), Some("pennant_bunting"));
    assert!(record.get("Removed").is_none());
}
