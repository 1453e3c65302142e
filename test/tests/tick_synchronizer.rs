/// Per-step upkeep: transient anchor expiry, dangling connection reaping,
/// revalidation of persisted payloads and the snapshots observers receive.

use festoon_server::{host::Audience, FestoonServer, ServerConfig, UseOutcome};
use festoon_shared::{canonical_record, BlockPos, ConnectionType, Facing, Hands, ItemStack};
use festoon_test::{
    connection_stack, init_logging, use_on, RecordingObserver, TestHost, PLAYER, WORLD,
};

const FENCE: BlockPos = BlockPos::new(5, 64, 5);
const OTHER_FENCE: BlockPos = BlockPos::new(9, 64, 5);

fn quiet_config() -> ServerConfig {
    ServerConfig {
        revalidate_interval: 0,
        ..Default::default()
    }
}

fn red_lights() -> ItemStack {
    connection_stack(ConnectionType::HangingLights, 0xFF0000, 8)
}

#[test]
fn fence_losing_its_last_connection_expires_next_step() {
    init_logging();

    let mut server = FestoonServer::new(quiet_config());
    server.player_join(PLAYER, WORLD, &mut []);
    let mut host = TestHost::new().with_fence(WORLD, FENCE);
    let mut hands = Hands::main_only(red_lights());

    let UseOutcome::Bound { connection, .. } =
        server.use_item(&mut host, use_on(FENCE, Facing::Up), &mut hands)
    else {
        panic!("use should bind");
    };
    let fence = server.fasteners().fence_fastener(WORLD, FENCE).unwrap();
    let player = server.fasteners().player_fastener(PLAYER).unwrap();

    let mut observer = RecordingObserver::new();
    server.tick(&mut observer);
    observer.clear();

    // The player lets go of its end; the fence still holds the cord.
    assert_eq!(server.fasteners_mut().disconnect(&player, &connection), Ok(None));

    let report = server.tick(&mut observer);
    assert_eq!(report.dropped, vec![connection]);
    assert!(report.expired.is_empty());
    assert!(server.fasteners().contains(&fence));
    assert!(server.fasteners().get(&fence).unwrap().state().is_empty());
    assert!(server.fasteners().connection(&connection).is_none());

    let report = server.tick(&mut observer);
    assert_eq!(report.expired, vec![fence]);
    assert!(!server.fasteners().contains(&fence));

    let (snapshot, audience) = observer.last_for(&fence).unwrap();
    assert!(snapshot.removed);
    assert_eq!(
        *audience,
        Audience::TrackingBlock {
            world: WORLD,
            pos: FENCE
        }
    );
}

#[test]
fn empty_fence_expires_while_neighbour_changes() {
    let mut server = FestoonServer::new(quiet_config());
    server.player_join(PLAYER, WORLD, &mut []);
    let mut host = TestHost::new()
        .with_fence(WORLD, FENCE)
        .with_fence(WORLD, OTHER_FENCE);
    let mut hands = Hands::main_only(red_lights());
    server.use_item(&mut host, use_on(FENCE, Facing::Up), &mut hands);

    let empty = server
        .fasteners_mut()
        .find_or_create_fence(WORLD, OTHER_FENCE, &mut host)
        .unwrap()
        .key();
    let fence = server.fasteners().fence_fastener(WORLD, FENCE).unwrap();
    let player = server.fasteners().player_fastener(PLAYER).unwrap();

    let mut observer = RecordingObserver::new();
    let report = server.tick(&mut observer);

    assert_eq!(report.expired, vec![empty]);
    assert!(report.dropped.is_empty());
    assert_eq!(server.fasteners().get(&fence).unwrap().state().len(), 1);

    // Both the bound anchors were touched by the use and are broadcast once.
    let keys = observer.notified_keys();
    assert_eq!(keys.iter().filter(|key| **key == fence).count(), 1);
    assert_eq!(keys.iter().filter(|key| **key == player).count(), 1);
    let (snapshot, audience) = observer.last_for(&player).unwrap();
    assert_eq!(*audience, Audience::TrackingPlayer(PLAYER));
    assert_eq!(snapshot.connection_keys.len(), 1);
    assert_eq!(snapshot.connections.len(), 1);
}

#[test]
fn steady_state_is_not_rebroadcast() {
    let mut server = FestoonServer::new(quiet_config());
    server.player_join(PLAYER, WORLD, &mut []);
    let mut host = TestHost::new().with_fence(WORLD, FENCE);
    let mut hands = Hands::main_only(red_lights());
    server.use_item(&mut host, use_on(FENCE, Facing::Up), &mut hands);

    let mut observer = RecordingObserver::new();
    server.tick(&mut observer);
    assert!(!observer.notifications().is_empty());

    observer.clear();
    for _ in 0..5 {
        let report = server.tick(&mut observer);
        assert!(report.notified.is_empty());
    }
    assert!(observer.notifications().is_empty());

    assert_eq!(server.fasteners().connections()[0].age(), 6);
}

#[test]
fn revalidation_captures_uncaptured_logic() {
    let mut server = FestoonServer::new(ServerConfig {
        revalidate_interval: 1,
        ..Default::default()
    });
    server.player_join(PLAYER, WORLD, &mut []);
    let fence = server
        .fasteners_mut()
        .find_or_create_fence(WORLD, FENCE, &mut TestHost::new())
        .unwrap()
        .key();
    let player = server.fasteners().player_fastener(PLAYER).unwrap();

    // Bound directly, so the logic never went through the held-item capture.
    let logic = canonical_record(ConnectionType::PennantBunting, 0x0000FF);
    let connection = server
        .fasteners_mut()
        .connect(WORLD, &fence, &player, ConnectionType::PennantBunting, logic, false)
        .unwrap();
    assert_eq!(
        server.fasteners().connection(&connection).unwrap().captured_color(),
        None
    );

    let mut observer = RecordingObserver::new();
    server.tick(&mut observer);

    let captured = server.fasteners().connection(&connection).unwrap();
    assert_eq!(captured.captured_color(), Some("blue"));
    assert_eq!(captured.captured_rgb(), Some(0x0000FF));

    observer.clear();
    let report = server.tick(&mut observer);
    assert!(report.notified.is_empty());
}

#[test]
fn vanished_endpoint_is_reaped() {
    let mut server = FestoonServer::new(quiet_config());
    server.player_join(PLAYER, WORLD, &mut []);
    let mut host = TestHost::new().with_fence(WORLD, FENCE);

    let mut hands = Hands::main_only(red_lights());
    server.use_item(&mut host, use_on(FENCE, Facing::Up), &mut hands);

    let player = server.fasteners().player_fastener(PLAYER).unwrap();
    let fence = server.fasteners().fence_fastener(WORLD, FENCE).unwrap();
    assert!(server.fasteners_mut().remove(&player).is_some());

    let mut observer = RecordingObserver::new();
    let report = server.tick(&mut observer);
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(server.fasteners().connection_count(), 0);
    assert!(report.notified.contains(&fence));
}
