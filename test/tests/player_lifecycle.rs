/// Inventory upkeep around players: the login sweep, captures on container
/// and pickup events, and the fence right-click arbitration.

use festoon_server::{host::Decoration, FenceUse, FestoonServer, ServerConfig, UseOutcome};
use festoon_shared::{
    canonical_record, keys, BlockPos, Compound, ConnectionType, Facing, Hand, Hands, ItemKind,
    ItemStack, Tag, WorldKey,
};
use festoon_test::{
    captured_only, connection_stack, leash, stripped_stack, use_on, TestHost, PLAYER, WORLD,
};

const FENCE: BlockPos = BlockPos::new(5, 64, 5);

#[test]
fn login_sweep_repairs_every_slot() {
    let mut server = FestoonServer::new(ServerConfig::default());
    let mut inventory = vec![
        connection_stack(ConnectionType::HangingLights, 0x00FF00, 3),
        stripped_stack(ConnectionType::HangingLights, 2, captured_only("red", 0xFF0000)),
        ItemStack::new(ItemKind::Other("stone".to_string()), 64),
        // The off-hand slot is swept like any other.
        stripped_stack(ConnectionType::PennantBunting, 1, Compound::new()),
    ];
    let intact = inventory[0].clone();

    let repaired = server.player_join(PLAYER, WORLD, &mut inventory);
    assert_eq!(repaired, vec![1, 3]);
    assert_eq!(inventory[0], intact);
    assert_eq!(inventory[1].count, 2);
    assert_eq!(
        inventory[1].tag.as_ref().unwrap().get_string(keys::CAPTURED_COLOR),
        Some("red")
    );
    assert_eq!(
        inventory[3].tag.as_ref().unwrap().get_string(keys::CAPTURED_COLOR),
        Some("white")
    );

    let player = server.fasteners().player_fastener(PLAYER).unwrap();
    assert_eq!(server.fasteners().get(&player).unwrap().world(), Some(WORLD));
}

#[test]
fn player_in_another_world_cannot_bind_here() {
    let mut server = FestoonServer::new(ServerConfig::default());
    server.player_join(PLAYER, WorldKey(1), &mut []);
    let mut host = TestHost::new().with_fence(WORLD, FENCE);
    let mut hands = Hands::main_only(connection_stack(ConnectionType::Tinsel, 0xFF00FF, 2));

    let outcome = server.use_item(&mut host, use_on(FENCE, Facing::Up), &mut hands);
    assert!(matches!(outcome, UseOutcome::Rejected(_)));
    assert_eq!(hands.main.count, 2);

    server.player_change_world(PLAYER, WORLD);
    let outcome = server.use_item(&mut host, use_on(FENCE, Facing::Up), &mut hands);
    assert!(matches!(outcome, UseOutcome::Bound { .. }));
}

#[test]
fn unregistered_player_gets_an_anchor_on_use() {
    let mut server = FestoonServer::new(ServerConfig::default());
    let mut host = TestHost::new().with_fence(WORLD, FENCE);
    let mut hands = Hands::main_only(connection_stack(ConnectionType::Tinsel, 0xFF00FF, 2));

    let outcome = server.use_item(&mut host, use_on(FENCE, Facing::Up), &mut hands);
    assert!(matches!(outcome, UseOutcome::Bound { .. }));
    assert!(server.fasteners().player_fastener(PLAYER).is_some());
}

#[test]
fn container_and_pickup_capture_colors() {
    let server = FestoonServer::new(ServerConfig::default());
    let mut uncaptured = ItemStack::with_tag(
        ItemKind::Connection(ConnectionType::HangingLights),
        1,
        canonical_record(ConnectionType::HangingLights, 0x0000FF),
    );
    let mut slots = vec![uncaptured.clone(), ItemStack::empty()];

    assert_eq!(server.capture_inventory(&mut slots), 1);
    assert_eq!(server.capture_inventory(&mut slots), 0);

    assert!(server.capture_pickup(&mut uncaptured));
    assert_eq!(uncaptured, slots[0]);
    assert_eq!(
        uncaptured.tag.as_ref().unwrap().get(keys::CAPTURED_RGB),
        Some(&Tag::Int(0x0000FF))
    );
}

#[test]
fn fence_click_arbitration() {
    let mut server = FestoonServer::new(ServerConfig::default());
    server.player_join(PLAYER, WORLD, &mut []);
    let mut host = TestHost::new().with_fence(WORLD, FENCE);
    let context = use_on(FENCE, Facing::Up);

    let cord = connection_stack(ConnectionType::Garland, 0, 1);
    let mut hands = Hands::new(leash(), cord.clone());
    assert_eq!(
        server.right_click_block(&host, context, Hand::Main, &mut hands, false),
        FenceUse::Cancel
    );

    let mut hands = Hands::new(ItemStack::empty(), cord.clone());
    assert_eq!(
        server.right_click_block(&host, context, Hand::Main, &mut hands, false),
        FenceUse::DenyBlockUse
    );

    // Once an anchor hangs on the post, leading mobs onto it is swallowed.
    let mut hands = Hands::main_only(connection_stack(ConnectionType::Tinsel, 0xFF00FF, 2));
    server.use_item(&mut host, context, &mut hands);
    let mut hands = Hands::main_only(ItemStack::empty());
    assert_eq!(
        server.right_click_block(&host, context, Hand::Main, &mut hands, true),
        FenceUse::Cancel
    );

    let knotted = TestHost::new()
        .with_fence(WORLD, BlockPos::new(0, 64, 0))
        .with_decoration(WORLD, BlockPos::new(0, 64, 0), Decoration::LeashKnot);
    assert_eq!(
        server.right_click_block(
            &knotted,
            use_on(BlockPos::new(0, 64, 0), Facing::Up),
            Hand::Main,
            &mut hands,
            true
        ),
        FenceUse::Proceed
    );

    // Off the fence nothing is arbitrated.
    let mut hands = Hands::new(leash(), cord);
    assert_eq!(
        server.right_click_block(
            &host,
            use_on(BlockPos::new(0, 10, 0), Facing::Up),
            Hand::Main,
            &mut hands,
            false
        ),
        FenceUse::Proceed
    );
}
