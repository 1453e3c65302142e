/// PROPERTY-BASED TESTS: anchor state consistency
///
/// Drives the registry with random binds, one-sided releases and breaks.
///
/// Key invariants:
/// 1. Every connection an anchor holds is alive and has that anchor as an end
/// 2. A live connection is held by at least one of its ends
/// 3. After one step, every surviving connection is held by both ends

use proptest::prelude::*;

use festoon_server::{
    AnchorSite, ConnectError, FastenerKey, Fasteners, FestoonServer, Refusal, ServerConfig,
};
use festoon_shared::{canonical_record, BlockPos, ConnectionType, Facing};
use festoon_test::{RecordingObserver, WORLD};

const ANCHORS: usize = 4;
const CAPACITY: usize = 3;

#[derive(Clone, Debug)]
enum Op {
    Connect(usize, usize),
    Release(usize, usize),
    Break(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ANCHORS, 0..ANCHORS).prop_map(|(target, source)| Op::Connect(target, source)),
        (0..ANCHORS, 0..8usize).prop_map(|(anchor, pick)| Op::Release(anchor, pick)),
        (0..8usize).prop_map(Op::Break),
    ]
}

fn anchored_server() -> (FestoonServer, Vec<FastenerKey>) {
    let mut server = FestoonServer::new(ServerConfig {
        max_connections_per_anchor: CAPACITY,
        revalidate_interval: 0,
        ..Default::default()
    });
    let anchors = (0..ANCHORS)
        .map(|x| {
            server.fasteners_mut().create(AnchorSite::Block {
                world: WORLD,
                pos: BlockPos::new(x as i32, 64, 0),
                facing: Facing::Up,
            })
        })
        .collect();
    (server, anchors)
}

fn apply(fasteners: &mut Fasteners, anchors: &[FastenerKey], op: &Op) {
    match *op {
        Op::Connect(target, source) => {
            let logic = canonical_record(ConnectionType::Tinsel, 0x00FF00);
            let result = fasteners.connect(
                WORLD,
                &anchors[target],
                &anchors[source],
                ConnectionType::Tinsel,
                logic,
                false,
            );
            if target == source {
                assert_eq!(
                    result,
                    Err(ConnectError::TargetRefused {
                        reason: Refusal::SelfConnection
                    })
                );
            }
        }
        Op::Release(anchor, pick) => {
            let held = fasteners
                .get(&anchors[anchor])
                .unwrap()
                .state()
                .connections()
                .to_vec();
            if !held.is_empty() {
                let connection = held[pick % held.len()];
                assert!(fasteners.disconnect(&anchors[anchor], &connection).is_ok());
            }
        }
        Op::Break(pick) => {
            let live: Vec<_> = fasteners
                .connections()
                .iter()
                .map(|connection| connection.key())
                .collect();
            if !live.is_empty() {
                let connection = live[pick % live.len()];
                fasteners.break_connection(&connection);
                assert!(fasteners.connection(&connection).is_none());
            }
        }
    }
}

fn check_consistent(fasteners: &Fasteners, anchors: &[FastenerKey]) -> Result<(), TestCaseError> {
    for anchor in anchors {
        for key in fasteners.get(anchor).unwrap().state().connections() {
            let connection = fasteners.connection(key);
            prop_assert!(connection.is_some(), "{:?} holds a destroyed {:?}", anchor, key);
            prop_assert!(connection.unwrap().has_endpoint(anchor));
        }
    }
    for connection in fasteners.connections() {
        let held_by = |end: &FastenerKey| {
            fasteners
                .get(end)
                .is_some_and(|anchor| anchor.state().contains(&connection.key()))
        };
        prop_assert!(
            held_by(&connection.fastener().key) || held_by(&connection.destination().key)
        );
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_anchor_states_stay_consistent(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let (mut server, anchors) = anchored_server();

        for op in &ops {
            apply(server.fasteners_mut(), &anchors, op);
            check_consistent(server.fasteners(), &anchors)?;
        }

        server.tick(&mut RecordingObserver::new());
        check_consistent(server.fasteners(), &anchors)?;
        for connection in server.fasteners().connections() {
            for end in [connection.fastener().key, connection.destination().key] {
                let state = server.fasteners().get(&end).unwrap().state();
                prop_assert!(state.contains(&connection.key()));
            }
        }
    }
}
