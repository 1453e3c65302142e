use log::{debug, warn};

use festoon_shared::{
    keys, BlockPos, Compound, ConnectionType, Facing, Hands, Inspection, ItemStack, PlayerKey,
    StateIntegrityGuard, WorldKey,
};

use crate::{
    error::{ConnectError, Refusal},
    fastener::{AnchorSite, Fasteners, Lookup},
    host::{Cue, CueSink, Geometry},
    key_generator::{ConnectionKey, FastenerKey},
    server::ServerConfig,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    HeldItemValidated,
    TargetResolved,
    Bound,
    Rejected,
}

/// A player using the main-hand item on a block face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UseContext {
    pub player: PlayerKey,
    pub world: WorldKey,
    pub pos: BlockPos,
    pub face: Facing,
}

/// Why a use did not bind anything. The held stack is left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The main hand does not hold a connection item
    NotConnectionItem,
    /// The off-hand holds a different connection item, or a leash where
    /// leashes are not exempt
    AmbiguousOffhand,
    /// The player's pending connection was not made with the held item
    AmbiguousConnection,
    NoValidTarget,
    /// The clicked fence already carries another decoration
    SiteOccupied,
    /// The host declined to place the fastener block
    PlacementFailed,
    /// The target anchor refused the bind
    Refused(Refusal),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UseOutcome {
    Bound {
        connection: ConnectionKey,
        /// True when the player's pending connection was re-targeted rather
        /// than a new one created
        reconnected: bool,
    },
    Rejected(Rejection),
    /// Binding failed past the point of no return. The held item has been
    /// consumed if the failure was [`ConnectError::ConnectionCreationFailed`].
    Failed(ConnectError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    Existing,
    Placed,
    Spawned,
}

#[derive(Clone, Copy, Debug)]
struct Target {
    key: FastenerKey,
    pos: BlockPos,
    origin: Origin,
}

enum Halt {
    Reject(Rejection),
    Fail(ConnectError),
}

impl From<Rejection> for Halt {
    fn from(rejection: Rejection) -> Self {
        Halt::Reject(rejection)
    }
}

/// Drives one item use from `Idle` to `Bound` or `Rejected`.
///
/// Runs synchronously inside the step that triggered it. Cues are only
/// requested once a bind succeeded.
pub struct ConnectionEstablishment<'s, H: Geometry + CueSink> {
    fasteners: &'s mut Fasteners,
    guard: &'s StateIntegrityGuard,
    config: &'s ServerConfig,
    host: &'s mut H,
    context: UseContext,
    phase: Phase,
}

impl<'s, H: Geometry + CueSink> ConnectionEstablishment<'s, H> {
    pub fn new(
        fasteners: &'s mut Fasteners,
        guard: &'s StateIntegrityGuard,
        config: &'s ServerConfig,
        host: &'s mut H,
        context: UseContext,
    ) -> Self {
        Self {
            fasteners,
            guard,
            config,
            host,
            context,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run(&mut self, hands: &mut Hands) -> UseOutcome {
        let kind = match self.validate_held(hands) {
            Ok(kind) => kind,
            Err(rejection) => return self.reject(rejection),
        };
        self.phase = Phase::HeldItemValidated;

        let target = match self.resolve_target() {
            Ok(target) => target,
            Err(Halt::Reject(rejection)) => return self.reject(rejection),
            Err(Halt::Fail(error)) => return self.fail(error, &mut hands.main),
        };
        self.phase = Phase::TargetResolved;

        self.bind(kind, target, &mut hands.main)
    }

    // Idle -> HeldItemValidated
    fn validate_held(&mut self, hands: &mut Hands) -> Result<ConnectionType, Rejection> {
        let kind = hands
            .main
            .connection_type()
            .ok_or(Rejection::NotConnectionItem)?;

        // Compared as held, before the guard pass below rewrites the main hand.
        let ambiguous_offhand =
            hands.off.is_connection_item() && !same_cord(&hands.main, &hands.off);

        match self.guard.inspect(&hands.main) {
            Inspection::Valid => {
                self.guard.capture(&mut hands.main);
            }
            Inspection::Repaired { stack, .. } => {
                warn!(
                    "Replaced corrupted {} stack held by player {:?}",
                    kind, self.context.player
                );
                hands.main = stack;
            }
        }

        if ambiguous_offhand {
            return Err(Rejection::AmbiguousOffhand);
        }
        if hands.off.is_leash() && !self.config.leash_offhand_exempt {
            return Err(Rejection::AmbiguousOffhand);
        }

        let pending = self
            .fasteners
            .player_fastener(self.context.player)
            .and_then(|player| self.fasteners.first_connection(&player))
            .and_then(|connection| self.fasteners.connection(&connection));
        if let Some(pending) = pending {
            if !pending.matches_stack(&hands.main) {
                return Err(Rejection::AmbiguousConnection);
            }
        }

        Ok(kind)
    }

    // HeldItemValidated -> TargetResolved
    fn resolve_target(&mut self) -> Result<Target, Halt> {
        let UseContext {
            world, pos, face, ..
        } = self.context;

        let existing = self
            .fasteners
            .block_fastener(world, pos)
            .or_else(|| self.fasteners.fence_fastener(world, pos));
        if let Some(key) = existing {
            return Ok(Target {
                key,
                pos,
                origin: Origin::Existing,
            });
        }

        let placed = pos.offset(face);
        if self.host.can_place_at(world, placed, face) {
            if !self.host.place_fastener(world, placed, face) {
                return Err(Rejection::PlacementFailed.into());
            }
            let site = AnchorSite::Block {
                world,
                pos: placed,
                facing: face,
            };
            if !self.host.attach_anchor(&site) {
                return Err(Halt::Fail(ConnectError::ConnectionCreationFailed {
                    reason: format!("no anchor could be attached to the block at {:?}", placed),
                }));
            }
            return Ok(Target {
                key: self.fasteners.create(site),
                pos: placed,
                origin: Origin::Placed,
            });
        }

        if self.host.is_fence_like(world, pos) {
            return match self.fasteners.find_or_create_fence(world, pos, &mut *self.host) {
                Ok(lookup) => Ok(Target {
                    key: lookup.key(),
                    pos,
                    origin: match lookup {
                        Lookup::Found(_) => Origin::Existing,
                        Lookup::Created(_) => Origin::Spawned,
                    },
                }),
                Err(ConnectError::SiteOccupied { .. }) => Err(Rejection::SiteOccupied.into()),
                Err(error) => Err(Halt::Fail(error)),
            };
        }

        Err(Rejection::NoValidTarget.into())
    }

    // TargetResolved -> Bound
    fn bind(&mut self, kind: ConnectionType, target: Target, stack: &mut ItemStack) -> UseOutcome {
        let UseContext { player, world, .. } = self.context;
        let player = self.fasteners.ensure_player_fastener(player, world);

        let pending = self.fasteners.first_connection(&player);
        let result = match pending {
            Some(connection) => self
                .fasteners
                .reconnect(&connection, &target.key)
                .map(|_| (connection, true)),
            None => {
                let logic = stack.tag.clone().unwrap_or_default();
                self.fasteners
                    .connect(world, &target.key, &player, kind, logic, false)
                    .map(|connection| (connection, false))
            }
        };

        match result {
            Ok((connection, reconnected)) => {
                stack.shrink(1);
                match target.origin {
                    Origin::Placed => self.host.request_cue(Cue::Place {
                        world,
                        pos: target.pos,
                    }),
                    Origin::Existing => self.host.request_cue(Cue::Connect {
                        world,
                        pos: target.pos,
                    }),
                    Origin::Spawned => {}
                }
                self.phase = Phase::Bound;
                debug!(
                    "bound {} connection {:?} to {:?} (reconnected: {})",
                    kind, connection, target.key, reconnected
                );
                UseOutcome::Bound {
                    connection,
                    reconnected,
                }
            }
            Err(ConnectError::TargetRefused { reason }) => self.reject(Rejection::Refused(reason)),
            Err(error) => self.fail(error, stack),
        }
    }

    fn reject(&mut self, rejection: Rejection) -> UseOutcome {
        debug!(
            "use by player {:?} rejected: {:?}",
            self.context.player, rejection
        );
        self.phase = Phase::Rejected;
        UseOutcome::Rejected(rejection)
    }

    fn fail(&mut self, error: ConnectError, stack: &mut ItemStack) -> UseOutcome {
        if matches!(error, ConnectError::ConnectionCreationFailed { .. }) {
            warn!(
                "{}, consuming the item held by player {:?}",
                error, self.context.player
            );
            stack.shrink(1);
        } else {
            warn!("use by player {:?} failed: {}", self.context.player, error);
        }
        self.phase = Phase::Rejected;
        UseOutcome::Failed(error)
    }
}

// Two stacks are the same cord when kind and authoritative payload agree. The
// captured color cache is advisory and ignored, as is a missing versus empty tag.
fn same_cord(a: &ItemStack, b: &ItemStack) -> bool {
    fn authoritative(stack: &ItemStack) -> Compound {
        let mut tag = stack.tag.clone().unwrap_or_default();
        tag.remove(keys::CAPTURED_COLOR);
        tag.remove(keys::CAPTURED_RGB);
        tag
    }
    a.kind == b.kind && authoritative(a) == authoritative(b)
}
