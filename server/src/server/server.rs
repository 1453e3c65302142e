use log::{info, warn};

use festoon_shared::{Compound, Hand, Hands, ItemStack, PlayerKey, StateIntegrityGuard, WorldKey};

use crate::{
    connection::{deserialize_connection, serialize_connection},
    error::ConnectError,
    fastener::{AnchorSite, Fasteners},
    host::{Cue, CueSink, Decoration, Geometry, Observer},
    key_generator::{ConnectionKey, FastenerKey},
    protocol::{fence_use_rule, ConnectionEstablishment, FenceUse, UseContext, UseOutcome},
    tick::{StepReport, TickSynchronizer},
    ServerConfig,
};

/// Hosts the binding core: the anchor registry, the integrity guard and the
/// tick synchronizer, and routes host events to them
pub struct FestoonServer {
    config: ServerConfig,
    fasteners: Fasteners,
    guard: StateIntegrityGuard,
    synchronizer: TickSynchronizer,
}

impl FestoonServer {
    /// Create a new Server
    pub fn new(config: ServerConfig) -> Self {
        Self {
            fasteners: Fasteners::new(config.max_connections_per_anchor),
            guard: StateIntegrityGuard::new(config.neutral_color),
            synchronizer: TickSynchronizer::new(config.revalidate_interval),
            config,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn fasteners(&self) -> &Fasteners {
        &self.fasteners
    }

    pub fn fasteners_mut(&mut self) -> &mut Fasteners {
        &mut self.fasteners
    }

    pub fn guard(&self) -> &StateIntegrityGuard {
        &self.guard
    }

    // Players

    /// Registers the player's anchor in `world` and repairs every connection
    /// item in their inventory. Returns the repaired slots.
    pub fn player_join(
        &mut self,
        player: PlayerKey,
        world: WorldKey,
        inventory: &mut [ItemStack],
    ) -> Vec<usize> {
        let key = self.fasteners.create(AnchorSite::Player(player));
        self.fasteners.join_world(&key, world);

        let repaired = self.guard.sweep(inventory);
        if !repaired.is_empty() {
            warn!(
                "Repaired {} connection item(s) in the inventory of player {:?}",
                repaired.len(),
                player
            );
        }
        repaired
    }

    pub fn player_leave(&mut self, player: PlayerKey) {
        if let Some(key) = self.fasteners.player_fastener(player) {
            self.fasteners.leave_world(&key);
        }
    }

    pub fn player_change_world(&mut self, player: PlayerKey, world: WorldKey) {
        let key = self.fasteners.ensure_player_fastener(player, world);
        self.fasteners.join_world(&key, world);
    }

    // Items

    /// A player used their main-hand item on a block face.
    pub fn use_item<H: Geometry + CueSink>(
        &mut self,
        host: &mut H,
        context: UseContext,
        hands: &mut Hands,
    ) -> UseOutcome {
        let mut establishment = ConnectionEstablishment::new(
            &mut self.fasteners,
            &self.guard,
            &self.config,
            host,
            context,
        );
        establishment.run(hands)
    }

    /// A player right-clicked a block with `hand`. Captures the held item's
    /// color and, on fence posts, arbitrates between leashes and connection
    /// items.
    pub fn right_click_block<G: Geometry>(
        &mut self,
        geometry: &G,
        context: UseContext,
        hand: Hand,
        hands: &mut Hands,
        leading_mobs: bool,
    ) -> FenceUse {
        let held = match hand {
            Hand::Main => &mut hands.main,
            Hand::Off => &mut hands.off,
        };
        self.guard.capture(held);

        if !geometry.is_fence_like(context.world, context.pos) {
            return FenceUse::Proceed;
        }
        let decoration = if self
            .fasteners
            .fence_fastener(context.world, context.pos)
            .is_some()
        {
            Some(Decoration::FenceAnchor)
        } else {
            geometry.decoration_at(context.world, context.pos)
        };
        let held = match hand {
            Hand::Main => &hands.main,
            Hand::Off => &hands.off,
        };
        fence_use_rule(hand, held, &hands.off, leading_mobs, decoration.as_ref())
    }

    /// Captures the color of every valid connection item, for when a
    /// container is opened or closed.
    pub fn capture_inventory(&self, slots: &mut [ItemStack]) -> usize {
        self.guard.capture_all(slots)
    }

    pub fn capture_pickup(&self, stack: &mut ItemStack) -> bool {
        self.guard.capture(stack)
    }

    // Anchors

    /// The host destroyed an anchor's block or entity. Every connection it
    /// held is broken and the resulting drops are returned.
    pub fn break_fastener<C: CueSink>(
        &mut self,
        cues: &mut C,
        key: &FastenerKey,
    ) -> Vec<ItemStack> {
        let Some(fastener) = self.fasteners.get(key) else {
            return Vec::new();
        };
        let connections = fastener.state().connections().to_vec();
        let site = *fastener.site();

        let drops: Vec<ItemStack> = connections
            .iter()
            .filter_map(|connection| self.fasteners.break_connection(connection))
            .collect();
        self.fasteners.remove(key);

        if let (Some(world), Some(pos)) = (site.fixed_world(), site.pos()) {
            if !connections.is_empty() {
                cues.request_cue(Cue::Disconnect { world, pos });
            }
        }
        drops
    }

    /// Runs one simulation step and broadcasts changed anchors.
    pub fn tick<O: Observer>(&mut self, observer: &mut O) -> StepReport {
        self.synchronizer.step(&mut self.fasteners, &self.guard, observer)
    }

    // Persistence

    pub fn save_connections(&self) -> Vec<Compound> {
        self.fasteners
            .connections()
            .into_iter()
            .map(serialize_connection)
            .collect()
    }

    /// Re-binds persisted connections between the anchors already
    /// registered. Records that cannot be read or bound are skipped.
    pub fn load_connections(&mut self, records: &[Compound]) -> Vec<ConnectionKey> {
        let mut restored = Vec::new();
        for record in records {
            let result = deserialize_connection(record)
                .map_err(ConnectError::from)
                .and_then(|record| self.fasteners.restore_connection(record, &self.guard));
            match result {
                Ok(key) => restored.push(key),
                Err(error) => warn!("Skipping persisted connection: {}", error),
            }
        }
        info!("restored {} of {} connection(s)", restored.len(), records.len());
        restored
    }
}
