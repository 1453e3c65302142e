use std::collections::{HashMap, HashSet};

use log::{info, warn};

use festoon_shared::{
    BlockPos, Compound, ConnectionType, ItemStack, PlayerKey, StateIntegrityGuard, WorldKey,
};

use crate::{
    connection::{Connection, ConnectionRecord, Endpoint},
    error::{ConnectError, Refusal},
    host::Geometry,
    key_generator::{ConnectionKey, FastenerKey, KeyGenerator},
};

use super::{AnchorSite, Fastener, SiteIndex};

/// Result of a find-or-create lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup {
    Found(FastenerKey),
    Created(FastenerKey),
}

impl Lookup {
    pub fn key(&self) -> FastenerKey {
        match self {
            Lookup::Found(key) | Lookup::Created(key) => *key,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Lookup::Created(_))
    }
}

/// Registry of every live anchor and every connection between them.
///
/// Connections live in one arena and are referenced by key from both
/// endpoints' [`AnchorState`](super::AnchorState)s. All state mutation goes
/// through this type or the tick commit phase.
pub struct Fasteners {
    fasteners: HashMap<FastenerKey, Fastener>,
    connections: HashMap<ConnectionKey, Connection>,
    sites: HashMap<SiteIndex, FastenerKey>,
    fastener_keys: KeyGenerator<FastenerKey>,
    connection_keys: KeyGenerator<ConnectionKey>,
    dirty: HashSet<FastenerKey>,
    max_connections: usize,
}

impl Fasteners {
    pub fn new(max_connections: usize) -> Self {
        Self {
            fasteners: HashMap::new(),
            connections: HashMap::new(),
            sites: HashMap::new(),
            fastener_keys: KeyGenerator::new(),
            connection_keys: KeyGenerator::new(),
            dirty: HashSet::new(),
            max_connections,
        }
    }

    // Public

    /// Constructs the anchor for `site`, or returns the one already there.
    pub fn create(&mut self, site: AnchorSite) -> FastenerKey {
        if let Some(key) = self.sites.get(&site.index()) {
            return *key;
        }
        let key = self.fastener_keys.generate();
        self.sites.insert(site.index(), key);
        self.fasteners.insert(key, Fastener::new(key, site));
        self.dirty.insert(key);
        key
    }

    pub fn get(&self, key: &FastenerKey) -> Option<&Fastener> {
        self.fasteners.get(key)
    }

    pub fn contains(&self, key: &FastenerKey) -> bool {
        self.fasteners.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fasteners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fasteners.is_empty()
    }

    /// Live anchor keys in creation order.
    pub fn keys(&self) -> Vec<FastenerKey> {
        let mut keys: Vec<FastenerKey> = self.fasteners.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn connection(&self, key: &ConnectionKey) -> Option<&Connection> {
        self.connections.get(key)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Every connection in creation order.
    pub fn connections(&self) -> Vec<&Connection> {
        let mut connections: Vec<&Connection> = self.connections.values().collect();
        connections.sort_by_key(|connection| connection.key());
        connections
    }

    pub fn block_fastener(&self, world: WorldKey, pos: BlockPos) -> Option<FastenerKey> {
        self.sites.get(&SiteIndex::Block(world, pos)).copied()
    }

    pub fn fence_fastener(&self, world: WorldKey, pos: BlockPos) -> Option<FastenerKey> {
        self.sites.get(&SiteIndex::Fence(world, pos)).copied()
    }

    pub fn player_fastener(&self, player: PlayerKey) -> Option<FastenerKey> {
        self.sites.get(&SiteIndex::Player(player)).copied()
    }

    /// Resolves the player's anchor, constructing it in `world` if the host
    /// never registered one.
    pub fn ensure_player_fastener(&mut self, player: PlayerKey, world: WorldKey) -> FastenerKey {
        if let Some(key) = self.player_fastener(player) {
            return key;
        }
        warn!(
            "No anchor registered for player {:?}, constructing one in {:?}",
            player, world
        );
        let key = self.create(AnchorSite::Player(player));
        self.join_world(&key, world);
        key
    }

    /// Returns false if the anchor does not exist.
    pub fn join_world(&mut self, key: &FastenerKey, world: WorldKey) -> bool {
        let Some(fastener) = self.fasteners.get_mut(key) else {
            return false;
        };
        fastener.state_mut().set_world(Some(world));
        self.dirty.insert(*key);
        true
    }

    pub fn leave_world(&mut self, key: &FastenerKey) -> bool {
        let Some(fastener) = self.fasteners.get_mut(key) else {
            return false;
        };
        fastener.state_mut().set_world(None);
        self.dirty.insert(*key);
        true
    }

    /// The anchor's earliest connection still in flight: for a player, the
    /// pending one whose dangling end it holds; for any other anchor, the
    /// first one still alive.
    pub fn first_connection(&self, key: &FastenerKey) -> Option<ConnectionKey> {
        let fastener = self.fasteners.get(key)?;
        fastener
            .state()
            .connections()
            .iter()
            .filter_map(|connection_key| self.connections.get(connection_key))
            .find(|connection| {
                !fastener.is_player() || connection.destination().key == *key
            })
            .map(|connection| connection.key())
    }

    /// Binds a new connection owned by `target` with `source` as its
    /// destination.
    ///
    /// The source side is appended first. If the target then refuses, the
    /// source append is rolled back before [`ConnectError::TargetRefused`] is
    /// returned, so no half-bound connection is ever left behind.
    pub fn connect(
        &mut self,
        world: WorldKey,
        target: &FastenerKey,
        source: &FastenerKey,
        kind: ConnectionType,
        logic: Compound,
        is_reconnect: bool,
    ) -> Result<ConnectionKey, ConnectError> {
        let target_site = self.site_of(target)?;
        let source_site = self.site_of(source)?;

        let key = self.connection_keys.generate();
        let connection = Connection::new(
            key,
            kind,
            Endpoint {
                key: *target,
                site: target_site,
            },
            Endpoint {
                key: *source,
                site: source_site,
            },
            logic,
            is_reconnect,
        )?;

        let source_was_dirty = self.dirty.contains(source);
        self.connections.insert(key, connection);
        self.state_push(source, key);

        if let Err(reason) = self.bind_check(world, target, source) {
            self.state_remove(source, &key);
            self.connections.remove(&key);
            if !source_was_dirty {
                self.dirty.remove(source);
            }
            return Err(ConnectError::TargetRefused { reason });
        }
        self.state_push(target, key);

        self.dirty.insert(*target);
        self.dirty.insert(*source);
        Ok(key)
    }

    /// Removes the connection from `anchor`'s side. Once neither endpoint
    /// references it any more the connection is destroyed, and its dropped
    /// item is returned if it yields one.
    pub fn disconnect(
        &mut self,
        anchor: &FastenerKey,
        connection: &ConnectionKey,
    ) -> Result<Option<ItemStack>, ConnectError> {
        let holds = self
            .fasteners
            .get(anchor)
            .is_some_and(|fastener| fastener.state().contains(connection));
        if !holds {
            return Err(ConnectError::ConnectionNotFound);
        }
        self.state_remove(anchor, connection);
        Ok(self.destroy_if_orphaned(connection))
    }

    /// Fully detaches a connection from both ends and destroys it.
    pub fn break_connection(&mut self, connection: &ConnectionKey) -> Option<ItemStack> {
        let (fastener, destination) = {
            let connection = self.connections.get(connection)?;
            (connection.fastener().key, connection.destination().key)
        };
        self.state_remove(&fastener, connection);
        self.state_remove(&destination, connection);
        self.destroy_if_orphaned(connection)
    }

    /// Moves the destination end of `connection` to `new_destination`.
    ///
    /// The new side is bound before the old one is released; a refusal
    /// leaves the connection exactly as it was.
    pub fn reconnect(
        &mut self,
        connection: &ConnectionKey,
        new_destination: &FastenerKey,
    ) -> Result<(), ConnectError> {
        let (owner, old_destination) = match self.connections.get(connection) {
            Some(existing) => (existing.fastener().key, existing.destination().key),
            None => return Err(ConnectError::ConnectionNotFound),
        };
        let site = self.site_of(new_destination)?;
        let world = self
            .fasteners
            .get(&owner)
            .and_then(|fastener| fastener.world())
            .ok_or_else(|| ConnectError::ConnectionCreationFailed {
                reason: "owning anchor has left its world".to_string(),
            })?;

        self.bind_check(world, new_destination, &owner)
            .map_err(|reason| ConnectError::TargetRefused { reason })?;

        self.state_push(new_destination, *connection);
        if old_destination != *new_destination {
            self.state_remove(&old_destination, connection);
        }
        if let Some(existing) = self.connections.get_mut(connection) {
            existing.set_destination(Endpoint {
                key: *new_destination,
                site,
            });
        }

        self.dirty.insert(owner);
        self.dirty.insert(old_destination);
        self.dirty.insert(*new_destination);
        Ok(())
    }

    /// Returns the fence anchor at `pos`, spawning one if the post is free.
    pub fn find_or_create_fence<G: Geometry>(
        &mut self,
        world: WorldKey,
        pos: BlockPos,
        geometry: &mut G,
    ) -> Result<Lookup, ConnectError> {
        if let Some(key) = self.fence_fastener(world, pos) {
            return Ok(Lookup::Found(key));
        }
        if geometry.decoration_at(world, pos).is_some() {
            return Err(ConnectError::SiteOccupied { world, pos });
        }
        let site = AnchorSite::Fence { world, pos };
        if !geometry.attach_anchor(&site) {
            return Err(ConnectError::ConnectionCreationFailed {
                reason: format!("no fence anchor could be attached at {:?}", pos),
            });
        }
        Ok(Lookup::Created(self.create(site)))
    }

    /// Re-binds a persisted connection between two live anchors. The logic
    /// goes through the guard first, so a payload stripped while stored is
    /// rebuilt rather than rejected.
    pub fn restore_connection(
        &mut self,
        record: ConnectionRecord,
        guard: &StateIntegrityGuard,
    ) -> Result<ConnectionKey, ConnectError> {
        let target = self.key_of(&record.fastener)?;
        let source = self.key_of(&record.destination)?;
        let world = self
            .fasteners
            .get(&target)
            .and_then(|fastener| fastener.world())
            .ok_or_else(|| ConnectError::ConnectionCreationFailed {
                reason: "owning anchor is not in a world".to_string(),
            })?;

        let logic = match guard.validate(record.kind, Some(&record.logic)) {
            Ok(_) => record.logic,
            Err(error) => {
                warn!("{} while restoring a connection, rebuilding it", error);
                guard.repair_record(record.kind, Some(&record.logic)).0
            }
        };
        let key = self.connect(world, &target, &source, record.kind, logic, true)?;
        if let Some(connection) = self.connections.get_mut(&key) {
            connection.set_age(record.age);
        }
        info!("restored {} connection {:?}", record.kind, key);
        Ok(key)
    }

    /// Forgets an anchor whose host object is gone. Connections it held are
    /// left for the other endpoint's next tick to reap.
    pub fn remove(&mut self, key: &FastenerKey) -> Option<Fastener> {
        let fastener = self.fasteners.remove(key)?;
        self.sites.remove(&fastener.site().index());
        self.dirty.remove(key);
        Some(fastener)
    }

    pub fn mark_dirty(&mut self, key: &FastenerKey) {
        if self.fasteners.contains_key(key) {
            self.dirty.insert(*key);
        }
    }

    pub fn is_dirty(&self, key: &FastenerKey) -> bool {
        self.dirty.contains(key)
    }

    // Crate-public

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    pub(crate) fn connection_mut(&mut self, key: &ConnectionKey) -> Option<&mut Connection> {
        self.connections.get_mut(key)
    }

    /// Drops `connection` from `anchor`'s side without producing a drop.
    pub(crate) fn detach(&mut self, anchor: &FastenerKey, connection: &ConnectionKey) {
        self.state_remove(anchor, connection);
        self.destroy_if_orphaned(connection);
    }

    // Private

    fn site_of(&self, key: &FastenerKey) -> Result<AnchorSite, ConnectError> {
        self.fasteners
            .get(key)
            .map(|fastener| *fastener.site())
            .ok_or_else(|| ConnectError::ConnectionCreationFailed {
                reason: format!("anchor {:?} is not registered", key),
            })
    }

    fn key_of(&self, site: &AnchorSite) -> Result<FastenerKey, ConnectError> {
        self.sites
            .get(&site.index())
            .copied()
            .ok_or_else(|| ConnectError::ConnectionCreationFailed {
                reason: format!("no anchor at {:?}", site),
            })
    }

    // The checks the bound side runs before taking on a connection.
    fn bind_check(
        &self,
        world: WorldKey,
        target: &FastenerKey,
        source: &FastenerKey,
    ) -> Result<(), Refusal> {
        if target == source {
            return Err(Refusal::SelfConnection);
        }
        let (Some(target), Some(source)) = (self.fasteners.get(target), self.fasteners.get(source))
        else {
            return Err(Refusal::WorldMismatch);
        };
        if target.world() != Some(world) || source.world() != Some(world) {
            return Err(Refusal::WorldMismatch);
        }
        if target.state().len() >= self.max_connections {
            return Err(Refusal::Capacity);
        }
        Ok(())
    }

    fn state_push(&mut self, anchor: &FastenerKey, connection: ConnectionKey) {
        if let Some(fastener) = self.fasteners.get_mut(anchor) {
            fastener.state_mut().push(connection);
            self.dirty.insert(*anchor);
        }
    }

    fn state_remove(&mut self, anchor: &FastenerKey, connection: &ConnectionKey) {
        if let Some(fastener) = self.fasteners.get_mut(anchor) {
            if fastener.state_mut().remove(connection) {
                self.dirty.insert(*anchor);
            }
        }
    }

    fn references(&self, anchor: &FastenerKey, connection: &ConnectionKey) -> bool {
        self.fasteners
            .get(anchor)
            .is_some_and(|fastener| fastener.state().contains(connection))
    }

    fn destroy_if_orphaned(&mut self, key: &ConnectionKey) -> Option<ItemStack> {
        let connection = self.connections.get(key)?;
        if self.references(&connection.fastener().key, key)
            || self.references(&connection.destination().key, key)
        {
            return None;
        }
        let connection = self.connections.remove(key)?;
        connection.drop_on_break().then(|| connection.to_stack())
    }
}
