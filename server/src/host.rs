//! The contract between the binding core and the simulation hosting it. The
//! core never touches world geometry, effects or networking directly.

use festoon_shared::{BlockPos, Facing, PlayerKey, WorldKey};

use crate::{fastener::AnchorSite, tick::FastenerSnapshot};

/// Coarse classification of a block, as far as anchoring is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockState {
    Air,
    Solid,
    /// A solid fence-like block a transient anchor may be hung on
    Fence,
}

/// A hanging decoration occupying a fence post that is not one of our anchors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoration {
    LeashKnot,
    /// Reported by the fence right-click arbitration only, hosts never need
    /// to return it from [`Geometry::decoration_at`]
    FenceAnchor,
    Other(String),
}

impl Decoration {
    pub fn is_leash_knot(&self) -> bool {
        matches!(self, Decoration::LeashKnot)
    }
}

/// World geometry oracle.
pub trait Geometry {
    fn block_at(&self, world: WorldKey, pos: BlockPos) -> BlockState;

    fn is_fence_like(&self, world: WorldKey, pos: BlockPos) -> bool {
        self.block_at(world, pos) == BlockState::Fence
    }

    /// Whether a fastener block facing `facing` may be placed at `pos`.
    fn can_place_at(&self, world: WorldKey, pos: BlockPos, facing: Facing) -> bool;

    /// Places a fastener block. Returns false if the host refused the placement.
    fn place_fastener(&mut self, world: WorldKey, pos: BlockPos, facing: Facing) -> bool;

    fn decoration_at(&self, world: WorldKey, pos: BlockPos) -> Option<Decoration>;

    /// Attaches the host object backing a newly created anchor (block entity,
    /// hanging entity). Returns false if the host could not provide one.
    fn attach_anchor(&mut self, site: &AnchorSite) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Place { world: WorldKey, pos: BlockPos },
    Connect { world: WorldKey, pos: BlockPos },
    Disconnect { world: WorldKey, pos: BlockPos },
}

/// Receives audio/visual cue requests. Fire and forget.
pub trait CueSink {
    fn request_cue(&mut self, cue: Cue);
}

/// Who needs to hear about an anchor's new state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Audience {
    /// Everyone tracking the player, the player included
    TrackingPlayer(PlayerKey),
    /// Everyone with the chunk containing `pos` loaded
    TrackingBlock { world: WorldKey, pos: BlockPos },
}

/// Receives full anchor snapshots after each simulation step.
pub trait Observer {
    fn notify(&mut self, snapshot: &FastenerSnapshot, audience: &Audience);
}
