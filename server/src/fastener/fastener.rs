use festoon_shared::{BlockPos, Facing, PlayerKey, WorldKey};

use crate::{host::Audience, key_generator::FastenerKey};

use super::anchor_state::AnchorState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FastenerKind {
    Block,
    Player,
    Fence,
}

/// Where an anchor lives. Immutable for the lifetime of a [`Fastener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnchorSite {
    /// A placed fastener block, attached to the face it was placed against
    Block {
        world: WorldKey,
        pos: BlockPos,
        facing: Facing,
    },
    /// The acting player; holds the dangling end of a pending connection
    Player(PlayerKey),
    /// A transient anchor spawned on a fence post
    Fence { world: WorldKey, pos: BlockPos },
}

impl AnchorSite {
    pub fn kind(&self) -> FastenerKind {
        match self {
            AnchorSite::Block { .. } => FastenerKind::Block,
            AnchorSite::Player(_) => FastenerKind::Player,
            AnchorSite::Fence { .. } => FastenerKind::Fence,
        }
    }

    /// The world a static anchor is bound to. Players move between worlds.
    pub fn fixed_world(&self) -> Option<WorldKey> {
        match self {
            AnchorSite::Block { world, .. } | AnchorSite::Fence { world, .. } => Some(*world),
            AnchorSite::Player(_) => None,
        }
    }

    pub fn pos(&self) -> Option<BlockPos> {
        match self {
            AnchorSite::Block { pos, .. } | AnchorSite::Fence { pos, .. } => Some(*pos),
            AnchorSite::Player(_) => None,
        }
    }

    pub fn audience(&self) -> Audience {
        match self {
            AnchorSite::Block { world, pos, .. } | AnchorSite::Fence { world, pos } => {
                Audience::TrackingBlock {
                    world: *world,
                    pos: *pos,
                }
            }
            AnchorSite::Player(player) => Audience::TrackingPlayer(*player),
        }
    }

    // Block anchors are unique per position regardless of facing.
    pub(crate) fn index(&self) -> SiteIndex {
        match self {
            AnchorSite::Block { world, pos, .. } => SiteIndex::Block(*world, *pos),
            AnchorSite::Player(player) => SiteIndex::Player(*player),
            AnchorSite::Fence { world, pos } => SiteIndex::Fence(*world, *pos),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum SiteIndex {
    Block(WorldKey, BlockPos),
    Player(PlayerKey),
    Fence(WorldKey, BlockPos),
}

/// An anchor capable of holding connections.
#[derive(Clone, Debug)]
pub struct Fastener {
    key: FastenerKey,
    site: AnchorSite,
    state: AnchorState,
}

impl Fastener {
    pub(crate) fn new(key: FastenerKey, site: AnchorSite) -> Self {
        Self {
            key,
            site,
            state: AnchorState::new(site.fixed_world()),
        }
    }

    pub fn key(&self) -> FastenerKey {
        self.key
    }

    pub fn site(&self) -> &AnchorSite {
        &self.site
    }

    pub fn kind(&self) -> FastenerKind {
        self.site.kind()
    }

    pub fn state(&self) -> &AnchorState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut AnchorState {
        &mut self.state
    }

    pub fn world(&self) -> Option<WorldKey> {
        self.state.world()
    }

    pub fn is_player(&self) -> bool {
        self.kind() == FastenerKind::Player
    }

    /// Transient anchors are expired as soon as they hold nothing.
    pub fn is_transient(&self) -> bool {
        self.kind() == FastenerKind::Fence
    }
}
