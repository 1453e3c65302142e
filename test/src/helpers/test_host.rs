use std::collections::{HashMap, HashSet};

use festoon_server::{
    host::{BlockState, Cue, CueSink, Decoration, Geometry},
    AnchorSite,
};
use festoon_shared::{BlockPos, Facing, WorldKey};

/// In-memory world for driving the binding core: a sparse block map, the
/// spots where a fastener may be placed, and a log of everything the core
/// asked of it.
#[derive(Default)]
pub struct TestHost {
    blocks: HashMap<(WorldKey, BlockPos), BlockState>,
    placeable: HashSet<(WorldKey, BlockPos)>,
    decorations: HashMap<(WorldKey, BlockPos), Decoration>,
    refuse_placement: bool,
    refuse_attach: bool,
    pub placed: Vec<(WorldKey, BlockPos, Facing)>,
    pub attached: Vec<AnchorSite>,
    pub cues: Vec<Cue>,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fence(mut self, world: WorldKey, pos: BlockPos) -> Self {
        self.blocks.insert((world, pos), BlockState::Fence);
        self
    }

    pub fn with_decoration(
        mut self,
        world: WorldKey,
        pos: BlockPos,
        decoration: Decoration,
    ) -> Self {
        self.decorations.insert((world, pos), decoration);
        self
    }

    /// Allows a fastener block to be placed at `pos`.
    pub fn with_placeable(mut self, world: WorldKey, pos: BlockPos) -> Self {
        self.placeable.insert((world, pos));
        self
    }

    /// `can_place_at` still answers true, but the placement itself fails.
    pub fn refusing_placement(mut self) -> Self {
        self.refuse_placement = true;
        self
    }

    /// No host object can be attached to a new anchor.
    pub fn refusing_attach(mut self) -> Self {
        self.refuse_attach = true;
        self
    }
}

impl Geometry for TestHost {
    fn block_at(&self, world: WorldKey, pos: BlockPos) -> BlockState {
        self.blocks
            .get(&(world, pos))
            .copied()
            .unwrap_or(BlockState::Air)
    }

    fn can_place_at(&self, world: WorldKey, pos: BlockPos, _facing: Facing) -> bool {
        self.placeable.contains(&(world, pos)) && self.block_at(world, pos) == BlockState::Air
    }

    fn place_fastener(&mut self, world: WorldKey, pos: BlockPos, facing: Facing) -> bool {
        if self.refuse_placement {
            return false;
        }
        self.blocks.insert((world, pos), BlockState::Solid);
        self.placed.push((world, pos, facing));
        true
    }

    fn decoration_at(&self, world: WorldKey, pos: BlockPos) -> Option<Decoration> {
        self.decorations.get(&(world, pos)).cloned()
    }

    fn attach_anchor(&mut self, site: &AnchorSite) -> bool {
        if self.refuse_attach {
            return false;
        }
        self.attached.push(*site);
        true
    }
}

impl CueSink for TestHost {
    fn request_cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}
