use crate::block_position::BlockPosition;
use crate::block_state::BlockState;
use crate::nbt_value::NbtMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

/// Read access to a voxel surface.
///
/// Reads are total: an unset cell reads as air.
pub trait WorldReader {
    fn get_block(&self, pos: BlockPosition) -> BlockState;

    /// Structured state attached to the cell, if it has any.
    fn get_block_data(&self, pos: BlockPosition) -> Option<NbtMap>;
}

/// Write access to a voxel surface. Writes are best effort.
pub trait WorldWriter: WorldReader {
    fn set_block(&mut self, pos: BlockPosition, state: BlockState);

    /// The structured state living at `pos` after a write, if the block kind carries one.
    fn block_data_mut(&mut self, pos: BlockPosition) -> Option<&mut NbtMap>;
}

/// A sparse in-memory voxel surface.
///
/// Blocks whose name has been registered with [`MemoryWorld::register_block_entity`]
/// get an empty structured state when written, mirroring how a host world creates a
/// block entity alongside the block.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorld {
    blocks: FxHashMap<BlockPosition, BlockState>,
    block_data: FxHashMap<BlockPosition, NbtMap>,
    block_entity_kinds: FxHashSet<SmolStr>,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_block_entity(&mut self, name: impl Into<SmolStr>) {
        self.block_entity_kinds.insert(name.into());
    }

    pub fn carries_block_entity(&self, state: &BlockState) -> bool {
        self.block_entity_kinds.contains(&state.name)
    }

    /// Replaces the structured state at `pos` whatever block lives there.
    pub fn set_block_data(&mut self, pos: BlockPosition, data: NbtMap) {
        self.block_data.insert(pos, data);
    }

    /// Number of non-air cells.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn iter_blocks(&self) -> impl Iterator<Item = (&BlockPosition, &BlockState)> {
        self.blocks.iter()
    }
}

impl WorldReader for MemoryWorld {
    fn get_block(&self, pos: BlockPosition) -> BlockState {
        self.blocks.get(&pos).cloned().unwrap_or_default()
    }

    fn get_block_data(&self, pos: BlockPosition) -> Option<NbtMap> {
        self.block_data.get(&pos).cloned()
    }
}

impl WorldWriter for MemoryWorld {
    fn set_block(&mut self, pos: BlockPosition, state: BlockState) {
        if self.carries_block_entity(&state) {
            self.block_data.entry(pos).or_default();
        } else {
            self.block_data.remove(&pos);
        }

        if state.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, state);
        }
    }

    fn block_data_mut(&mut self, pos: BlockPosition) -> Option<&mut NbtMap> {
        self.block_data.get_mut(&pos)
    }
}
