use crate::block_position::BlockPosition;
use serde::{Deserialize, Serialize};

/// An inclusive axis-aligned box of lattice cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: BlockPosition,
    pub max: BlockPosition,
}

impl BoundingBox {
    /// Builds a box from two opposite corners given in any order.
    pub fn new(a: BlockPosition, b: BlockPosition) -> Self {
        BoundingBox {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// The box covering `position + [0, size)`. Returns `None` for an empty size.
    pub fn from_position_and_size(position: BlockPosition, size: BlockPosition) -> Option<Self> {
        if size.x <= 0 || size.y <= 0 || size.z <= 0 {
            return None;
        }
        Some(BoundingBox {
            min: position,
            max: position + size - BlockPosition::new(1, 1, 1),
        })
    }

    /// Per-axis block count.
    pub fn get_dimensions(&self) -> BlockPosition {
        self.max - self.min + BlockPosition::new(1, 1, 1)
    }

    pub fn volume(&self) -> u64 {
        let d = self.get_dimensions();
        d.x as u64 * d.y as u64 * d.z as u64
    }

    pub fn contains(&self, pos: BlockPosition) -> bool {
        pos.x >= self.min.x
            && pos.x <= self.max.x
            && pos.y >= self.min.y
            && pos.y <= self.max.y
            && pos.z >= self.min.z
            && pos.z <= self.max.z
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Calls `f` for every cell, x fastest, then z, then y.
    pub fn for_each_position<F>(&self, mut f: F)
    where
        F: FnMut(BlockPosition),
    {
        for y in self.min.y..=self.max.y {
            for z in self.min.z..=self.max.z {
                for x in self.min.x..=self.max.x {
                    f(BlockPosition::new(x, y, z));
                }
            }
        }
    }

    pub fn positions(&self) -> Vec<BlockPosition> {
        let mut positions = Vec::with_capacity(self.volume() as usize);
        self.for_each_position(|pos| positions.push(pos));
        positions
    }
}

/// Grows a box to cover every position it is told about.
///
/// Callers feed it from the same call that performs a write, so the tracked
/// bounds always reflect what has actually been written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundsAccumulator {
    bounds: Option<BoundingBox>,
}

impl BoundsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(bounds: BoundingBox) -> Self {
        BoundsAccumulator {
            bounds: Some(bounds),
        }
    }

    pub fn include(&mut self, pos: BlockPosition) {
        match &mut self.bounds {
            Some(bounds) => {
                bounds.min = bounds.min.min(pos);
                bounds.max = bounds.max.max(pos);
            }
            None => self.bounds = Some(BoundingBox::new(pos, pos)),
        }
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }
}
