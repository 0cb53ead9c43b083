use super::{read_vec3, Region, RegionShape};
use crate::block_position::BlockPosition;
use crate::error::DecodeError;
use crate::vec3::Vec3;
use quartz_nbt::NbtCompound;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A box spanning from `root_position` to `root_position + size`.
///
/// `size` may be negative on any axis; the box is normalized before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CuboidRegion {
    pub root_position: Vec3,
    pub size: Vec3,
}

impl CuboidRegion {
    pub const TYPE_ID: &'static str = "cuboid";

    pub fn new(root_position: Vec3, size: Vec3) -> Self {
        Self {
            root_position,
            size,
        }
    }

    /// Normalized `(min, max)` corners of the continuous box.
    pub fn corners(&self, offset: Vec3) -> (Vec3, Vec3) {
        let start = self.root_position + offset;
        let end = start + self.size;
        (start.min(end), start.max(end))
    }

    pub fn from_nbt(compound: &NbtCompound) -> Result<Self, DecodeError> {
        Ok(Self::new(
            read_vec3(compound, "root_position")?,
            read_vec3(compound, "size")?,
        ))
    }
}

/// Lattice range of the cells overlapping `[min, max)` on one axis.
///
/// Bounds outside the `i32` lattice saturate to its edge; non-finite bounds cover nothing.
#[allow(clippy::reversed_empty_ranges)]
fn cell_span(min: f64, max: f64) -> std::ops::RangeInclusive<i32> {
    if !(min.is_finite() && max.is_finite()) {
        return 1..=0;
    }
    (min.floor() as i32)..=((max.ceil() - 1.0) as i32)
}

impl RegionShape for CuboidRegion {
    fn occupied_cells(&self, offset: Vec3) -> HashSet<BlockPosition> {
        let (min, max) = self.corners(offset);
        let mut cells = HashSet::new();
        for x in cell_span(min.x, max.x) {
            for y in cell_span(min.y, max.y) {
                for z in cell_span(min.z, max.z) {
                    cells.insert(BlockPosition::new(x, y, z));
                }
            }
        }
        cells
    }

    fn contains(&self, point: Vec3, offset: Vec3) -> bool {
        let (min, max) = self.corners(offset);
        point.x >= min.x
            && point.x < max.x
            && point.y >= min.y
            && point.y < max.y
            && point.z >= min.z
            && point.z < max.z
    }

    fn with_offset(&self, delta: Vec3) -> Region {
        Region::Cuboid(Self::new(self.root_position + delta, self.size))
    }

    fn write_nbt(&self, compound: &mut NbtCompound) {
        compound.insert("root_position", self.root_position.to_nbt());
        compound.insert("size", self.size.to_nbt());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cube_of_two() {
        let cuboid = CuboidRegion::new(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0));
        let cells = cuboid.occupied_cells(Vec3::ZERO);

        let mut expected = HashSet::new();
        for x in 0..2 {
            for y in 0..2 {
                for z in 0..2 {
                    expected.insert(BlockPosition::new(x, y, z));
                }
            }
        }
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_negative_size_is_normalized() {
        let forward = CuboidRegion::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 2.0, 1.0));
        let backward = CuboidRegion::new(Vec3::new(4.0, 3.0, 2.0), Vec3::new(-3.0, -2.0, -1.0));
        assert_eq!(
            forward.occupied_cells(Vec3::ZERO),
            backward.occupied_cells(Vec3::ZERO)
        );
        assert_eq!(forward.occupied_cells(Vec3::ZERO).len(), 6);
    }

    #[test]
    fn test_fractional_bounds_cover_touched_cells() {
        let cuboid = CuboidRegion::new(Vec3::new(0.5, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(
            cuboid.occupied_cells(Vec3::ZERO),
            HashSet::from([BlockPosition::new(0, 0, 0), BlockPosition::new(1, 0, 0)])
        );
    }

    #[test]
    fn test_contains_is_half_open() {
        let cuboid = CuboidRegion::new(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0));
        assert!(cuboid.contains(Vec3::new(0.0, 1.99, 1.0), Vec3::ZERO));
        assert!(!cuboid.contains(Vec3::new(2.0, 1.0, 1.0), Vec3::ZERO));
        assert!(cuboid.contains(Vec3::new(12.0, 1.0, 1.0), Vec3::new(11.0, 0.0, 0.0)));
    }

    #[test]
    fn test_far_root_saturates_to_lattice_edge() {
        let far = CuboidRegion::new(Vec3::new(-3.0e9, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(
            far.occupied_cells(Vec3::ZERO),
            HashSet::from([BlockPosition::new(i32::MIN, 0, 0)])
        );

        let unbounded = CuboidRegion::new(Vec3::new(f64::NEG_INFINITY, 0.0, 0.0), Vec3::ZERO);
        assert!(unbounded.occupied_cells(Vec3::ZERO).is_empty());
    }

    #[test]
    fn test_zero_size_occupies_nothing() {
        let flat = CuboidRegion::new(Vec3::ZERO, Vec3::new(4.0, 0.0, 4.0));
        assert!(flat.occupied_cells(Vec3::ZERO).is_empty());
    }
}
