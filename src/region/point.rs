use super::{read_vec3, Region, RegionShape};
use crate::block_position::BlockPosition;
use crate::error::DecodeError;
use crate::vec3::Vec3;
use quartz_nbt::NbtCompound;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single point, such as a spawn or chest position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRegion {
    pub position: Vec3,
}

impl PointRegion {
    pub const TYPE_ID: &'static str = "point";

    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    pub fn from_nbt(compound: &NbtCompound) -> Result<Self, DecodeError> {
        Ok(Self::new(read_vec3(compound, "position")?))
    }
}

impl RegionShape for PointRegion {
    fn occupied_cells(&self, offset: Vec3) -> HashSet<BlockPosition> {
        HashSet::from([(self.position + offset).floor()])
    }

    fn contains(&self, point: Vec3, offset: Vec3) -> bool {
        point.floor() == (self.position + offset).floor()
    }

    fn with_offset(&self, delta: Vec3) -> Region {
        Region::Point(Self::new(self.position + delta))
    }

    fn write_nbt(&self, compound: &mut NbtCompound) {
        compound.insert("position", self.position.to_nbt());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_floors_into_cell() {
        let point = PointRegion::new(Vec3::new(0.5, 64.0, -0.25));
        assert_eq!(
            point.occupied_cells(Vec3::ZERO),
            HashSet::from([BlockPosition::new(0, 64, -1)])
        );
        assert_eq!(
            point.occupied_cells(Vec3::new(10.0, 0.0, 0.0)),
            HashSet::from([BlockPosition::new(10, 64, -1)])
        );
    }

    #[test]
    fn test_point_contains_same_cell_only() {
        let point = PointRegion::new(Vec3::new(2.0, 0.0, 2.0));
        assert!(point.contains(Vec3::new(2.9, 0.5, 2.1), Vec3::ZERO));
        assert!(!point.contains(Vec3::new(3.0, 0.0, 2.0), Vec3::ZERO));
        assert!(point.contains(Vec3::new(3.5, 0.0, 2.0), Vec3::new(1.0, 0.0, 0.0)));
    }
}
