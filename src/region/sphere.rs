use super::{read_vec3, Region, RegionShape};
use crate::block_position::BlockPosition;
use crate::error::DecodeError;
use crate::vec3::Vec3;
use quartz_nbt::NbtCompound;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A ball of `radius` around `root_position`.
///
/// Both lattice enumeration and point containment compare squared distance
/// against the squared radius; a cell belongs to the sphere when its min
/// corner does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalRegion {
    pub root_position: Vec3,
    pub radius: f64,
}

impl SphericalRegion {
    pub const TYPE_ID: &'static str = "sphere";

    pub fn new(root_position: Vec3, radius: f64) -> Self {
        Self {
            root_position,
            radius,
        }
    }

    fn within_radius(&self, point: Vec3, center: Vec3) -> bool {
        point.squared_distance(center) <= self.radius * self.radius
    }

    pub fn from_nbt(compound: &NbtCompound) -> Result<Self, DecodeError> {
        let radius = compound
            .get::<_, f64>("radius")
            .map_err(|e| DecodeError::Malformed(format!("region field radius: {}", e)))?;
        Ok(Self::new(read_vec3(compound, "root_position")?, radius))
    }
}

impl RegionShape for SphericalRegion {
    fn occupied_cells(&self, offset: Vec3) -> HashSet<BlockPosition> {
        let center = self.root_position + offset;
        let r = self.radius.abs();
        let mut cells = HashSet::new();
        if ![center.x, center.y, center.z, r].iter().all(|v| v.is_finite()) {
            return cells;
        }
        // `floor` saturates, so the bounds below stay on the `i32` lattice.
        let min = (center - Vec3::new(r, r, r)).floor();
        let max = (center + Vec3::new(r, r, r)).floor();

        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    let cell = BlockPosition::new(x, y, z);
                    if self.within_radius(Vec3::from(cell), center) {
                        cells.insert(cell);
                    }
                }
            }
        }
        cells
    }

    fn contains(&self, point: Vec3, offset: Vec3) -> bool {
        self.within_radius(point, self.root_position + offset)
    }

    fn with_offset(&self, delta: Vec3) -> Region {
        Region::Sphere(Self::new(self.root_position + delta, self.radius))
    }

    fn write_nbt(&self, compound: &mut NbtCompound) {
        compound.insert("root_position", self.root_position.to_nbt());
        compound.insert("radius", self.radius);
    }
}
