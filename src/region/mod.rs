mod compound;
mod cuboid;
mod point;
mod sphere;

pub use compound::CompoundRegion;
pub use cuboid::CuboidRegion;
pub use point::PointRegion;
pub use sphere::SphericalRegion;

use crate::block_position::BlockPosition;
use crate::error::DecodeError;
use crate::vec3::Vec3;
use quartz_nbt::NbtCompound;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Key holding the type tag of an encoded region.
pub const TYPE_KEY: &str = "type";

/// Behaviour shared by every concrete region variant.
pub trait RegionShape {
    /// Every lattice cell this region occupies when observed with `offset` applied.
    fn occupied_cells(&self, offset: Vec3) -> HashSet<BlockPosition>;

    /// Whether the continuous point lies inside the region with `offset` applied.
    fn contains(&self, point: Vec3, offset: Vec3) -> bool;

    /// The same region observed from a frame translated by `delta`.
    fn with_offset(&self, delta: Vec3) -> Region;

    /// Variant fields, without the type tag.
    fn write_nbt(&self, compound: &mut NbtCompound);
}

macro_rules! delegate_region {
    ($self:expr, $empty:expr, $method:ident $(, $arg:expr)*) => {
        match $self {
            Region::Point(r) => r.$method($($arg),*),
            Region::Cuboid(r) => r.$method($($arg),*),
            Region::Sphere(r) => r.$method($($arg),*),
            Region::Compound(r) => r.$method($($arg),*),
            Region::Empty => $empty,
        }
    };
}

/// A named volume or point attached to a blueprint.
///
/// `Empty` is the in-memory answer to a failed lookup. It occupies nothing,
/// contains nothing and is never encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Region {
    Point(PointRegion),
    Cuboid(CuboidRegion),
    Sphere(SphericalRegion),
    Compound(CompoundRegion),
    Empty,
}

impl Region {
    pub fn point(position: Vec3) -> Self {
        Region::Point(PointRegion::new(position))
    }

    pub fn cuboid(root_position: Vec3, size: Vec3) -> Self {
        Region::Cuboid(CuboidRegion::new(root_position, size))
    }

    pub fn sphere(root_position: Vec3, radius: f64) -> Self {
        Region::Sphere(SphericalRegion::new(root_position, radius))
    }

    pub fn compound(regions: impl IntoIterator<Item = Region>, global_offset: Option<Vec3>) -> Self {
        Region::Compound(CompoundRegion::new(regions, global_offset))
    }

    pub fn is_empty_region(&self) -> bool {
        matches!(self, Region::Empty)
    }

    /// Stable type tag; `None` for `Empty`.
    pub fn type_id(&self) -> Option<&'static str> {
        match self {
            Region::Point(_) => Some(PointRegion::TYPE_ID),
            Region::Cuboid(_) => Some(CuboidRegion::TYPE_ID),
            Region::Sphere(_) => Some(SphericalRegion::TYPE_ID),
            Region::Compound(_) => Some(CompoundRegion::TYPE_ID),
            Region::Empty => None,
        }
    }

    /// Cells occupied with no extra offset.
    pub fn block_positions(&self) -> HashSet<BlockPosition> {
        self.occupied_cells(Vec3::ZERO)
    }

    pub fn for_each_position<F>(&self, f: F)
    where
        F: FnMut(BlockPosition),
    {
        self.block_positions().into_iter().for_each(f);
    }

    /// Encodes the region with its type tag. `Empty` has no encoded form.
    pub fn to_nbt(&self) -> Option<NbtCompound> {
        let type_id = self.type_id()?;
        let mut compound = NbtCompound::new();
        compound.insert(TYPE_KEY, type_id.to_string());
        self.write_nbt(&mut compound);
        Some(compound)
    }

    /// Reads the type tag, then hands the compound to that type's decoder.
    pub fn from_nbt(compound: &NbtCompound) -> Result<Self, DecodeError> {
        let type_id = compound
            .get::<_, &str>(TYPE_KEY)
            .map_err(|e| DecodeError::Malformed(format!("region type tag: {}", e)))?;

        // Older encodings namespaced the tag.
        let type_id = type_id.strip_prefix("blueprint:").unwrap_or(type_id);

        match type_id {
            PointRegion::TYPE_ID => PointRegion::from_nbt(compound).map(Region::Point),
            CuboidRegion::TYPE_ID => CuboidRegion::from_nbt(compound).map(Region::Cuboid),
            SphericalRegion::TYPE_ID => SphericalRegion::from_nbt(compound).map(Region::Sphere),
            CompoundRegion::TYPE_ID => CompoundRegion::from_nbt(compound).map(Region::Compound),
            other => Err(DecodeError::UnknownRegionType(other.to_string())),
        }
    }
}

impl RegionShape for Region {
    fn occupied_cells(&self, offset: Vec3) -> HashSet<BlockPosition> {
        delegate_region!(self, HashSet::new(), occupied_cells, offset)
    }

    fn contains(&self, point: Vec3, offset: Vec3) -> bool {
        delegate_region!(self, false, contains, point, offset)
    }

    fn with_offset(&self, delta: Vec3) -> Region {
        delegate_region!(self, Region::Empty, with_offset, delta)
    }

    fn write_nbt(&self, compound: &mut NbtCompound) {
        delegate_region!(self, (), write_nbt, compound)
    }
}

pub(crate) fn read_vec3(compound: &NbtCompound, key: &str) -> Result<Vec3, DecodeError> {
    let tag = compound
        .get::<_, &quartz_nbt::NbtTag>(key)
        .map_err(|e| DecodeError::Malformed(format!("region field {}: {}", key, e)))?;
    Vec3::from_nbt(tag)
}
