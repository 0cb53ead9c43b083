use crate::block_position::BlockPosition;
use crate::block_state::BlockState;
use crate::blueprint::{read_position, Blueprint};
use crate::bounding_box::BoundingBox;
use crate::error::DecodeError;
use crate::placement;
use crate::processor::BlockStateProcessor;
use crate::region::{Region, RegionShape};
use crate::vec3::Vec3;
use crate::world::WorldWriter;
use quartz_nbt::NbtCompound;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use tracing::warn;

/// A blueprint bound to the position it was placed at.
#[derive(Debug, Clone)]
pub struct PlacedBlueprint {
    blueprint: Arc<Blueprint>,
    position: BlockPosition,
    positions: OnceLock<HashSet<BlockPosition>>,
}

impl PlacedBlueprint {
    pub(crate) fn new(blueprint: Arc<Blueprint>, position: BlockPosition) -> Self {
        Self {
            blueprint,
            position,
            positions: OnceLock::new(),
        }
    }

    pub fn blueprint(&self) -> &Arc<Blueprint> {
        &self.blueprint
    }

    pub fn position(&self) -> BlockPosition {
        self.position
    }

    pub fn offset(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    pub fn center(&self) -> BlockPosition {
        self.position + self.blueprint.center()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_position_and_size(self.position, self.blueprint.size)
    }

    /// Every cell of the placed bounding box, computed on first use.
    pub fn positions(&self) -> &HashSet<BlockPosition> {
        self.positions.get_or_init(|| {
            self.bounding_box()
                .map(|bbox| bbox.positions().into_iter().collect())
                .unwrap_or_default()
        })
    }

    pub fn for_each_position<F>(&self, f: F)
    where
        F: FnMut(&BlockPosition),
    {
        self.positions().iter().for_each(f);
    }

    /// Writes the source blueprint again at the same position.
    pub fn place<W>(&self, world: &mut W, processor: Option<&dyn BlockStateProcessor>) -> PlacedBlueprint
    where
        W: WorldWriter + ?Sized,
    {
        placement::place(&self.blueprint, world, self.position, processor)
    }

    /// Overwrites the whole placed box with air.
    pub fn clear<W>(&self, world: &mut W)
    where
        W: WorldWriter + ?Sized,
    {
        for &pos in self.positions() {
            world.set_block(pos, BlockState::air());
        }
    }

    /// The named region in world coordinates, or `Region::Empty` if there is none.
    pub fn get_region(&self, id: &str) -> Region {
        match self.blueprint.regions.get(id) {
            Some(region) => region.with_offset(self.offset()),
            None => {
                warn!(region_id = %id, "Tried to access blueprint region but it was not present");
                Region::Empty
            }
        }
    }

    /// The found regions as one compound in world coordinates. Misses are reported together.
    pub fn get_regions_combined<S: AsRef<str>>(&self, ids: &[S]) -> Region {
        let mut found = Vec::new();
        let mut missing = Vec::new();
        for id in ids {
            match self.blueprint.regions.get(id.as_ref()) {
                Some(region) => found.push(region.clone()),
                None => missing.push(id.as_ref()),
            }
        }

        if !missing.is_empty() {
            warn!(
                missing = ?missing,
                "Tried to access blueprint regions but they were not present"
            );
        }

        if found.is_empty() {
            return Region::Empty;
        }
        Region::compound(found, Some(self.offset()))
    }

    /// World position of a point region; `None` if absent or not a point.
    pub fn point_region_pos(&self, id: &str) -> Option<Vec3> {
        match self.get_region(id) {
            Region::Point(point) => Some(point.position),
            Region::Empty => None,
            other => {
                warn!(region_id = %id, region_type = ?other.type_id(), "Region is not a point region");
                None
            }
        }
    }

    pub fn point_region_block_pos(&self, id: &str) -> Option<BlockPosition> {
        self.point_region_pos(id).map(|pos| pos.floor())
    }

    /// Whether the world-space point lies inside the named region.
    pub fn region_contains(&self, id: &str, point: Vec3) -> bool {
        self.get_region(id).contains(point, Vec3::ZERO)
    }

    pub fn to_nbt(&self) -> NbtCompound {
        let mut compound = NbtCompound::new();
        compound.insert("source_blueprint", self.blueprint.to_nbt());
        compound.insert("placed_position", self.position.to_nbt());
        compound
    }

    pub fn from_nbt(compound: &NbtCompound) -> Result<Self, DecodeError> {
        let source = compound
            .get::<_, &NbtCompound>("source_blueprint")
            .map_err(|e| DecodeError::Malformed(format!("source_blueprint: {}", e)))?;
        let blueprint = Blueprint::from_nbt(source)?;
        let position = read_position(compound, "placed_position")?;
        Ok(Self::new(Arc::new(blueprint), position))
    }
}

impl PartialEq for PlacedBlueprint {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.blueprint == other.blueprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with_regions() -> PlacedBlueprint {
        let mut regions = HashMap::new();
        regions.insert("spawn".to_string(), Region::point(Vec3::new(1.5, 0.0, 1.5)));
        regions.insert(
            "arena".to_string(),
            Region::cuboid(Vec3::ZERO, Vec3::new(2.0, 1.0, 2.0)),
        );
        let blueprint = Blueprint {
            size: BlockPosition::new(2, 1, 2),
            regions,
            ..Blueprint::default()
        };
        PlacedBlueprint::new(Arc::new(blueprint), BlockPosition::new(100, 64, -20))
    }

    #[test]
    fn test_missing_region_is_empty() {
        let placed = with_regions();
        let region = placed.get_region("missing_id");
        assert_eq!(region, Region::Empty);
        assert!(region.block_positions().is_empty());
    }

    #[test]
    fn test_region_is_world_absolute() {
        let placed = with_regions();
        assert_eq!(
            placed.point_region_pos("spawn"),
            Some(Vec3::new(101.5, 64.0, -18.5))
        );
        assert_eq!(
            placed.point_region_block_pos("spawn"),
            Some(BlockPosition::new(101, 64, -19))
        );
        assert_eq!(placed.point_region_pos("arena"), None);
        assert!(placed.region_contains("arena", Vec3::new(101.9, 64.5, -19.0)));
    }

    #[test]
    fn test_combined_regions_skip_misses() {
        let placed = with_regions();
        let combined = placed.get_regions_combined(&["spawn", "nope"]);
        assert_eq!(
            combined.block_positions(),
            HashSet::from([BlockPosition::new(101, 64, -19)])
        );
        assert_eq!(placed.get_regions_combined(&["nope", "also_nope"]), Region::Empty);
    }

    #[test]
    fn test_positions_cover_full_box() {
        let placed = with_regions();
        assert_eq!(placed.positions().len(), 4);
        assert!(placed.positions().contains(&BlockPosition::new(101, 64, -19)));
        assert_eq!(placed.center(), BlockPosition::new(101, 64, -19));
    }
}
