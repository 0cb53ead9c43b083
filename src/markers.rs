use crate::block_position::BlockPosition;
use crate::block_state::BlockState;
use crate::nbt_value::NbtValue;
use crate::region::Region;
use crate::vec3::Vec3;
use crate::world::WorldReader;
use md5::{Digest, Md5};
use tracing::warn;
use uuid::{Builder, Uuid};

pub const POINT_REGION_MARKER: &str = "blueprint:point_region";
pub const CUBOID_REGION_MARKER: &str = "blueprint:cuboid_region";
pub const SPHERE_REGION_MARKER: &str = "blueprint:sphere_region";

/// Key of the marker data holding a caller-chosen region id.
pub const REGION_ID_KEY: &str = "region_id";

/// Recognizes marker cells during capture and turns them into regions.
pub trait RegionMarkers {
    fn is_region_marker(&self, state: &BlockState) -> bool;

    /// Builds the region for the marker at `world_pos`, rooted at `relative`.
    ///
    /// `None` means the marker could not be read; capture then skips the cell.
    fn to_region(
        &self,
        reader: &dyn WorldReader,
        world_pos: BlockPosition,
        relative: BlockPosition,
    ) -> Option<Region>;

    /// Identifier the region is stored under. Must be stable for one physical marker.
    fn marker_identifier(&self, reader: &dyn WorldReader, world_pos: BlockPosition) -> String;
}

/// No markers at all: every cell is captured as an ordinary block.
impl RegionMarkers for () {
    fn is_region_marker(&self, _state: &BlockState) -> bool {
        false
    }

    fn to_region(
        &self,
        _reader: &dyn WorldReader,
        _world_pos: BlockPosition,
        _relative: BlockPosition,
    ) -> Option<Region> {
        None
    }

    fn marker_identifier(&self, _reader: &dyn WorldReader, world_pos: BlockPosition) -> String {
        world_pos.to_short_string()
    }
}

/// The built-in marker blocks.
///
/// * `blueprint:point_region` becomes a point at the marker's cell.
/// * `blueprint:cuboid_region` becomes a cuboid rooted at the cell, sized by the `size`
///   int array in the marker's data.
/// * `blueprint:sphere_region` becomes a sphere centered on the cell with the `radius`
///   from the marker's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerBlocks {
    world_key: String,
}

impl MarkerBlocks {
    /// `world_key` names the source world; it seeds generated identifiers.
    pub fn new(world_key: impl Into<String>) -> Self {
        Self {
            world_key: world_key.into(),
        }
    }

    /// Name-based identifier for a marker that was never given one.
    ///
    /// A version 3 UUID over the bytes of `world_key` followed by the short position
    /// string, hashed without a namespace prefix so ids match those already stored in
    /// existing worlds.
    pub fn generated_identifier(&self, world_pos: BlockPosition) -> String {
        let name = format!("{}{}", self.world_key, world_pos.to_short_string());
        name_uuid(name.as_bytes()).to_string()
    }
}

fn name_uuid(name: &[u8]) -> Uuid {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&Md5::digest(name));
    Builder::from_md5_bytes(bytes).into_uuid()
}

impl Default for MarkerBlocks {
    fn default() -> Self {
        Self::new("minecraft:overworld")
    }
}

impl RegionMarkers for MarkerBlocks {
    fn is_region_marker(&self, state: &BlockState) -> bool {
        matches!(
            state.get_name(),
            POINT_REGION_MARKER | CUBOID_REGION_MARKER | SPHERE_REGION_MARKER
        )
    }

    fn to_region(
        &self,
        reader: &dyn WorldReader,
        world_pos: BlockPosition,
        relative: BlockPosition,
    ) -> Option<Region> {
        let state = reader.get_block(world_pos);
        let root = Vec3::from(relative);

        match state.get_name() {
            POINT_REGION_MARKER => Some(Region::point(root)),
            CUBOID_REGION_MARKER => {
                let data = reader.get_block_data(world_pos);
                let size = match data.as_ref().and_then(|d| d.get("size")) {
                    Some(NbtValue::IntArray(size)) if size.len() == 3 => {
                        Vec3::new(size[0] as f64, size[1] as f64, size[2] as f64)
                    }
                    _ => {
                        warn!(position = %world_pos, "Cuboid region marker has no readable size");
                        return None;
                    }
                };
                Some(Region::cuboid(root, size))
            }
            SPHERE_REGION_MARKER => {
                let radius = reader
                    .get_block_data(world_pos)
                    .and_then(|d| d.get("radius").and_then(NbtValue::as_f64));
                match radius {
                    Some(radius) => Some(Region::sphere(root, radius)),
                    None => {
                        warn!(position = %world_pos, "Sphere region marker has no readable radius");
                        None
                    }
                }
            }
            _ => None,
        }
    }

    fn marker_identifier(&self, reader: &dyn WorldReader, world_pos: BlockPosition) -> String {
        reader
            .get_block_data(world_pos)
            .and_then(|data| data.get(REGION_ID_KEY).and_then(|v| v.as_str().map(String::from)))
            .unwrap_or_else(|| self.generated_identifier(world_pos))
    }
}
