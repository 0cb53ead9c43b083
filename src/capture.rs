use crate::block_position::BlockPosition;
use crate::block_state::BlockState;
use crate::blueprint::{Blueprint, ExtraData, PalettedState};
use crate::bounding_box::BoundingBox;
use crate::markers::RegionMarkers;
use crate::world::WorldReader;
use rustc_hash::FxHashMap;
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// Reads the inclusive box between `min` and `max` (any corner order) into a blueprint.
///
/// Marker cells become regions instead of palette entries. Structured data is kept for
/// every cell that has some, marker or not.
pub fn capture(
    reader: &dyn WorldReader,
    markers: &dyn RegionMarkers,
    min: BlockPosition,
    max: BlockPosition,
) -> Blueprint {
    let start = Instant::now();
    let bounds = BoundingBox::new(min, max);

    let mut palette: Vec<BlockState> = Vec::new();
    let mut palette_index: FxHashMap<BlockState, usize> = FxHashMap::default();
    let mut cells = Vec::new();
    let mut extra = HashMap::new();
    let mut regions = HashMap::new();

    bounds.for_each_position(|world_pos| {
        let relative = world_pos - bounds.min;
        let state = reader.get_block(world_pos);

        if markers.is_region_marker(&state) {
            if let Some(region) = markers.to_region(reader, world_pos, relative) {
                let id = markers.marker_identifier(reader, world_pos);
                regions.insert(id, region);
            }
        } else if !state.is_air() {
            let index = match palette_index.get(&state) {
                Some(&index) => index,
                None => {
                    let index = palette.len();
                    palette_index.insert(state.clone(), index);
                    palette.push(state);
                    index
                }
            };
            cells.push(PalettedState::new(relative, index));
        }

        if let Some(payload) = reader.get_block_data(world_pos) {
            extra.insert(relative, ExtraData::new(relative, payload));
        }
    });

    let blueprint = Blueprint {
        palette,
        cells,
        extra,
        size: bounds.get_dimensions(),
        regions,
    };

    debug!(
        min = %bounds.min,
        max = %bounds.max,
        cells = blueprint.cells.len(),
        palette = blueprint.palette.len(),
        regions = blueprint.regions.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Captured blueprint"
    );

    blueprint
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{MemoryWorld, WorldWriter};

    #[test]
    fn test_palette_is_first_seen_and_unique() {
        let mut world = MemoryWorld::new();
        world.set_block(BlockPosition::new(0, 0, 0), BlockState::new("minecraft:dirt"));
        world.set_block(BlockPosition::new(1, 0, 0), BlockState::new("minecraft:stone"));
        world.set_block(BlockPosition::new(2, 0, 0), BlockState::new("minecraft:dirt"));

        let bp = capture(&world, &(), BlockPosition::new(2, 0, 0), BlockPosition::new(0, 0, 0));

        assert_eq!(
            bp.palette,
            vec![BlockState::new("minecraft:dirt"), BlockState::new("minecraft:stone")]
        );
        assert_eq!(
            bp.cells.iter().map(|c| c.palette_index).collect::<Vec<_>>(),
            vec![0, 1, 0]
        );
        assert_eq!(bp.size, BlockPosition::new(3, 1, 1));
    }

    #[test]
    fn test_offsets_are_relative_to_min_corner() {
        let mut world = MemoryWorld::new();
        world.set_block(BlockPosition::new(-5, 70, 12), BlockState::new("minecraft:glass"));

        let bp = capture(
            &world,
            &(),
            BlockPosition::new(-6, 70, 10),
            BlockPosition::new(-4, 71, 12),
        );

        assert_eq!(bp.cells, vec![PalettedState::new(BlockPosition::new(1, 0, 2), 0)]);
        assert_eq!(bp.size, BlockPosition::new(3, 2, 3));
    }
}
