use crate::block_position::BlockPosition;
use crate::block_state::BlockState;
use crate::error::DecodeError;
use crate::nbt_value::{compound_to_map, map_to_compound, NbtMap};
use crate::region::Region;
use quartz_nbt::{NbtCompound, NbtList, NbtTag};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// A non-empty cell of a blueprint, stored as an index into the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PalettedState {
    pub offset: BlockPosition,
    pub palette_index: usize,
}

impl PalettedState {
    pub fn new(offset: BlockPosition, palette_index: usize) -> Self {
        Self {
            offset,
            palette_index,
        }
    }
}

/// Structured payload captured alongside a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraData {
    pub offset: BlockPosition,
    pub payload: NbtMap,
}

impl ExtraData {
    pub fn new(offset: BlockPosition, payload: NbtMap) -> Self {
        Self { offset, payload }
    }
}

/// A palette-compressed capture of a cuboid volume together with its named regions.
///
/// Offsets are relative to the local origin and lie within `[0, size)`. A blueprint is
/// never mutated after construction; share it behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub palette: Vec<BlockState>,
    pub cells: Vec<PalettedState>,
    pub extra: HashMap<BlockPosition, ExtraData>,
    pub size: BlockPosition,
    pub regions: HashMap<String, Region>,
}

impl Blueprint {
    /// The empty blueprint: no palette, no cells, zero size, no regions.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.regions.is_empty()
    }

    pub fn center(&self) -> BlockPosition {
        self.size.half()
    }

    pub fn total_blocks(&self) -> usize {
        self.cells.len()
    }

    pub fn state_of(&self, cell: &PalettedState) -> Option<&BlockState> {
        self.palette.get(cell.palette_index)
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Visits every stored cell with its resolved state and extra payload, if any.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(BlockPosition, &BlockState, Option<&NbtMap>),
    {
        for cell in &self.cells {
            if let Some(state) = self.state_of(cell) {
                let extra = self.extra.get(&cell.offset).map(|e| &e.payload);
                f(cell.offset, state, extra);
            }
        }
    }

    pub fn to_nbt(&self) -> NbtCompound {
        let mut root = NbtCompound::new();

        let mut palette = NbtList::new();
        for state in &self.palette {
            palette.push(state.to_nbt());
        }
        root.insert("palette", palette);

        let mut cells = NbtList::new();
        for cell in &self.cells {
            let mut entry = NbtCompound::new();
            entry.insert("offset", cell.offset.to_nbt());
            entry.insert("index", cell.palette_index as i32);
            cells.push(entry);
        }
        root.insert("cells", cells);

        let mut extra = NbtList::new();
        for data in self.extra.values() {
            let mut entry = NbtCompound::new();
            entry.insert("offset", data.offset.to_nbt());
            entry.insert("payload", map_to_compound(&data.payload));
            extra.push(entry);
        }
        root.insert("extra", extra);

        root.insert("size", self.size.to_nbt());

        let mut regions = NbtCompound::new();
        for (id, region) in &self.regions {
            match region.to_nbt() {
                Some(encoded) => {
                    regions.insert(id.clone(), encoded);
                }
                None => warn!(region_id = %id, "Skipping empty region while encoding blueprint"),
            }
        }
        root.insert("regions", regions);

        root
    }

    pub fn from_nbt(root: &NbtCompound) -> Result<Self, DecodeError> {
        let mut palette = Vec::new();
        for tag in required_list(root, "palette")?.iter() {
            palette.push(BlockState::from_nbt(as_compound(tag, "palette")?)?);
        }

        let mut cells = Vec::new();
        for tag in required_list(root, "cells")?.iter() {
            let entry = as_compound(tag, "cells")?;
            let offset = read_position(entry, "offset")?;
            let index = entry
                .get::<_, i32>("index")
                .map_err(|e| DecodeError::Malformed(format!("cell index: {}", e)))?;
            let palette_index = usize::try_from(index).map_err(|_| {
                DecodeError::Malformed(format!("negative palette index {}", index))
            })?;
            if palette_index >= palette.len() {
                return Err(DecodeError::PaletteIndexOutOfRange {
                    index: palette_index,
                    palette_len: palette.len(),
                });
            }
            cells.push(PalettedState::new(offset, palette_index));
        }

        let mut extra = HashMap::new();
        if let Ok(list) = root.get::<_, &NbtList>("extra") {
            for tag in list.iter() {
                let entry = as_compound(tag, "extra")?;
                let offset = read_position(entry, "offset")?;
                let payload = entry
                    .get::<_, &NbtCompound>("payload")
                    .map(compound_to_map)
                    .map_err(|e| DecodeError::Malformed(format!("extra payload: {}", e)))?;
                extra.insert(offset, ExtraData::new(offset, payload));
            }
        }

        let size = read_position(root, "size")?;

        let mut regions = HashMap::new();
        if let Ok(compound) = root.get::<_, &NbtCompound>("regions") {
            for (id, tag) in compound.inner() {
                let region = Region::from_nbt(as_compound(tag, "regions")?)?;
                regions.insert(id.clone(), region);
            }
        }

        Ok(Blueprint {
            palette,
            cells,
            extra,
            size,
            regions,
        })
    }
}

fn required_list<'a>(root: &'a NbtCompound, key: &str) -> Result<&'a NbtList, DecodeError> {
    root.get::<_, &NbtList>(key)
        .map_err(|e| DecodeError::Malformed(format!("{}: {}", key, e)))
}

fn as_compound<'a>(tag: &'a NbtTag, context: &str) -> Result<&'a NbtCompound, DecodeError> {
    match tag {
        NbtTag::Compound(compound) => Ok(compound),
        other => Err(DecodeError::Malformed(format!(
            "{} entry is not a compound: {:?}",
            context, other
        ))),
    }
}

pub(crate) fn read_position(compound: &NbtCompound, key: &str) -> Result<BlockPosition, DecodeError> {
    let tag = compound
        .get::<_, &NbtTag>(key)
        .map_err(|e| DecodeError::Malformed(format!("{}: {}", key, e)))?;
    BlockPosition::from_nbt(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt_value::NbtValue;
    use crate::vec3::Vec3;

    fn sample() -> Blueprint {
        let mut extra = HashMap::new();
        let mut payload = NbtMap::new();
        payload.insert("Lock".to_string(), NbtValue::String("key".to_string()));
        let offset = BlockPosition::new(1, 0, 0);
        extra.insert(offset, ExtraData::new(offset, payload));

        let mut regions = HashMap::new();
        regions.insert("door".to_string(), Region::point(Vec3::new(0.5, 0.0, 0.5)));

        Blueprint {
            palette: vec![
                BlockState::new("minecraft:stone"),
                BlockState::new("minecraft:chest").with_property("facing", "north"),
            ],
            cells: vec![
                PalettedState::new(BlockPosition::new(0, 0, 0), 0),
                PalettedState::new(offset, 1),
            ],
            extra,
            size: BlockPosition::new(2, 1, 1),
            regions,
        }
    }

    #[test]
    fn test_derived_values() {
        let bp = sample();
        assert_eq!(bp.total_blocks(), 2);
        assert_eq!(bp.center(), BlockPosition::new(1, 0, 0));
        assert!(Blueprint::empty().is_empty());
        assert_eq!(Blueprint::empty().size, BlockPosition::ZERO);
    }

    #[test]
    fn test_for_each_resolves_states_and_extra() {
        let bp = sample();
        let mut seen = Vec::new();
        bp.for_each(|offset, state, extra| {
            seen.push((offset, state.get_name().to_string(), extra.is_some()))
        });
        assert_eq!(
            seen,
            vec![
                (BlockPosition::new(0, 0, 0), "minecraft:stone".to_string(), false),
                (BlockPosition::new(1, 0, 0), "minecraft:chest".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_nbt_round_trip() {
        let bp = sample();
        assert_eq!(Blueprint::from_nbt(&bp.to_nbt()).unwrap(), bp);
    }

    #[test]
    fn test_optional_fields_default_when_missing() {
        let mut root = sample().to_nbt();
        root.inner_mut().remove("extra");
        root.inner_mut().remove("regions");
        let decoded = Blueprint::from_nbt(&root).unwrap();
        assert!(decoded.extra.is_empty());
        assert!(decoded.regions.is_empty());
        assert_eq!(decoded.cells.len(), 2);
    }

    #[test]
    fn test_palette_index_is_range_checked() {
        let mut bp = sample();
        bp.cells.push(PalettedState::new(BlockPosition::ZERO, 7));
        assert!(matches!(
            Blueprint::from_nbt(&bp.to_nbt()),
            Err(DecodeError::PaletteIndexOutOfRange { index: 7, palette_len: 2 })
        ));
    }

    #[test]
    fn test_empty_region_is_not_encoded() {
        let mut bp = sample();
        bp.regions.insert("ghost".to_string(), Region::Empty);
        let decoded = Blueprint::from_nbt(&bp.to_nbt()).unwrap();
        assert!(decoded.regions.contains_key("door"));
        assert!(!decoded.regions.contains_key("ghost"));
    }
}
