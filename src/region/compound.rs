use super::{read_vec3, Region, RegionShape};
use crate::block_position::BlockPosition;
use crate::blueprint::Blueprint;
use crate::error::DecodeError;
use crate::vec3::Vec3;
use quartz_nbt::{NbtCompound, NbtList, NbtTag};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A set of regions observed together, optionally shifted by `global_offset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundRegion {
    regions: Vec<Region>,
    pub global_offset: Option<Vec3>,
}

impl CompoundRegion {
    pub const TYPE_ID: &'static str = "compound";

    /// Duplicate members are collapsed; membership order is not significant.
    pub fn new(regions: impl IntoIterator<Item = Region>, global_offset: Option<Vec3>) -> Self {
        let mut members: Vec<Region> = Vec::new();
        for region in regions {
            if !members.contains(&region) {
                members.push(region);
            }
        }
        Self {
            regions: members,
            global_offset,
        }
    }

    pub fn of_regions_offset(offset: Vec3, regions: impl IntoIterator<Item = Region>) -> Self {
        Self::new(regions, Some(offset))
    }

    /// Collects the named regions of `blueprint`. Missing names are skipped.
    pub fn of<S: AsRef<str>>(blueprint: &Blueprint, keys: &[S]) -> Self {
        Self::new(
            keys.iter()
                .filter_map(|key| blueprint.regions.get(key.as_ref()).cloned()),
            None,
        )
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    fn member_offset(&self, offset: Vec3) -> Vec3 {
        offset + self.global_offset.unwrap_or(Vec3::ZERO)
    }

    pub fn from_nbt(compound: &NbtCompound) -> Result<Self, DecodeError> {
        let list = compound
            .get::<_, &NbtList>("regions")
            .map_err(|e| DecodeError::Malformed(format!("compound region members: {}", e)))?;

        let mut regions = Vec::with_capacity(list.len());
        for tag in list.iter() {
            match tag {
                NbtTag::Compound(member) => regions.push(Region::from_nbt(member)?),
                other => {
                    return Err(DecodeError::Malformed(format!(
                        "compound region member is not a compound: {:?}",
                        other
                    )))
                }
            }
        }

        let global_offset = if compound.contains_key("offset") {
            Some(read_vec3(compound, "offset")?)
        } else {
            None
        };

        Ok(Self::new(regions, global_offset))
    }
}

impl PartialEq for CompoundRegion {
    fn eq(&self, other: &Self) -> bool {
        self.global_offset == other.global_offset
            && self.regions.len() == other.regions.len()
            && self.regions.iter().all(|r| other.regions.contains(r))
    }
}

impl RegionShape for CompoundRegion {
    fn occupied_cells(&self, offset: Vec3) -> HashSet<BlockPosition> {
        let member_offset = self.member_offset(offset);
        self.regions
            .iter()
            .flat_map(|region| region.occupied_cells(member_offset))
            .collect()
    }

    fn contains(&self, point: Vec3, offset: Vec3) -> bool {
        let member_offset = self.member_offset(offset);
        self.regions
            .iter()
            .any(|region| region.contains(point, member_offset))
    }

    fn with_offset(&self, delta: Vec3) -> Region {
        Region::Compound(Self {
            regions: self.regions.clone(),
            global_offset: Some(self.global_offset.map_or(delta, |g| g + delta)),
        })
    }

    fn write_nbt(&self, compound: &mut NbtCompound) {
        let mut list = NbtList::new();
        for region in &self.regions {
            if let Some(member) = region.to_nbt() {
                list.push(member);
            }
        }
        compound.insert("regions", list);
        if let Some(offset) = self.global_offset {
            compound.insert("offset", offset.to_nbt());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse_and_order_is_ignored() {
        let a = Region::point(Vec3::new(1.0, 1.0, 1.0));
        let b = Region::sphere(Vec3::ZERO, 3.0);

        let first = CompoundRegion::new(vec![a.clone(), b.clone(), a.clone()], None);
        let second = CompoundRegion::new(vec![b, a], None);

        assert_eq!(first.regions().len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_global_offset_shifts_members() {
        let compound = CompoundRegion::of_regions_offset(
            Vec3::new(0.0, 10.0, 0.0),
            vec![Region::point(Vec3::new(1.0, 0.0, 0.0))],
        );
        assert_eq!(
            compound.occupied_cells(Vec3::new(5.0, 0.0, 0.0)),
            HashSet::from([BlockPosition::new(6, 10, 0)])
        );
        assert!(compound.contains(Vec3::new(6.5, 10.5, 0.5), Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn test_with_offset_accumulates_into_global_offset() {
        let compound = CompoundRegion::new(vec![Region::point(Vec3::ZERO)], None);
        let shifted = compound
            .with_offset(Vec3::new(1.0, 0.0, 0.0))
            .with_offset(Vec3::new(0.0, 2.0, 0.0));
        match shifted {
            Region::Compound(c) => assert_eq!(c.global_offset, Some(Vec3::new(1.0, 2.0, 0.0))),
            other => panic!("expected compound, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_members_are_not_encoded() {
        let compound = CompoundRegion::new(
            vec![Region::Empty, Region::point(Vec3::new(2.0, 2.0, 2.0))],
            None,
        );
        let mut nbt = NbtCompound::new();
        compound.write_nbt(&mut nbt);
        let decoded = CompoundRegion::from_nbt(&nbt).unwrap();
        assert_eq!(decoded.regions(), &[Region::point(Vec3::new(2.0, 2.0, 2.0))]);
        assert_eq!(decoded.global_offset, None);
    }
}
