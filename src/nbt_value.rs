use quartz_nbt::{NbtCompound, NbtList, NbtTag};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Structured state attached to a cell (block-entity style data).
pub type NbtMap = HashMap<String, NbtValue>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NbtValue {
    String(String),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Byte(i8),
    Short(i16),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    ByteArray(Vec<i8>),
    List(Vec<NbtValue>),
    Compound(NbtMap),
}

impl NbtValue {
    pub fn from_tag(tag: &NbtTag) -> NbtValue {
        match tag {
            NbtTag::String(s) => NbtValue::String(s.clone()),
            NbtTag::Int(i) => NbtValue::Int(*i),
            NbtTag::Long(l) => NbtValue::Long(*l),
            NbtTag::Float(f) => NbtValue::Float(*f),
            NbtTag::Double(d) => NbtValue::Double(*d),
            NbtTag::Byte(b) => NbtValue::Byte(*b),
            NbtTag::Short(s) => NbtValue::Short(*s),
            NbtTag::IntArray(arr) => NbtValue::IntArray(arr.clone()),
            NbtTag::LongArray(arr) => NbtValue::LongArray(arr.clone()),
            NbtTag::ByteArray(arr) => NbtValue::ByteArray(arr.clone()),
            NbtTag::List(list) => NbtValue::List(list.iter().map(NbtValue::from_tag).collect()),
            NbtTag::Compound(compound) => NbtValue::Compound(compound_to_map(compound)),
        }
    }

    pub fn to_tag(&self) -> NbtTag {
        match self {
            NbtValue::String(s) => NbtTag::String(s.clone()),
            NbtValue::Int(i) => NbtTag::Int(*i),
            NbtValue::Long(l) => NbtTag::Long(*l),
            NbtValue::Float(f) => NbtTag::Float(*f),
            NbtValue::Double(d) => NbtTag::Double(*d),
            NbtValue::Byte(b) => NbtTag::Byte(*b),
            NbtValue::Short(s) => NbtTag::Short(*s),
            NbtValue::IntArray(arr) => NbtTag::IntArray(arr.clone()),
            NbtValue::LongArray(arr) => NbtTag::LongArray(arr.clone()),
            NbtValue::ByteArray(arr) => NbtTag::ByteArray(arr.clone()),
            NbtValue::List(list) => {
                let tags: Vec<NbtTag> = list.iter().map(NbtValue::to_tag).collect();
                NbtTag::List(NbtList::from(tags))
            }
            NbtValue::Compound(map) => NbtTag::Compound(map_to_compound(map)),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NbtValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NbtValue::Double(d) => Some(*d),
            NbtValue::Float(f) => Some(*f as f64),
            NbtValue::Int(i) => Some(*i as f64),
            NbtValue::Long(l) => Some(*l as f64),
            NbtValue::Short(s) => Some(*s as f64),
            NbtValue::Byte(b) => Some(*b as f64),
            _ => None,
        }
    }
}

pub fn compound_to_map(compound: &NbtCompound) -> NbtMap {
    compound
        .inner()
        .iter()
        .map(|(key, value)| (key.clone(), NbtValue::from_tag(value)))
        .collect()
}

pub fn map_to_compound(map: &NbtMap) -> NbtCompound {
    let mut compound = NbtCompound::new();
    for (key, value) in map {
        compound.insert(key.clone(), value.to_tag());
    }
    compound
}

/// Shallow merge: every top-level key of `patch` overwrites the one in `target`.
pub fn merge_into(target: &mut NbtMap, patch: &NbtMap) {
    for (key, value) in patch {
        target.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_values_survive_tag_conversion() {
        let mut nested = NbtMap::new();
        nested.insert("CustomName".to_string(), NbtValue::String("Vault".to_string()));

        let mut map = NbtMap::new();
        map.insert("Lock".to_string(), NbtValue::Compound(nested));
        map.insert(
            "Items".to_string(),
            NbtValue::List(vec![NbtValue::Byte(1), NbtValue::Byte(2)]),
        );
        map.insert("Ids".to_string(), NbtValue::IntArray(vec![4, 5, 6]));

        let compound = map_to_compound(&map);
        assert_eq!(compound_to_map(&compound), map);
    }

    #[test]
    fn test_merge_overwrites_top_level_keys() {
        let mut target = NbtMap::new();
        target.insert("id".to_string(), NbtValue::String("minecraft:chest".to_string()));
        target.insert("Lock".to_string(), NbtValue::String("old".to_string()));

        let mut patch = NbtMap::new();
        patch.insert("Lock".to_string(), NbtValue::String("new".to_string()));

        merge_into(&mut target, &patch);
        assert_eq!(target.len(), 2);
        assert_eq!(target.get("Lock").and_then(NbtValue::as_str), Some("new"));
    }
}
