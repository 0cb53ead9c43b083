use crate::blueprint::Blueprint;
use crate::error::{DecodeError, EncodeError};
use crate::formats::manager::{BlueprintExporter, BlueprintImporter};

const MAGIC: &[u8; 4] = b"BPSN";
const VERSION: u32 = 1;
const HEADER_LEN: usize = 8;

/// Fast cache form of a blueprint: magic, little-endian version, bincode payload.
pub struct SnapshotFormat;

impl BlueprintImporter for SnapshotFormat {
    fn name(&self) -> String {
        "snapshot".to_string()
    }

    fn detect(&self, data: &[u8]) -> bool {
        data.len() >= 4 && &data[0..4] == MAGIC
    }

    fn read(&self, data: &[u8]) -> Result<Blueprint, DecodeError> {
        from_snapshot(data)
    }
}

impl BlueprintExporter for SnapshotFormat {
    fn name(&self) -> String {
        "snapshot".to_string()
    }

    fn extensions(&self) -> Vec<String> {
        vec!["bpsn".to_string()]
    }

    fn write(&self, blueprint: &Blueprint) -> Result<Vec<u8>, EncodeError> {
        to_snapshot(blueprint)
    }
}

pub fn to_snapshot(blueprint: &Blueprint) -> Result<Vec<u8>, EncodeError> {
    let payload = bincode::serialize(blueprint)?;
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&VERSION.to_le_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

pub fn from_snapshot(data: &[u8]) -> Result<Blueprint, DecodeError> {
    if data.len() < HEADER_LEN || &data[0..4] != MAGIC {
        return Err(DecodeError::UnknownFormat);
    }
    let version = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    if version != VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }
    let blueprint: Blueprint = bincode::deserialize(&data[HEADER_LEN..])?;

    if let Some(cell) = blueprint
        .cells
        .iter()
        .find(|cell| cell.palette_index >= blueprint.palette.len())
    {
        return Err(DecodeError::PaletteIndexOutOfRange {
            index: cell.palette_index,
            palette_len: blueprint.palette.len(),
        });
    }

    Ok(blueprint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_position::BlockPosition;
    use crate::block_state::BlockState;
    use crate::blueprint::PalettedState;
    use crate::region::Region;
    use crate::vec3::Vec3;

    fn sample() -> Blueprint {
        let mut bp = Blueprint {
            palette: vec![BlockState::new("minecraft:lantern").with_property("hanging", "true")],
            cells: vec![PalettedState::new(BlockPosition::new(0, 1, 0), 0)],
            size: BlockPosition::new(1, 2, 1),
            ..Blueprint::default()
        };
        bp.regions.insert(
            "zone".to_string(),
            Region::compound(vec![Region::sphere(Vec3::ZERO, 1.5)], Some(Vec3::new(0.0, 1.0, 0.0))),
        );
        bp
    }

    #[test]
    fn test_snapshot_round_trip() {
        let bp = sample();
        let bytes = to_snapshot(&bp).unwrap();
        assert_eq!(&bytes[0..4], MAGIC);
        assert_eq!(from_snapshot(&bytes).unwrap(), bp);
    }

    #[test]
    fn test_rejects_other_versions() {
        let mut bytes = to_snapshot(&sample()).unwrap();
        bytes[4..8].copy_from_slice(&2u32.to_le_bytes());
        assert!(matches!(from_snapshot(&bytes), Err(DecodeError::UnsupportedVersion(2))));
        assert!(matches!(from_snapshot(b"BPS"), Err(DecodeError::UnknownFormat)));
    }
}
