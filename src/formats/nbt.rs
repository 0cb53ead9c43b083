use crate::blueprint::Blueprint;
use crate::error::{DecodeError, EncodeError};
use crate::placed::PlacedBlueprint;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use quartz_nbt::io::Flavor;
use quartz_nbt::NbtCompound;

/// Level 3 keeps writes fast at a modest size cost over the gzip default.
pub const DEFAULT_COMPRESSION: Compression = Compression::new(3);

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0..2] == GZIP_MAGIC
}

pub fn encode(blueprint: &Blueprint) -> Result<Vec<u8>, EncodeError> {
    encode_with_compression(blueprint, DEFAULT_COMPRESSION)
}

pub fn encode_with_compression(
    blueprint: &Blueprint,
    compression: Compression,
) -> Result<Vec<u8>, EncodeError> {
    write_root(&blueprint.to_nbt(), compression)
}

pub fn decode(data: &[u8]) -> Result<Blueprint, DecodeError> {
    Blueprint::from_nbt(&read_root(data)?)
}

pub fn encode_placed(placed: &PlacedBlueprint) -> Result<Vec<u8>, EncodeError> {
    write_root(&placed.to_nbt(), DEFAULT_COMPRESSION)
}

pub fn decode_placed(data: &[u8]) -> Result<PlacedBlueprint, DecodeError> {
    PlacedBlueprint::from_nbt(&read_root(data)?)
}

fn write_root(root: &NbtCompound, compression: Compression) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = GzEncoder::new(Vec::new(), compression);
    quartz_nbt::io::write_nbt(&mut encoder, None, root, Flavor::Uncompressed)?;
    Ok(encoder.finish()?)
}

fn read_root(data: &[u8]) -> Result<NbtCompound, DecodeError> {
    if !is_gzip(data) {
        return Err(DecodeError::UnknownFormat);
    }
    let reader = std::io::BufReader::new(data);
    let mut gz = GzDecoder::new(reader);
    let (root, _) = quartz_nbt::io::read_nbt(&mut gz, Flavor::Uncompressed)?;
    Ok(root)
}
