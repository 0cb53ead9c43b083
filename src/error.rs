use std::path::PathBuf;

/// A blueprint blob could not be turned back into a blueprint.
///
/// A corrupt blueprint must never be placed, so these always reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("NBT error: {0}")]
    Nbt(#[from] quartz_nbt::io::NbtIoError),
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),
    #[error("Malformed blueprint: {0}")]
    Malformed(String),
    #[error("Palette index {index} out of range for palette of {palette_len}")]
    PaletteIndexOutOfRange { index: usize, palette_len: usize },
    #[error("Unknown region type: {0}")]
    UnknownRegionType(String),
    #[error("Unknown or unsupported blueprint format")]
    UnknownFormat,
    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
}

/// A blueprint could not be written out.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("NBT error: {0}")]
    Nbt(#[from] quartz_nbt::io::NbtIoError),
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),
    #[error("Unsupported export format: {0}")]
    UnknownFormat(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("Could not start placement worker: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("Placement worker panicked")]
    WorkerPanicked,
}

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Invalid blueprint id: {0}")]
    InvalidId(String),
}
