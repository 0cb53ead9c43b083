pub mod manager;
pub mod nbt;
pub mod snapshot;

pub use manager::{BlueprintExporter, BlueprintImporter, FormatManager, NbtFormat};
