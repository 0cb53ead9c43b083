use crate::blueprint::Blueprint;
use crate::error::{DecodeError, EncodeError};
use crate::formats::nbt::{self, DEFAULT_COMPRESSION};
use crate::formats::snapshot::SnapshotFormat;
use flate2::Compression;

pub trait BlueprintImporter: Send + Sync {
    fn name(&self) -> String;
    fn detect(&self, data: &[u8]) -> bool;
    fn read(&self, data: &[u8]) -> Result<Blueprint, DecodeError>;
}

pub trait BlueprintExporter: Send + Sync {
    fn name(&self) -> String;
    fn extensions(&self) -> Vec<String>;
    fn write(&self, blueprint: &Blueprint) -> Result<Vec<u8>, EncodeError>;
}

/// The persisted gzip NBT blob.
pub struct NbtFormat {
    compression: Compression,
}

impl NbtFormat {
    pub fn new(compression: Compression) -> Self {
        Self { compression }
    }
}

impl Default for NbtFormat {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION)
    }
}

impl BlueprintImporter for NbtFormat {
    fn name(&self) -> String {
        "nbt".to_string()
    }

    fn detect(&self, data: &[u8]) -> bool {
        nbt::is_gzip(data)
    }

    fn read(&self, data: &[u8]) -> Result<Blueprint, DecodeError> {
        nbt::decode(data)
    }
}

impl BlueprintExporter for NbtFormat {
    fn name(&self) -> String {
        "nbt".to_string()
    }

    fn extensions(&self) -> Vec<String> {
        vec!["nbt".to_string()]
    }

    fn write(&self, blueprint: &Blueprint) -> Result<Vec<u8>, EncodeError> {
        nbt::encode_with_compression(blueprint, self.compression)
    }
}

/// Importers and exporters by name. Owned by whoever needs one; there is no shared instance.
#[derive(Default)]
pub struct FormatManager {
    importers: Vec<Box<dyn BlueprintImporter>>,
    exporters: Vec<Box<dyn BlueprintExporter>>,
}

impl FormatManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager knowing the NBT and snapshot formats.
    pub fn with_defaults() -> Self {
        let mut manager = Self::new();
        manager.register_importer(NbtFormat::default());
        manager.register_importer(SnapshotFormat);
        manager.register_exporter(NbtFormat::default());
        manager.register_exporter(SnapshotFormat);
        manager
    }

    pub fn register_importer<I: BlueprintImporter + 'static>(&mut self, importer: I) {
        self.importers.push(Box::new(importer));
    }

    pub fn register_exporter<E: BlueprintExporter + 'static>(&mut self, exporter: E) {
        self.exporters.push(Box::new(exporter));
    }

    pub fn detect_format(&self, data: &[u8]) -> Option<String> {
        self.importers
            .iter()
            .find(|importer| importer.detect(data))
            .map(|importer| importer.name())
    }

    pub fn read(&self, data: &[u8]) -> Result<Blueprint, DecodeError> {
        match self.importers.iter().find(|importer| importer.detect(data)) {
            Some(importer) => importer.read(data),
            None => Err(DecodeError::UnknownFormat),
        }
    }

    pub fn write(&self, format: &str, blueprint: &Blueprint) -> Result<Vec<u8>, EncodeError> {
        match self
            .exporters
            .iter()
            .find(|exporter| exporter.name().eq_ignore_ascii_case(format))
        {
            Some(exporter) => exporter.write(blueprint),
            None => Err(EncodeError::UnknownFormat(format.to_string())),
        }
    }

    /// Picks the exporter by the extension of `path`.
    pub fn write_auto(&self, path: &str, blueprint: &Blueprint) -> Result<Vec<u8>, EncodeError> {
        let extension = std::path::Path::new(path)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match self
            .exporters
            .iter()
            .find(|exporter| exporter.extensions().contains(&extension))
        {
            Some(exporter) => exporter.write(blueprint),
            None => Err(EncodeError::UnknownFormat(format!(".{}", extension))),
        }
    }

    pub fn list_importers(&self) -> Vec<String> {
        self.importers.iter().map(|i| i.name()).collect()
    }

    pub fn list_exporters(&self) -> Vec<String> {
        self.exporters.iter().map(|e| e.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_position::BlockPosition;

    #[test]
    fn test_detects_both_formats() {
        let manager = FormatManager::with_defaults();
        let bp = Blueprint {
            size: BlockPosition::new(3, 3, 3),
            ..Blueprint::default()
        };

        let nbt_bytes = manager.write("nbt", &bp).unwrap();
        let snapshot_bytes = manager.write_auto("cache/house.bpsn", &bp).unwrap();

        assert_eq!(manager.detect_format(&nbt_bytes).as_deref(), Some("nbt"));
        assert_eq!(manager.detect_format(&snapshot_bytes).as_deref(), Some("snapshot"));
        assert_eq!(manager.read(&nbt_bytes).unwrap(), bp);
        assert_eq!(manager.read(&snapshot_bytes).unwrap(), bp);
    }

    #[test]
    fn test_unknown_formats() {
        let manager = FormatManager::with_defaults();
        assert!(matches!(
            manager.write("schem", &Blueprint::empty()),
            Err(EncodeError::UnknownFormat(_))
        ));
        assert!(matches!(manager.read(&[0, 1, 2]), Err(DecodeError::UnknownFormat)));
        assert_eq!(manager.list_importers(), vec!["nbt", "snapshot"]);
    }
}
