use crate::blueprint::Blueprint;
use crate::error::LibraryError;
use crate::formats::nbt;
use flate2::Compression;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Where a [`BlueprintLibrary`] keeps its files and how it writes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub root: PathBuf,
    pub extension: String,
    /// gzip level, 0 to 9.
    pub compression: u32,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("blueprints"),
            extension: "nbt".to_string(),
            compression: 3,
        }
    }
}

impl LibraryConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, LibraryError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| LibraryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn compression(&self) -> Compression {
        Compression::new(self.compression.min(9))
    }
}

/// Blueprints on disk, keyed by their path below `root` without extension.
#[derive(Debug, Default)]
pub struct BlueprintLibrary {
    config: LibraryConfig,
    blueprints: HashMap<String, Arc<Blueprint>>,
}

impl BlueprintLibrary {
    pub fn new(config: LibraryConfig) -> Self {
        Self {
            config,
            blueprints: HashMap::new(),
        }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Rescans `root`, replacing everything held in memory.
    ///
    /// Files that fail to read or decode are logged and left out. Returns the number loaded.
    pub fn load(&mut self) -> Result<usize, LibraryError> {
        let start = Instant::now();
        let root = self.config.root.clone();

        let mut files = Vec::new();
        if root.is_dir() {
            collect_files(&root, &self.config.extension, &mut files)?;
        } else {
            debug!(root = %root.display(), "Blueprint root does not exist yet");
        }

        let loaded: Vec<(String, Blueprint)> = files
            .par_iter()
            .filter_map(|path| {
                let id = id_for(&root, path)?;
                let bytes = match fs::read(path) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Could not read blueprint");
                        return None;
                    }
                };
                match nbt::decode(&bytes) {
                    Ok(blueprint) => Some((id, blueprint)),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Could not load blueprint");
                        None
                    }
                }
            })
            .collect();

        self.blueprints = loaded
            .into_iter()
            .map(|(id, blueprint)| (id, Arc::new(blueprint)))
            .collect();

        info!(
            root = %root.display(),
            found = files.len(),
            loaded = self.blueprints.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded blueprint library"
        );
        Ok(self.blueprints.len())
    }

    /// Encodes and writes `blueprint` under `id`, then makes it available in memory.
    pub fn save(&mut self, id: &str, blueprint: Blueprint) -> Result<PathBuf, LibraryError> {
        let path = self.path_for(id)?;
        let bytes = nbt::encode_with_compression(&blueprint, self.config.compression())?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| LibraryError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, bytes).map_err(|source| LibraryError::Io {
            path: path.clone(),
            source,
        })?;

        info!(id, path = %path.display(), cells = blueprint.total_blocks(), "Saved blueprint");
        self.blueprints.insert(id.to_string(), Arc::new(blueprint));
        Ok(path)
    }

    /// File location for `id`. Ids are `/`-separated relative paths.
    pub fn path_for(&self, id: &str) -> Result<PathBuf, LibraryError> {
        let valid = !id.is_empty()
            && !id.contains('\\')
            && id
                .split('/')
                .all(|part| !part.is_empty() && part != "." && part != "..");
        if !valid {
            return Err(LibraryError::InvalidId(id.to_string()));
        }

        let mut path = self.config.root.clone();
        for part in id.split('/') {
            path.push(part);
        }
        path.set_extension(&self.config.extension);
        Ok(path)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Blueprint>> {
        self.blueprints.get(id).cloned()
    }

    /// Makes a blueprint available without touching disk.
    pub fn insert(&mut self, id: impl Into<String>, blueprint: Arc<Blueprint>) {
        self.blueprints.insert(id.into(), blueprint);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.blueprints.contains_key(id)
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.blueprints.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }
}

fn collect_files(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> Result<(), LibraryError> {
    let entries = fs::read_dir(dir).map_err(|source| LibraryError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| LibraryError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, extension, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            out.push(path);
        }
    }
    Ok(())
}

fn id_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config = LibraryConfig::from_json_str(r#"{ "root": "data/blueprints" }"#).unwrap();
        assert_eq!(config.root, PathBuf::from("data/blueprints"));
        assert_eq!(config.extension, "nbt");
        assert_eq!(config.compression, 3);
        assert!(LibraryConfig::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_path_for_rejects_escapes() {
        let library = BlueprintLibrary::new(LibraryConfig::new("/srv/blueprints"));
        assert_eq!(
            library.path_for("arena/lobby").unwrap(),
            PathBuf::from("/srv/blueprints/arena/lobby.nbt")
        );
        assert!(library.path_for("../etc/passwd").is_err());
        assert!(library.path_for("").is_err());
        assert!(library.path_for("a//b").is_err());
    }

    #[test]
    fn test_id_for_uses_forward_slashes() {
        let root = Path::new("/srv/blueprints");
        let path = root.join("arena").join("lobby.nbt");
        assert_eq!(id_for(root, &path).as_deref(), Some("arena/lobby"));
    }
}
