use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("no asset loaded under key '{key}'")]
    ResourceNotFound { key: String },
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read directory entry in {path}: {source}")]
    ReadDirEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// In-memory asset registry keyed by '/'-joined paths relative to the asset
/// root (`"scenes/village.json"`). Text assets carry their contents; sprite
/// sheets are registered by key only, since rasterizing them is the host
/// renderer's job.
#[derive(Debug, Default)]
pub struct AssetStore {
    texts: HashMap<String, String>,
    sheets: HashSet<String>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_text(&mut self, key: impl Into<String>, contents: impl Into<String>) {
        self.texts.insert(key.into(), contents.into());
    }

    pub fn register_sheet(&mut self, key: impl Into<String>) {
        self.sheets.insert(key.into());
    }

    pub fn text(&self, key: &str) -> Result<&str, AssetError> {
        self.texts
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| AssetError::ResourceNotFound {
                key: key.to_string(),
            })
    }

    pub fn has_sheet(&self, key: &str) -> bool {
        self.sheets.contains(key)
    }

    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    /// Walks `root` recursively and loads every recognized asset. `.json` and
    /// `.txt` files load as text; `.png` files register as sprite sheets under
    /// their extension-less key. Unrecognized extensions are skipped.
    pub fn load_dir(&mut self, root: &Path) -> Result<(), AssetError> {
        self.load_dir_inner(root, root)?;
        debug!(
            texts = self.texts.len(),
            sheets = self.sheets.len(),
            root = %root.display(),
            "assets_loaded"
        );
        Ok(())
    }

    fn load_dir_inner(&mut self, root: &Path, dir: &Path) -> Result<(), AssetError> {
        let entries = fs::read_dir(dir).map_err(|source| AssetError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| AssetError::ReadDirEntry {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_dir() {
                self.load_dir_inner(root, &path)?;
                continue;
            }
            let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
                continue;
            };
            match extension {
                "json" | "txt" => {
                    let contents =
                        fs::read_to_string(&path).map_err(|source| AssetError::ReadFile {
                            path: path.clone(),
                            source,
                        })?;
                    self.texts.insert(relative_key(root, &path), contents);
                }
                "png" => {
                    let key = relative_key(root, &path);
                    let key = key.strip_suffix(".png").unwrap_or(&key).to_string();
                    self.sheets.insert(key);
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// '/'-joined path of `file` relative to `root`, independent of the platform
/// separator.
fn relative_key(root: &Path, file: &Path) -> String {
    file.strip_prefix(root)
        .unwrap_or(file)
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_key_is_resource_not_found() {
        let store = AssetStore::new();
        assert!(matches!(
            store.text("scenes/nowhere.json"),
            Err(AssetError::ResourceNotFound { .. })
        ));
    }

    #[test]
    fn load_dir_keys_files_relative_to_the_root() {
        let temp = TempDir::new().expect("tempdir");
        let scenes = temp.path().join("scenes");
        fs::create_dir_all(&scenes).expect("create scenes");
        fs::write(scenes.join("village.json"), "{}").expect("write scene");
        fs::write(temp.path().join("notes.txt"), "hello").expect("write notes");
        fs::write(temp.path().join("tiles.png"), [0u8; 4]).expect("write sheet");
        fs::write(temp.path().join("ignored.bin"), [0u8; 4]).expect("write blob");

        let mut store = AssetStore::new();
        store.load_dir(temp.path()).expect("load");

        assert_eq!(store.text("scenes/village.json").expect("scene"), "{}");
        assert_eq!(store.text("notes.txt").expect("notes"), "hello");
        assert!(store.has_sheet("tiles"));
        assert!(!store.has_sheet("ignored"));
        assert_eq!(store.text_count(), 2);
    }

    #[test]
    fn load_dir_surfaces_a_missing_root() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("absent");
        let mut store = AssetStore::new();
        assert!(matches!(
            store.load_dir(&missing),
            Err(AssetError::ReadDir { .. })
        ));
    }
}
