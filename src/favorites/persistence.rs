//! Where favorites live between sessions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::entity::FavoriteSnapshot;
use super::error::FavoritesError;

pub const STORAGE_KEY: &str = "catalog-favorites";
pub const STORAGE_VERSION: u32 = 1;

/// The persisted form of the favorites map, tagged with a versioned key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoritesDocument {
    pub key: String,
    pub version: u32,
    pub favorites: BTreeMap<u32, FavoriteSnapshot>,
}

impl FavoritesDocument {
    pub fn new(favorites: BTreeMap<u32, FavoriteSnapshot>) -> Self {
        Self {
            key: STORAGE_KEY.to_string(),
            version: STORAGE_VERSION,
            favorites,
        }
    }

    /// True when this build can read the document.
    pub fn is_current(&self) -> bool {
        self.key == STORAGE_KEY && self.version == STORAGE_VERSION
    }
}

/// Storage backend for the favorites store.
pub trait FavoritesPersistence: Send + Sync + 'static {
    /// The stored document, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<FavoritesDocument>, FavoritesError>;

    fn save(&self, document: &FavoritesDocument) -> Result<(), FavoritesError>;
}

/// A pretty-printed JSON file, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesPersistence for JsonFilePersistence {
    fn load(&self) -> Result<Option<FavoritesDocument>, FavoritesError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, document: &FavoritesDocument) -> Result<(), FavoritesError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, serde_json::to_string_pretty(document)?)?;
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

/// Keeps the document in memory; clones share it.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    document: Arc<Mutex<Option<FavoritesDocument>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: FavoritesDocument) -> Self {
        Self {
            document: Arc::new(Mutex::new(Some(document))),
        }
    }

    pub fn document(&self) -> Option<FavoritesDocument> {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FavoritesPersistence for MemoryPersistence {
    fn load(&self) -> Result<Option<FavoritesDocument>, FavoritesError> {
        Ok(self.document())
    }

    fn save(&self, document: &FavoritesDocument) -> Result<(), FavoritesError> {
        let mut slot = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(document.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::fixture_character;

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFilePersistence::new(dir.path().join("nested/favorites-v1.json"));
        assert!(persistence.load().unwrap().is_none());

        let rick = FavoriteSnapshot::from(&fixture_character(1, "Rick Sanchez", "Human", Some(1)));
        let document = FavoritesDocument::new(BTreeMap::from([(1, rick)]));
        persistence.save(&document).unwrap();

        let loaded = persistence.load().unwrap().unwrap();
        assert_eq!(loaded, document);
        assert!(loaded.is_current());
    }

    #[test]
    fn test_memory_save_survives_poisoned_lock() {
        let persistence = MemoryPersistence::new();
        let shared = persistence.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.document.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let document = FavoritesDocument::new(BTreeMap::new());
        persistence.save(&document).unwrap();
        assert_eq!(persistence.document(), Some(document));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites-v1.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFilePersistence::new(path).load().unwrap_err();
        assert!(matches!(err, FavoritesError::Serialize(_)));
    }
}
