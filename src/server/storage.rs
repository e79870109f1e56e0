//! File-backed document storage for the sync server.
//!
//! Documents are JSON files grouped by collection:
//! ```text
//! <DATA_DIR>/
//!   users/
//!     <user_id>.json
//! ```
//!
//! Writes go to a temp file that is renamed into place, so readers never see
//! a half-written document.

use std::fs;
use std::io;
use std::path::PathBuf;
use uuid::Uuid;

use crate::remote::protocol::DocumentRecord;

/// Errors that can occur during server storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error reading or writing a file.
    IoError(PathBuf, io::Error),
    /// A stored document is not valid JSON.
    Corrupt(PathBuf, serde_json::Error),
    /// Collection or document id that is unsafe as a path component.
    InvalidName(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StorageError::Corrupt(path, e) => {
                write!(f, "Corrupt document {}: {}", path.display(), e)
            }
            StorageError::InvalidName(name) => write!(f, "Invalid name: {}", name),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError(_, e) => Some(e),
            StorageError::Corrupt(_, e) => Some(e),
            StorageError::InvalidName(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentStorage {
    data_dir: PathBuf,
}

impl DocumentStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Rejects names that could escape the data directory.
    fn validate_name(name: &str) -> Result<(), StorageError> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
            || name.starts_with('.')
        {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(())
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.data_dir.join(collection)
    }

    fn doc_path(&self, collection: &str, id: &str) -> PathBuf {
        self.collection_dir(collection).join(format!("{}.json", id))
    }

    /// Returns `Ok(None)` if the document doesn't exist.
    pub fn load(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<serde_json::Value>, StorageError> {
        Self::validate_name(collection)?;
        Self::validate_name(id)?;

        let path = self.doc_path(collection, id);
        match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| StorageError::Corrupt(path, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(path, e)),
        }
    }

    /// Replaces the document, creating the collection directory if needed.
    pub fn save(
        &self,
        collection: &str,
        id: &str,
        document: &serde_json::Value,
    ) -> Result<(), StorageError> {
        Self::validate_name(collection)?;
        Self::validate_name(id)?;

        let dir = self.collection_dir(collection);
        fs::create_dir_all(&dir).map_err(|e| StorageError::IoError(dir.clone(), e))?;

        let path = self.doc_path(collection, id);
        let bytes =
            serde_json::to_vec(document).map_err(|e| StorageError::Corrupt(path.clone(), e))?;

        // One temp file per write; listing skips dotfiles
        let temp_path = dir.join(format!(".{}.{}.tmp", id, Uuid::new_v4()));
        fs::write(&temp_path, &bytes)
            .map_err(|e| StorageError::IoError(temp_path.clone(), e))?;
        fs::rename(&temp_path, &path).map_err(|e| StorageError::IoError(path, e))?;

        Ok(())
    }

    /// Documents of a collection ordered by id, at most `limit` of them.
    pub fn list(
        &self,
        collection: &str,
        limit: Option<usize>,
    ) -> Result<Vec<DocumentRecord>, StorageError> {
        Self::validate_name(collection)?;

        let dir = self.collection_dir(collection);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::IoError(dir, e)),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::IoError(dir.clone(), e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            if let Some(id) = name.strip_suffix(".json") {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        ids.truncate(limit.unwrap_or(usize::MAX));

        let mut documents = Vec::with_capacity(ids.len());
        for id in ids {
            // A document removed between read_dir and load is simply skipped
            if let Some(data) = self.load(collection, &id)? {
                documents.push(DocumentRecord { id, data });
            }
        }
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (DocumentStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = DocumentStorage::new(temp_dir.path());
        (storage, temp_dir)
    }

    #[test]
    fn test_validate_name() {
        assert!(DocumentStorage::validate_name("users").is_ok());
        assert!(DocumentStorage::validate_name("user-1_a").is_ok());

        assert!(DocumentStorage::validate_name("").is_err());
        assert!(DocumentStorage::validate_name("../evil").is_err());
        assert!(DocumentStorage::validate_name("foo/bar").is_err());
        assert!(DocumentStorage::validate_name("foo\\bar").is_err());
        assert!(DocumentStorage::validate_name(".hidden").is_err());
    }

    #[test]
    fn test_load_nonexistent_returns_none() {
        let (storage, _temp) = setup();
        assert!(storage.load("users", "nobody").unwrap().is_none());
    }

    #[test]
    fn test_save_load_and_overwrite() {
        let (storage, temp) = setup();

        storage.save("users", "u1", &json!({"v": 1})).unwrap();
        storage.save("users", "u1", &json!({"v": 2})).unwrap();

        assert_eq!(storage.load("users", "u1").unwrap(), Some(json!({"v": 2})));
        assert!(temp.path().join("users").join("u1.json").exists());
    }

    #[test]
    fn test_list_sorted_and_limited() {
        let (storage, _temp) = setup();

        storage.save("users", "b", &json!({"n": "b"})).unwrap();
        storage.save("users", "a", &json!({"n": "a"})).unwrap();
        storage.save("users", "c", &json!({"n": "c"})).unwrap();

        let all = storage.list("users", None).unwrap();
        let ids: Vec<&str> = all.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let first = storage.list("users", Some(1)).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].data, json!({"n": "a"}));
    }

    #[test]
    fn test_list_missing_collection_is_empty() {
        let (storage, _temp) = setup();
        assert!(storage.list("users", Some(1)).unwrap().is_empty());
    }

    #[test]
    fn test_collections_are_isolated() {
        let (storage, _temp) = setup();

        storage.save("users", "x", &json!(1)).unwrap();
        storage.save("other", "x", &json!(2)).unwrap();

        assert_eq!(storage.load("users", "x").unwrap(), Some(json!(1)));
        assert_eq!(storage.load("other", "x").unwrap(), Some(json!(2)));
    }

    #[test]
    fn test_corrupt_document() {
        let (storage, temp) = setup();
        let dir = temp.path().join("users");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("u1.json"), "{").unwrap();

        assert!(matches!(
            storage.load("users", "u1"),
            Err(StorageError::Corrupt(_, _))
        ));
    }
}
