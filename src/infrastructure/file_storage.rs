// File-backed key-value storage
use crate::application::key_value_storage::{KeyValueStorage, StorageError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One file per key under `dir`, replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>, quota: Option<usize>) -> Self {
        Self {
            dir: dir.into(),
            quota,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }

    fn io_error(key: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            if bytes.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    size: bytes.len(),
                    quota,
                });
            }
        }

        fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(key, e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|e| Self::io_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            Self::io_error(key, e)
        })
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"), None);

        assert!(storage.read("history").unwrap().is_none());
        storage.write("history", b"[1]").unwrap();
        storage.write("history", b"[2]").unwrap();

        assert_eq!(storage.read("history").unwrap(), Some(b"[2]".to_vec()));
        assert!(dir.path().join("nested/history.json").exists());
        assert!(!dir.path().join("nested/history.json.tmp").exists());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path(), None);

        storage.write("history", b"[]").unwrap();
        storage.delete("history").unwrap();
        storage.delete("history").unwrap();
        assert!(storage.read("history").unwrap().is_none());
    }

    #[test]
    fn test_quota_exceeded_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path(), Some(8));

        storage.write("history", b"[\"old\"]").unwrap();
        let err = storage.write("history", b"[\"much newer\"]").unwrap_err();

        assert!(matches!(err, StorageError::QuotaExceeded { quota: 8, .. }));
        assert_eq!(storage.read("history").unwrap(), Some(b"[\"old\"]".to_vec()));
    }

    #[test]
    fn test_keys_map_to_safe_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path(), None);

        storage.write("../escape/key", b"{}").unwrap();
        assert!(dir.path().join("___escape_key.json").exists());
    }
}
