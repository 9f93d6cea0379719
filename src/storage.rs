use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A string key-value store that survives restarts
pub(crate) trait Storage {
    /// Returns `Ok(None)` if nothing has been stored under `key` yet
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces whatever is stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Error)]
pub(crate) enum StorageError {
    #[error("failed to read stored value {key:?}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write stored value {key:?}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// Stores each key as a `<key>.json` file inside a directory.  The directory
/// is created on the first write.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub(crate) fn new(dir: PathBuf) -> FileStorage {
        FileStorage { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        // Write to a sibling and rename over the target so that a crash
        // mid-write never leaves a truncated snapshot behind
        let tmp = path.with_extension("json.tmp");
        fs::create_dir_all(&self.dir)
            .and_then(|()| fs::write(&tmp, value))
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|source| StorageError::Write {
                key: key.to_owned(),
                source,
            })
    }
}

#[cfg(test)]
pub(crate) use self::memory::MemoryStorage;


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_key() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("data"));
        assert!(storage.get("calendar-events").unwrap().is_none());
    }

    #[test]
    fn test_set_then_get() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("data"));
        storage.set("calendar-events", "[]").unwrap();
        storage.set("calendar-events", "[1]").unwrap();
        assert_eq!(
            storage.get("calendar-events").unwrap().as_deref(),
            Some("[1]")
        );
        assert!(dir.path().join("data").join("calendar-events.json").exists());
        assert!(!dir
            .path()
            .join("data")
            .join("calendar-events.json.tmp")
            .exists());
    }

    #[test]
    fn test_write_failure_names_key() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let mut storage = FileStorage::new(blocker);
        let e = storage.set("calendar-events", "[]").unwrap_err();
        assert!(matches!(e, StorageError::Write { ref key, .. } if key == "calendar-events"));
    }
}
