// One JSON file per slot, replaced atomically

use super::{SlotStorage, validate_key};
use eyre::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CURRENT_VERSION: u32 = 1;
const LOCK_FILE: &str = ".lock";

/// Slots stored as `<key>.json` files in a directory
#[derive(Debug)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Open or create a slot directory at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        fs::create_dir_all(&base_path).context("Failed to create storage directory")?;

        let storage = Self { base_path };
        storage.create_gitignore()?;
        storage.write_version()?;

        debug!(path = ?storage.base_path, "Opened file storage");
        Ok(storage)
    }

    /// Get the directory holding the slot files
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    fn create_gitignore(&self) -> Result<()> {
        let gitignore_path = self.base_path.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(gitignore_path, ".lock\n*.tmp\n")?;
        }
        Ok(())
    }

    fn write_version(&self) -> Result<()> {
        let version_path = self.base_path.join(".version");
        if !version_path.exists() {
            fs::write(version_path, CURRENT_VERSION.to_string())?;
        }
        Ok(())
    }

    fn lock(&self) -> Result<File> {
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.base_path.join(LOCK_FILE))
            .context("Failed to open storage lock file")?;
        lock.lock_exclusive().context("Failed to acquire file lock")?;
        Ok(lock)
    }
}

impl SlotStorage for FileStorage {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;

        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).with_context(|| format!("Failed to read slot file {:?}", path))?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                // Left for the caller's parser to reject
                warn!(key, error = %e.utf8_error(), "Slot file is not valid UTF-8");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Ok(Some(content))
    }

    fn write_slot(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;

        let path = self.slot_path(key);
        let tmp_path = self.base_path.join(format!("{}.json.tmp", key));

        // Held until the rename lands; released when dropped
        let _lock = self.lock()?;

        let mut tmp = File::create(&tmp_path).context("Failed to create temporary slot file")?;
        tmp.write_all(value.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, &path).with_context(|| format!("Failed to replace slot file {:?}", path))?;

        debug!(key, bytes = value.len(), "Wrote slot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("data");

        let storage = FileStorage::open(&dir).unwrap();
        assert_eq!(storage.base_path(), dir.as_path());
        assert!(dir.join(".gitignore").exists());
        assert!(dir.join(".version").exists());
    }

    #[test]
    fn test_read_missing_slot() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::open(temp.path()).unwrap();

        assert_eq!(storage.read_slot("tasks").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::open(temp.path()).unwrap();

        storage.write_slot("tasks", r#"[{"id":1,"text":"a","completed":false}]"#).unwrap();
        storage.write_slot("tasks", "[]").unwrap();

        assert_eq!(storage.read_slot("tasks").unwrap().as_deref(), Some("[]"));
        assert!(temp.path().join("tasks.json").exists());
        assert!(!temp.path().join("tasks.json.tmp").exists());
    }

    #[test]
    fn test_slots_survive_reopen() {
        let temp = TempDir::new().unwrap();
        {
            let mut storage = FileStorage::open(temp.path()).unwrap();
            storage.write_slot("darkMode", "enabled").unwrap();
        }

        let storage = FileStorage::open(temp.path()).unwrap();
        assert_eq!(storage.read_slot("darkMode").unwrap().as_deref(), Some("enabled"));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::open(temp.path()).unwrap();

        assert!(storage.write_slot("../outside", "x").is_err());
        assert!(storage.read_slot("a/b").is_err());
    }

    #[test]
    fn test_read_non_utf8_slot_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::open(temp.path()).unwrap();
        fs::write(temp.path().join("tasks.json"), [0xff, 0xfe, b'[', b']']).unwrap();

        let content = storage.read_slot("tasks").unwrap().unwrap();
        assert_eq!(content, "\u{fffd}\u{fffd}[]");
    }
}
