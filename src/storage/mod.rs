// Durable key-value slots

mod file;
mod sqlite;

pub use file::FileStorage;
pub use sqlite::SqliteStorage;

use eyre::{Result, eyre};
use std::collections::HashMap;

/// A set of named slots, each holding one string value
///
/// A write replaces the whole value or fails leaving the previous value in
/// place; readers never observe a partial write.
pub trait SlotStorage {
    /// Read a slot, `None` when it has never been written
    fn read_slot(&self, key: &str) -> Result<Option<String>>;

    /// Replace a slot's value
    fn write_slot(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: SlotStorage + ?Sized> SlotStorage for Box<S> {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        (**self).read_slot(key)
    }

    fn write_slot(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).write_slot(key, value)
    }
}

/// In-process slots that vanish with the process
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStorage for MemoryStorage {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.slots.get(key).cloned())
    }

    fn write_slot(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Slot keys double as file names, so keep them to a safe alphabet
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(eyre!("Slot key cannot be empty"));
    }
    if key.len() > 64 {
        return Err(eyre!("Slot key too long: {} (max 64 chars)", key));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(eyre!("Invalid slot key: {} (must be alphanumeric with _/-)", key));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_read_write() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.read_slot("tasks").unwrap(), None);

        storage.write_slot("tasks", "[]").unwrap();
        assert_eq!(storage.read_slot("tasks").unwrap().as_deref(), Some("[]"));

        storage.write_slot("tasks", "[1]").unwrap();
        assert_eq!(storage.read_slot("tasks").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_boxed_storage_delegates() {
        let mut storage: Box<dyn SlotStorage> = Box::new(MemoryStorage::new());
        storage.write_slot("darkMode", "enabled").unwrap();
        assert_eq!(storage.read_slot("darkMode").unwrap().as_deref(), Some("enabled"));
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("tasks").is_ok());
        assert!(validate_key("dark-mode_2").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("has space").is_err());
        assert!(validate_key(&"a".repeat(65)).is_err());
    }
}
