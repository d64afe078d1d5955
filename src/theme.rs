// Dark mode preference, stored apart from the task list

use crate::storage::SlotStorage;
use eyre::{Context, Result};
use tracing::warn;

/// Slot holding the theme preference
pub const DARK_MODE_KEY: &str = "darkMode";

const ENABLED: &str = "enabled";
const DISABLED: &str = "disabled";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// Read the saved theme; anything other than `enabled` means light
pub fn load_theme<S: SlotStorage + ?Sized>(storage: &S) -> Theme {
    match storage.read_slot(DARK_MODE_KEY) {
        Ok(Some(value)) if value == ENABLED => Theme::Dark,
        Ok(_) => Theme::Light,
        Err(e) => {
            warn!(key = DARK_MODE_KEY, error = %e, "Failed to read theme preference, using light");
            Theme::Light
        }
    }
}

pub fn save_theme<S: SlotStorage + ?Sized>(storage: &mut S, theme: Theme) -> Result<()> {
    let value = if theme.is_dark() { ENABLED } else { DISABLED };
    storage
        .write_slot(DARK_MODE_KEY, value)
        .context("Failed to save theme preference")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_default_theme_is_light() {
        let storage = MemoryStorage::new();
        assert_eq!(load_theme(&storage), Theme::Light);
    }

    #[test]
    fn test_save_and_load_theme() {
        let mut storage = MemoryStorage::new();

        save_theme(&mut storage, Theme::Dark).unwrap();
        assert_eq!(storage.read_slot(DARK_MODE_KEY).unwrap().as_deref(), Some("enabled"));
        assert_eq!(load_theme(&storage), Theme::Dark);

        save_theme(&mut storage, Theme::Light).unwrap();
        assert_eq!(storage.read_slot(DARK_MODE_KEY).unwrap().as_deref(), Some("disabled"));
        assert_eq!(load_theme(&storage), Theme::Light);
    }

    #[test]
    fn test_unknown_value_is_light() {
        let mut storage = MemoryStorage::new();
        storage.write_slot(DARK_MODE_KEY, "yes").unwrap();
        assert_eq!(load_theme(&storage), Theme::Light);
    }

    #[test]
    fn test_toggled() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
