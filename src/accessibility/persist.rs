//! Storage port for accessibility settings and its implementations.
//!
//! - `MemorySettingsStore`: in-process, for tests and ephemeral sessions
//! - `JsonFileSettingsStore`: one JSON document, replaced atomically
//! - `SqliteSettingsStore`: one `user_preferences` row per setting

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::SettingsError;
use crate::db::{self, get_all_user_preferences, set_user_preferences};
use crate::models::{AccessibilityMode, AccessibilitySettings, Preference, PreferenceError};

/// Row key holding the primary mode in key/value storage.
pub const MODE_KEY: &str = "mode";

/// Where accessibility settings live between launches.
pub trait SettingsStore: Send + Sync {
    /// `Ok(None)` when nothing has been persisted yet.
    fn load(&self) -> Result<Option<AccessibilitySettings>, SettingsError>;

    fn save(&self, settings: &AccessibilitySettings) -> Result<(), SettingsError>;
}

// ═══════════════════════════════════════════════════════════
// Memory
// ═══════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Option<AccessibilitySettings>>,
    saves: AtomicUsize,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded as if `settings` had been saved earlier.
    pub fn with_settings(settings: AccessibilitySettings) -> Self {
        Self {
            settings: Mutex::new(Some(settings)),
            saves: AtomicUsize::new(0),
        }
    }

    /// Currently stored value.
    pub fn stored(&self) -> Option<AccessibilitySettings> {
        self.settings.lock().ok().and_then(|guard| *guard)
    }

    /// Number of completed `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<AccessibilitySettings>, SettingsError> {
        let guard = self.settings.lock().map_err(|_| SettingsError::LockPoisoned)?;
        Ok(*guard)
    }

    fn save(&self, settings: &AccessibilitySettings) -> Result<(), SettingsError> {
        let mut guard = self.settings.lock().map_err(|_| SettingsError::LockPoisoned)?;
        *guard = Some(*settings);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// JSON file
// ═══════════════════════════════════════════════════════════

pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn load(&self) -> Result<Option<AccessibilitySettings>, SettingsError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let settings: AccessibilitySettings = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(Some(settings))
    }

    fn save(&self, settings: &AccessibilitySettings) -> Result<(), SettingsError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        // Write to a sibling temp file, then rename over the target.
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, settings)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// SQLite
// ═══════════════════════════════════════════════════════════

pub struct SqliteSettingsStore {
    path: PathBuf,
}

impl SqliteSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(&self) -> Result<rusqlite::Connection, SettingsError> {
        Ok(db::open_database(&self.path)?)
    }
}

impl SettingsStore for SqliteSettingsStore {
    fn load(&self) -> Result<Option<AccessibilitySettings>, SettingsError> {
        let conn = self.open()?;
        settings_from_rows(&get_all_user_preferences(&conn)?)
    }

    fn save(&self, settings: &AccessibilitySettings) -> Result<(), SettingsError> {
        let mut conn = self.open()?;
        set_user_preferences(&mut conn, settings_to_rows(settings))?;
        Ok(())
    }
}

/// Flatten settings into key/value rows, mode first.
pub fn settings_to_rows(settings: &AccessibilitySettings) -> Vec<(&'static str, String)> {
    let mut rows = vec![(MODE_KEY, settings.mode.as_str().to_string())];
    rows.extend(
        settings
            .preferences()
            .iter()
            .map(|p| (p.key(), p.value_string())),
    );
    rows
}

/// Rebuild settings from key/value rows.
///
/// No mode row means nothing was persisted. Rows missing for individual
/// settings keep that mode's defaults; unknown keys are skipped.
pub fn settings_from_rows(
    rows: &HashMap<String, String>,
) -> Result<Option<AccessibilitySettings>, SettingsError> {
    let Some(mode) = rows.get(MODE_KEY) else {
        return Ok(None);
    };
    let mode: AccessibilityMode = mode
        .parse()
        .map_err(|e: crate::models::ParseEnumError| SettingsError::Validation(e.to_string()))?;

    let mut settings = AccessibilitySettings::default();
    settings.apply_mode(mode);

    for (key, value) in rows.iter().filter(|(k, _)| k.as_str() != MODE_KEY) {
        match Preference::parse(key, value) {
            Ok(pref) => {
                settings.apply(pref);
            }
            Err(PreferenceError::UnknownKey(key)) => {
                tracing::debug!(%key, "Skipping unknown stored preference");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Some(settings))
}
