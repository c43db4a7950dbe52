//! Accessibility mode state.
//!
//! `AccessibilityState` is the single owner of the app's accessibility
//! settings. Reads are snapshot copies; mutation goes through `set_mode`,
//! `update_preference` and `reset`. Every change is broadcast on a
//! `tokio::sync::watch` channel for UI re-render and handed to the
//! debounced writer for persistence.

pub mod debounce;
pub mod persist;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;

use crate::config;
use crate::db::DatabaseError;
use crate::models::{
    AccessibilityMode, AccessibilitySettings, FeatureFlags, Preference, PreferenceError,
};

pub use debounce::DebouncedWriter;
pub use persist::{JsonFileSettingsStore, MemorySettingsStore, SettingsStore, SqliteSettingsStore};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Invalid preference: {0}")]
    Preference(#[from] PreferenceError),

    #[error("Stored settings failed validation: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings writer has stopped")]
    WriterStopped,

    #[error("Settings store lock poisoned")]
    LockPoisoned,
}

pub struct AccessibilityState {
    settings: watch::Sender<AccessibilitySettings>,
    writer: DebouncedWriter,
}

impl AccessibilityState {
    /// Load persisted settings (or defaults) and start the writer.
    ///
    /// A store that is empty, unreadable or holds invalid data yields the
    /// default settings; only a failure to start the writer thread is an error.
    pub fn load(
        store: Arc<dyn SettingsStore>,
        debounce_window: Duration,
    ) -> Result<Self, SettingsError> {
        let initial = load_or_default(store.as_ref());
        let writer = DebouncedWriter::spawn(store, debounce_window)?;
        let (settings, _) = watch::channel(initial);
        Ok(Self { settings, writer })
    }

    /// Load from the app's SQLite database with the default debounce window.
    pub fn open_default() -> Result<Self, SettingsError> {
        let store = SqliteSettingsStore::new(config::settings_db_path());
        Self::load(Arc::new(store), config::persist_debounce())
    }

    /// Load from the app's JSON settings document, for shells without SQLite.
    pub fn open_json() -> Result<Self, SettingsError> {
        let store = JsonFileSettingsStore::new(config::settings_json_path());
        Self::load(Arc::new(store), config::persist_debounce())
    }

    /// Snapshot of the current settings.
    pub fn settings(&self) -> AccessibilitySettings {
        *self.settings.borrow()
    }

    pub fn mode(&self) -> AccessibilityMode {
        self.settings.borrow().mode
    }

    pub fn features(&self) -> FeatureFlags {
        self.settings.borrow().features
    }

    /// Receiver that observes every subsequent change.
    pub fn subscribe(&self) -> watch::Receiver<AccessibilitySettings> {
        self.settings.subscribe()
    }

    /// Switch primary mode. Always legal; resets the feature flags to the
    /// new mode's bundle even when the mode is unchanged.
    pub fn set_mode(&self, mode: AccessibilityMode) -> AccessibilitySettings {
        let mut current = AccessibilitySettings::default();
        self.settings.send_modify(|s| {
            s.apply_mode(mode);
            current = *s;
            self.persist(current);
        });
        tracing::info!(%mode, "Accessibility mode set");
        current
    }

    /// Change one setting, leaving the mode and everything else alone.
    /// No notification or write happens when the value is already set.
    pub fn update_preference(
        &self,
        pref: Preference,
    ) -> Result<AccessibilitySettings, SettingsError> {
        pref.validate()?;
        let mut current = AccessibilitySettings::default();
        let changed = self.settings.send_if_modified(|s| {
            let changed = s.apply(pref);
            current = *s;
            if changed {
                self.persist(current);
            }
            changed
        });
        if changed {
            tracing::debug!(key = pref.key(), value = %pref.value_string(), "Preference updated");
        }
        Ok(current)
    }

    /// String-keyed variant of [`update_preference`](Self::update_preference).
    pub fn update_preference_str(
        &self,
        key: &str,
        value: &str,
    ) -> Result<AccessibilitySettings, SettingsError> {
        self.update_preference(Preference::parse(key, value)?)
    }

    /// Restore the default settings.
    pub fn reset(&self) -> AccessibilitySettings {
        let defaults = AccessibilitySettings::default();
        self.settings.send_modify(|s| {
            *s = defaults;
            self.persist(defaults);
        });
        tracing::info!("Accessibility settings reset to defaults");
        defaults
    }

    /// Write any pending change now and wait for it.
    pub fn flush(&self) -> Result<(), SettingsError> {
        self.writer.flush()
    }

    /// Queue a write. Called with the watch lock held so queued snapshots
    /// follow the order in which changes were applied.
    fn persist(&self, settings: AccessibilitySettings) {
        if let Err(e) = self.writer.schedule(settings) {
            tracing::warn!(error = %e, "Could not schedule settings write");
        }
    }
}

fn load_or_default(store: &dyn SettingsStore) -> AccessibilitySettings {
    match store.load() {
        Ok(Some(settings)) => match settings.validate() {
            Ok(()) => {
                tracing::info!(mode = %settings.mode, "Loaded accessibility settings");
                settings
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored accessibility settings invalid, using defaults");
                AccessibilitySettings::default()
            }
        },
        Ok(None) => {
            tracing::info!("No stored accessibility settings, using defaults");
            AccessibilitySettings::default()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load accessibility settings, using defaults");
            AccessibilitySettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContrastLevel, FontSize};

    const LONG_WINDOW: Duration = Duration::from_secs(30);

    struct FailingStore;

    impl SettingsStore for FailingStore {
        fn load(&self) -> Result<Option<AccessibilitySettings>, SettingsError> {
            Err(SettingsError::Validation("corrupt".into()))
        }

        fn save(&self, _: &AccessibilitySettings) -> Result<(), SettingsError> {
            Err(SettingsError::Io(std::io::Error::other("disk full")))
        }
    }

    fn fresh() -> (Arc<MemorySettingsStore>, AccessibilityState) {
        let store = Arc::new(MemorySettingsStore::new());
        let state = AccessibilityState::load(store.clone(), LONG_WINDOW).unwrap();
        (store, state)
    }

    #[test]
    fn empty_store_loads_defaults() {
        let (_, state) = fresh();
        assert_eq!(state.settings(), AccessibilitySettings::default());
        assert_eq!(state.mode(), AccessibilityMode::Visual);
    }

    #[test]
    fn persisted_settings_are_loaded() {
        let mut saved = AccessibilitySettings::default();
        saved.apply_mode(AccessibilityMode::Simplified);
        saved.apply(Preference::FontSize(FontSize::Large));
        let store = Arc::new(MemorySettingsStore::with_settings(saved));

        let state = AccessibilityState::load(store, LONG_WINDOW).unwrap();
        assert_eq!(state.settings(), saved);
    }

    #[test]
    fn invalid_persisted_settings_fall_back_to_defaults() {
        let saved = AccessibilitySettings {
            speech_rate: 40.0,
            ..Default::default()
        };
        let store = Arc::new(MemorySettingsStore::with_settings(saved));
        let state = AccessibilityState::load(store, LONG_WINDOW).unwrap();
        assert_eq!(state.settings(), AccessibilitySettings::default());
    }

    #[test]
    fn failing_store_never_fails_the_app() {
        let state = AccessibilityState::load(Arc::new(FailingStore), LONG_WINDOW).unwrap();
        assert_eq!(state.settings(), AccessibilitySettings::default());

        state.set_mode(AccessibilityMode::Audio);
        assert!(state.flush().is_ok());
        assert_eq!(state.mode(), AccessibilityMode::Audio);
    }

    #[test]
    fn mode_switch_resets_manual_override() {
        let (_, state) = fresh();
        state.update_preference(Preference::Sonification(true)).unwrap();
        state.update_preference(Preference::Sonification(false)).unwrap();
        assert!(!state.features().sonification);

        let s = state.set_mode(AccessibilityMode::Audio);
        assert!(s.features.sonification);
        assert_eq!(s.features, FeatureFlags::for_mode(AccessibilityMode::Audio));
    }

    #[test]
    fn override_survives_until_next_mode_switch() {
        let (_, state) = fresh();
        state.set_mode(AccessibilityMode::Audio);
        state.update_preference(Preference::Sonification(false)).unwrap();
        state.update_preference(Preference::Contrast(ContrastLevel::High)).unwrap();

        let s = state.settings();
        assert_eq!(s.mode, AccessibilityMode::Audio);
        assert!(!s.features.sonification);
        assert!(s.features.screen_reader);

        let s = state.set_mode(AccessibilityMode::Audio);
        assert!(s.features.sonification);
        // Non-flag settings are untouched by mode switches
        assert_eq!(s.contrast, ContrastLevel::High);
    }

    #[test]
    fn update_preference_touches_one_setting() {
        let (_, state) = fresh();
        let before = state.settings();
        let after = state.update_preference(Preference::KeyboardOnly(true)).unwrap();

        assert_eq!(after.mode, before.mode);
        assert!(after.features.keyboard_only);
        let mut expected = before;
        expected.features.keyboard_only = true;
        assert_eq!(after, expected);
    }

    #[test]
    fn invalid_update_is_rejected_and_state_kept() {
        let (_, state) = fresh();
        let err = state
            .update_preference(Preference::AudioVolume(2.0))
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Preference(PreferenceError::InvalidValue {
                key: "audio_volume",
                ..
            })
        ));
        assert_eq!(state.settings(), AccessibilitySettings::default());

        let err = state.update_preference_str("volume", "0.5").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Preference(PreferenceError::UnknownKey(_))
        ));
    }

    #[test]
    fn string_keyed_update() {
        let (_, state) = fresh();
        let s = state.update_preference_str("font_size", "extra_large").unwrap();
        assert_eq!(s.font_size, FontSize::ExtraLarge);
        assert!(state.update_preference_str("font_size", "huge").is_err());
        assert!(state.update_preference_str("mode", "audio").is_err());
    }

    #[test]
    fn subscribers_see_changes() {
        let (_, state) = fresh();
        let mut rx = state.subscribe();
        assert!(!rx.has_changed().unwrap());

        state.set_mode(AccessibilityMode::Hybrid);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().mode, AccessibilityMode::Hybrid);
    }

    #[test]
    fn unchanged_preference_does_not_notify_or_write() {
        let (store, state) = fresh();
        let rx = state.subscribe();
        state.update_preference(Preference::ScreenReader(false)).unwrap();
        assert!(!rx.has_changed().unwrap());
        state.flush().unwrap();
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn subscriber_wakes_on_change() {
        let (_, state) = fresh();
        let mut rx = state.subscribe();
        state
            .update_preference(Preference::HapticFeedback(true))
            .unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().features.haptic_feedback);
    }

    #[test]
    fn rapid_changes_persist_once_with_last_value() {
        let (store, state) = fresh();
        state.set_mode(AccessibilityMode::Audio);
        state.update_preference(Preference::SpeechRate(1.5)).unwrap();
        state.set_mode(AccessibilityMode::Hybrid);
        state.update_preference(Preference::FontSize(FontSize::Small)).unwrap();
        state.flush().unwrap();

        assert_eq!(store.save_count(), 1);
        assert_eq!(store.stored(), Some(state.settings()));
    }

    #[test]
    fn reset_restores_defaults() {
        let (store, state) = fresh();
        state.set_mode(AccessibilityMode::Simplified);
        state.reset();
        state.flush().unwrap();
        assert_eq!(state.settings(), AccessibilitySettings::default());
        assert_eq!(store.stored(), Some(AccessibilitySettings::default()));
    }

    #[test]
    fn concurrent_updates_persist_latest_state() {
        let (store, state) = fresh();
        std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..200 {
                    let volume = if i % 2 == 0 { 0.25 } else { 0.75 };
                    state.update_preference(Preference::AudioVolume(volume)).unwrap();
                }
            });
            scope.spawn(|| {
                for i in 0..200 {
                    let mode = if i % 2 == 0 {
                        AccessibilityMode::Audio
                    } else {
                        AccessibilityMode::Hybrid
                    };
                    state.set_mode(mode);
                    state.update_preference(Preference::KeyboardOnly(i % 3 == 0)).unwrap();
                }
            });
        });
        state.flush().unwrap();
        assert_eq!(store.stored(), Some(state.settings()));
    }

    #[test]
    fn settings_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("healthvis.db");

        let saved = {
            let state =
                AccessibilityState::load(Arc::new(SqliteSettingsStore::new(&path)), LONG_WINDOW)
                    .unwrap();
            state.set_mode(AccessibilityMode::Audio);
            state.update_preference(Preference::AudioVolume(0.5)).unwrap();
            state.settings()
        };

        let state =
            AccessibilityState::load(Arc::new(SqliteSettingsStore::new(&path)), LONG_WINDOW)
                .unwrap();
        assert_eq!(state.settings(), saved);
    }
}
