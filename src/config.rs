use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "HealthVis";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that relocates the data directory (tests, portable installs).
pub const DATA_DIR_ENV: &str = "HEALTHVIS_DATA_DIR";

/// Trailing window for coalescing settings writes.
pub const PERSIST_DEBOUNCE_MS: u64 = 500;

/// Get the application data directory.
/// `$HEALTHVIS_DATA_DIR` if set, otherwise ~/HealthVis/.
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

/// SQLite database holding persisted preferences.
pub fn settings_db_path() -> PathBuf {
    app_data_dir().join("healthvis.db")
}

/// JSON settings document (used by shells without SQLite).
pub fn settings_json_path() -> PathBuf {
    app_data_dir().join("accessibility.json")
}

/// Where generated sonification tones are written.
pub fn tones_dir() -> PathBuf {
    app_data_dir().join("assets").join("audio")
}

pub fn persist_debounce() -> Duration {
    Duration::from_millis(PERSIST_DEBOUNCE_MS)
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "healthvis_lib=info,warn"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_paths_under_app_data() {
        let app = app_data_dir();
        assert!(settings_db_path().starts_with(&app));
        assert!(settings_json_path().starts_with(&app));
        assert!(tones_dir().starts_with(&app));
        assert!(tones_dir().ends_with("assets/audio"));
    }

    #[test]
    fn app_name_is_healthvis() {
        assert_eq!(APP_NAME, "HealthVis");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn debounce_window_is_half_a_second() {
        assert_eq!(persist_debounce(), Duration::from_millis(500));
    }
}
