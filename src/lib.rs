pub mod accessibility; // Mode state + debounced persistence
pub mod categorize;
pub mod classify;
pub mod config;
pub mod db;
pub mod describe; // Screen-reader text
pub mod models;
pub mod sonification;

pub use accessibility::{AccessibilityState, SettingsError, SettingsStore};
pub use categorize::{categorize_health_metrics, CategorizedHealthData};
pub use classify::{classify_range, range_status};
pub use models::{get_display_name_for_type, get_unit_for_type};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber for the embedding app.
///
/// Honors `RUST_LOG`, else [`config::default_log_filter`]. A second call is a no-op.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} core v{}", config::APP_NAME, config::APP_VERSION);
    }
}
