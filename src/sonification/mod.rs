//! Sonification: mapping measurements to tones.
//!
//! Three fixed cue tones mark where a reading sits (low/medium inside the
//! normal range, high outside it). Series playback maps each value onto a
//! continuous pitch scale relative to the series' own extent.

pub mod tone;
pub mod wav;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::classify::normal_range;
use crate::config;
use crate::models::{DataRange, HealthMetric, MetricType};

pub use tone::{synthesize_tone, ToneSpec};
pub use wav::encode_wav;

/// Lowest pitch used for series playback.
pub const MIN_PITCH_HZ: f64 = 200.0;
/// Highest pitch used for series playback.
pub const MAX_PITCH_HZ: f64 = 1000.0;

#[derive(Error, Debug)]
pub enum SonificationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid tone spec: {0}")]
    InvalidSpec(String),
}

/// Cue tone for a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneLevel {
    Low,
    Medium,
    High,
}

impl ToneLevel {
    pub const ALL: [ToneLevel; 3] = [ToneLevel::Low, ToneLevel::Medium, ToneLevel::High];

    pub fn frequency_hz(self) -> f64 {
        match self {
            ToneLevel::Low => 300.0,
            ToneLevel::Medium => 500.0,
            ToneLevel::High => 800.0,
        }
    }

    /// Asset file name the players look up.
    pub fn file_name(self) -> &'static str {
        match self {
            ToneLevel::Low => "tone-low.wav",
            ToneLevel::Medium => "tone-medium.wav",
            ToneLevel::High => "tone-high.wav",
        }
    }
}

/// Cue tone for a value: high when out of range, otherwise low/medium by
/// which half of the normal range it falls in. Unranged types get medium.
pub fn tone_for(metric_type: MetricType, value: f64) -> ToneLevel {
    let Some(range) = normal_range(metric_type) else {
        return ToneLevel::Medium;
    };
    match range.classify(value) {
        DataRange::Warning | DataRange::Danger => ToneLevel::High,
        DataRange::Normal if value < range.midpoint() => ToneLevel::Low,
        DataRange::Normal => ToneLevel::Medium,
    }
}

pub fn tone_for_metric(metric: &HealthMetric) -> ToneLevel {
    tone_for(metric.metric_type(), metric.value())
}

/// Map `value` linearly from `[lo, hi]` onto the playback pitch scale.
/// Out-of-span values clamp; an empty or non-finite span gives the middle pitch.
pub fn pitch_for_value(value: f64, lo: f64, hi: f64) -> f64 {
    let span = hi - lo;
    if !value.is_finite() || !span.is_finite() || span <= 0.0 {
        return (MIN_PITCH_HZ + MAX_PITCH_HZ) / 2.0;
    }
    let t = ((value - lo) / span).clamp(0.0, 1.0);
    MIN_PITCH_HZ + t * (MAX_PITCH_HZ - MIN_PITCH_HZ)
}

/// One step of series playback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToneEvent {
    pub metric_id: String,
    pub timestamp: DateTime<Utc>,
    pub pitch_hz: f64,
    pub tone: ToneLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<DataRange>,
}

/// Tone events for a series, in input order. Pitch is relative to the
/// series' own minimum and maximum.
pub fn sonify_series(metrics: &[HealthMetric]) -> Vec<ToneEvent> {
    let (lo, hi) = metrics
        .iter()
        .map(|m| m.value())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    metrics
        .iter()
        .map(|m| ToneEvent {
            metric_id: m.id().to_string(),
            timestamp: m.timestamp(),
            pitch_hz: pitch_for_value(m.value(), lo, hi),
            tone: tone_for_metric(m),
            range: m.range(),
        })
        .collect()
}

/// Write the three cue tones as WAV files into `dir`.
pub fn write_tone_assets(dir: &Path, spec: &ToneSpec) -> Result<Vec<PathBuf>, SonificationError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(ToneLevel::ALL.len());
    for level in ToneLevel::ALL {
        let samples = synthesize_tone(level.frequency_hz(), spec)?;
        let path = dir.join(level.file_name());
        std::fs::write(&path, encode_wav(&samples, spec.sample_rate))?;
        tracing::info!(
            file = level.file_name(),
            frequency_hz = level.frequency_hz(),
            "Generated tone"
        );
        written.push(path);
    }
    Ok(written)
}

/// Generate the cue tones into the app's tone directory with default settings.
pub fn install_default_tones() -> Result<Vec<PathBuf>, SonificationError> {
    write_tone_assets(&config::tones_dir(), &ToneSpec::default())
}
