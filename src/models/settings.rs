use serde::{Deserialize, Serialize};

use super::enums::{AccessibilityMode, ContrastLevel, FontSize};

pub const MIN_SPEECH_RATE: f32 = 0.5;
pub const MAX_SPEECH_RATE: f32 = 2.0;
pub const DEFAULT_SPEECH_RATE: f32 = 1.0;
pub const DEFAULT_AUDIO_VOLUME: f32 = 0.8;

/// Per-channel switches consulted by the UI when choosing a presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub screen_reader: bool,
    pub sonification: bool,
    pub haptic_feedback: bool,
    pub keyboard_only: bool,
    pub simplified_ui: bool,
}

impl FeatureFlags {
    /// Default bundle a mode switch resets the flags to.
    pub fn for_mode(mode: AccessibilityMode) -> Self {
        match mode {
            AccessibilityMode::Visual => Self {
                screen_reader: false,
                sonification: false,
                haptic_feedback: false,
                keyboard_only: false,
                simplified_ui: false,
            },
            AccessibilityMode::Audio => Self {
                screen_reader: true,
                sonification: true,
                haptic_feedback: true,
                keyboard_only: false,
                simplified_ui: true,
            },
            AccessibilityMode::Hybrid => Self {
                screen_reader: true,
                sonification: true,
                haptic_feedback: true,
                keyboard_only: false,
                simplified_ui: false,
            },
            AccessibilityMode::Simplified => Self {
                screen_reader: false,
                sonification: false,
                haptic_feedback: true,
                keyboard_only: false,
                simplified_ui: true,
            },
        }
    }
}

/// App-lifetime accessibility preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccessibilitySettings {
    pub mode: AccessibilityMode,
    pub features: FeatureFlags,
    pub font_size: FontSize,
    pub contrast: ContrastLevel,
    pub speech_rate: f32,
    pub audio_volume: f32,
}

impl Default for AccessibilitySettings {
    fn default() -> Self {
        Self {
            mode: AccessibilityMode::Visual,
            features: FeatureFlags::for_mode(AccessibilityMode::Visual),
            font_size: FontSize::Medium,
            contrast: ContrastLevel::Normal,
            speech_rate: DEFAULT_SPEECH_RATE,
            audio_volume: DEFAULT_AUDIO_VOLUME,
        }
    }
}

impl AccessibilitySettings {
    /// Switch mode and reset every feature flag to that mode's bundle.
    pub fn apply_mode(&mut self, mode: AccessibilityMode) {
        self.mode = mode;
        self.features = FeatureFlags::for_mode(mode);
    }

    /// Set one preference. Returns true if the value changed.
    /// Callers validate with [`Preference::validate`] first.
    pub fn apply(&mut self, pref: Preference) -> bool {
        let before = *self;
        match pref {
            Preference::ScreenReader(v) => self.features.screen_reader = v,
            Preference::Sonification(v) => self.features.sonification = v,
            Preference::HapticFeedback(v) => self.features.haptic_feedback = v,
            Preference::KeyboardOnly(v) => self.features.keyboard_only = v,
            Preference::SimplifiedUi(v) => self.features.simplified_ui = v,
            Preference::FontSize(v) => self.font_size = v,
            Preference::Contrast(v) => self.contrast = v,
            Preference::SpeechRate(v) => self.speech_rate = v,
            Preference::AudioVolume(v) => self.audio_volume = v,
        }
        before != *self
    }

    /// Check numeric bounds. Returns the first offending preference.
    pub fn validate(&self) -> Result<(), PreferenceError> {
        Preference::SpeechRate(self.speech_rate).validate()?;
        Preference::AudioVolume(self.audio_volume).validate()
    }

    /// Every non-mode setting as a preference, in a stable order.
    pub fn preferences(&self) -> [Preference; 9] {
        [
            Preference::ScreenReader(self.features.screen_reader),
            Preference::Sonification(self.features.sonification),
            Preference::HapticFeedback(self.features.haptic_feedback),
            Preference::KeyboardOnly(self.features.keyboard_only),
            Preference::SimplifiedUi(self.features.simplified_ui),
            Preference::FontSize(self.font_size),
            Preference::Contrast(self.contrast),
            Preference::SpeechRate(self.speech_rate),
            Preference::AudioVolume(self.audio_volume),
        ]
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("Unknown preference key: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// A single-setting update. Mode is not a preference: it goes through
/// `set_mode`, which also resets the flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "snake_case")]
pub enum Preference {
    ScreenReader(bool),
    Sonification(bool),
    HapticFeedback(bool),
    KeyboardOnly(bool),
    SimplifiedUi(bool),
    FontSize(FontSize),
    Contrast(ContrastLevel),
    SpeechRate(f32),
    AudioVolume(f32),
}

impl Preference {
    pub fn key(&self) -> &'static str {
        match self {
            Self::ScreenReader(_) => "screen_reader",
            Self::Sonification(_) => "sonification",
            Self::HapticFeedback(_) => "haptic_feedback",
            Self::KeyboardOnly(_) => "keyboard_only",
            Self::SimplifiedUi(_) => "simplified_ui",
            Self::FontSize(_) => "font_size",
            Self::Contrast(_) => "contrast",
            Self::SpeechRate(_) => "speech_rate",
            Self::AudioVolume(_) => "audio_volume",
        }
    }

    /// String form of the value, as stored in key/value persistence.
    pub fn value_string(&self) -> String {
        match self {
            Self::ScreenReader(v)
            | Self::Sonification(v)
            | Self::HapticFeedback(v)
            | Self::KeyboardOnly(v)
            | Self::SimplifiedUi(v) => v.to_string(),
            Self::FontSize(v) => v.as_str().to_string(),
            Self::Contrast(v) => v.as_str().to_string(),
            Self::SpeechRate(v) | Self::AudioVolume(v) => v.to_string(),
        }
    }

    /// Parse a key/value pair. The result is validated.
    pub fn parse(key: &str, value: &str) -> Result<Self, PreferenceError> {
        let pref = match key {
            "screen_reader" => Self::ScreenReader(parse_bool("screen_reader", value)?),
            "sonification" => Self::Sonification(parse_bool("sonification", value)?),
            "haptic_feedback" => Self::HapticFeedback(parse_bool("haptic_feedback", value)?),
            "keyboard_only" => Self::KeyboardOnly(parse_bool("keyboard_only", value)?),
            "simplified_ui" => Self::SimplifiedUi(parse_bool("simplified_ui", value)?),
            "font_size" => Self::FontSize(value.parse().map_err(|_| invalid("font_size", value))?),
            "contrast" => Self::Contrast(value.parse().map_err(|_| invalid("contrast", value))?),
            "speech_rate" => Self::SpeechRate(parse_f32("speech_rate", value)?),
            "audio_volume" => Self::AudioVolume(parse_f32("audio_volume", value)?),
            other => return Err(PreferenceError::UnknownKey(other.to_string())),
        };
        pref.validate()?;
        Ok(pref)
    }

    /// Reject non-finite or out-of-bounds numeric values.
    pub fn validate(&self) -> Result<(), PreferenceError> {
        let ok = match *self {
            Self::SpeechRate(v) => v.is_finite() && (MIN_SPEECH_RATE..=MAX_SPEECH_RATE).contains(&v),
            Self::AudioVolume(v) => v.is_finite() && (0.0..=1.0).contains(&v),
            _ => true,
        };
        if ok {
            Ok(())
        } else {
            Err(PreferenceError::InvalidValue {
                key: self.key(),
                value: self.value_string(),
            })
        }
    }
}

fn invalid(key: &'static str, value: &str) -> PreferenceError {
    PreferenceError::InvalidValue {
        key,
        value: value.to_string(),
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, PreferenceError> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn parse_f32(key: &'static str, value: &str) -> Result<f32, PreferenceError> {
    value.trim().parse::<f32>().map_err(|_| invalid(key, value))
}
