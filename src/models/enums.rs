use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid enum value for {field}: {value}")]
pub struct ParseEnumError {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err($crate::models::ParseEnumError {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

pub(crate) use str_enum;

str_enum!(
    /// Bucket a measurement belongs to. Fixed by its `MetricType`.
    MetricCategory {
        Vitals => "vitals",
        Activity => "activity",
        Body => "body",
        Nutrition => "nutrition",
        Sleep => "sleep",
        Mindfulness => "mindfulness",
    }
);

str_enum!(
    /// Classification of a value against a healthy interval.
    DataRange {
        Normal => "normal",
        Warning => "warning",
        Danger => "danger",
    }
);

impl DataRange {
    /// Warning or danger.
    pub fn needs_attention(&self) -> bool {
        !matches!(self, Self::Normal)
    }
}

str_enum!(
    /// Primary presentation mode.
    AccessibilityMode {
        Visual => "visual",
        Audio => "audio",
        Hybrid => "hybrid",
        Simplified => "simplified",
    }
);

str_enum!(FontSize {
    Small => "small",
    Medium => "medium",
    Large => "large",
    ExtraLarge => "extra_large",
});

str_enum!(ContrastLevel {
    Normal => "normal",
    High => "high",
    Maximum => "maximum",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn category_round_trip() {
        for (variant, s) in [
            (MetricCategory::Vitals, "vitals"),
            (MetricCategory::Activity, "activity"),
            (MetricCategory::Body, "body"),
            (MetricCategory::Nutrition, "nutrition"),
            (MetricCategory::Sleep, "sleep"),
            (MetricCategory::Mindfulness, "mindfulness"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(MetricCategory::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn category_all_has_six_in_order() {
        assert_eq!(MetricCategory::ALL.len(), 6);
        assert_eq!(MetricCategory::ALL[0], MetricCategory::Vitals);
        assert_eq!(MetricCategory::ALL[5], MetricCategory::Mindfulness);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = AccessibilityMode::from_str("braille").unwrap_err();
        assert_eq!(err.field, "AccessibilityMode");
        assert_eq!(err.value, "braille");
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&FontSize::ExtraLarge).unwrap();
        assert_eq!(json, "\"extra_large\"");
        let back: DataRange = serde_json::from_str("\"danger\"").unwrap();
        assert_eq!(back, DataRange::Danger);
    }

    #[test]
    fn only_normal_needs_no_attention() {
        assert!(!DataRange::Normal.needs_attention());
        assert!(DataRange::Warning.needs_attention());
        assert!(DataRange::Danger.needs_attention());
    }
}
