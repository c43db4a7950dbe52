//! Range classification of a measurement against its healthy interval.
//!
//! Values up to 20% outside `[min, max]` are a warning; beyond that, danger.
//! Types with no entry in the range table always classify as normal through
//! [`classify_range`]; [`range_status`] keeps that case distinguishable.
//!
//! Non-finite input: infinities fall out of the comparisons as danger. NaN
//! cannot be placed relative to the bounds and is reported as a warning.

use serde::Serialize;

use crate::models::{DataRange, MetricType};

/// Below `min * DANGER_LOW_FACTOR` is danger.
const DANGER_LOW_FACTOR: f64 = 0.8;
/// Above `max * DANGER_HIGH_FACTOR` is danger.
const DANGER_HIGH_FACTOR: f64 = 1.2;

/// Healthy interval for one metric type, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalRange {
    pub min: f64,
    pub max: f64,
}

impl NormalRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn danger_floor(&self) -> f64 {
        self.min * DANGER_LOW_FACTOR
    }

    pub fn danger_ceiling(&self) -> f64 {
        self.max * DANGER_HIGH_FACTOR
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn classify(&self, value: f64) -> DataRange {
        if value.is_nan() {
            return DataRange::Warning;
        }
        if value < self.danger_floor() || value > self.danger_ceiling() {
            DataRange::Danger
        } else if value < self.min || value > self.max {
            DataRange::Warning
        } else {
            DataRange::Normal
        }
    }
}

/// Normal-range table. `None` for types without a clinical interval.
pub fn normal_range(metric_type: MetricType) -> Option<NormalRange> {
    use MetricType::*;
    let range = match metric_type {
        HeartRate => NormalRange::new(60.0, 100.0),
        RestingHeartRate => NormalRange::new(50.0, 90.0),
        HeartRateVariability => NormalRange::new(20.0, 200.0),
        // systolic
        BloodPressure => NormalRange::new(90.0, 120.0),
        BloodOxygen => NormalRange::new(95.0, 100.0),
        RespiratoryRate => NormalRange::new(12.0, 20.0),
        BodyTemperature => NormalRange::new(36.1, 37.2),
        BloodGlucose => NormalRange::new(70.0, 140.0),
        Bmi => NormalRange::new(18.5, 24.9),
        Sleep => NormalRange::new(7.0, 9.0),
        _ => return None,
    };
    Some(range)
}

/// Classify `value` for `metric_type`. Types without a range are `Normal`.
pub fn classify_range(metric_type: MetricType, value: f64) -> DataRange {
    range_status(metric_type, value).unwrap_or(DataRange::Normal)
}

/// Like [`classify_range`] but `None` when the type has no defined range.
pub fn range_status(metric_type: MetricType, value: f64) -> Option<DataRange> {
    normal_range(metric_type).map(|r| r.classify(value))
}

/// Classify by type name. Unknown names are treated as having no range data.
pub fn classify_range_str(metric_type: &str, value: f64) -> DataRange {
    match metric_type.parse::<MetricType>() {
        Ok(t) => classify_range(t, value),
        Err(_) => {
            tracing::debug!(metric_type, "No range data for unknown metric type");
            DataRange::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranged_types() -> Vec<(MetricType, NormalRange)> {
        MetricType::ALL
            .iter()
            .filter_map(|t| normal_range(*t).map(|r| (*t, r)))
            .collect()
    }

    #[test]
    fn bounds_are_normal() {
        for (t, r) in ranged_types() {
            assert_eq!(classify_range(t, r.min), DataRange::Normal, "{t} at min");
            assert_eq!(classify_range(t, r.max), DataRange::Normal, "{t} at max");
        }
    }

    #[test]
    fn just_below_min_is_warning() {
        for (t, r) in ranged_types() {
            let v = r.min - 0.0001 * r.min;
            assert_eq!(classify_range(t, v), DataRange::Warning, "{t} at {v}");
        }
    }

    #[test]
    fn far_below_min_is_danger() {
        for (t, r) in ranged_types() {
            let v = r.min * 0.8 - 0.01;
            assert_eq!(classify_range(t, v), DataRange::Danger, "{t} at {v}");
        }
    }

    #[test]
    fn exact_danger_thresholds_are_warning() {
        let r = NormalRange::new(100.0, 200.0);
        assert_eq!(r.classify(80.0), DataRange::Warning);
        assert_eq!(r.classify(240.0), DataRange::Warning);
        assert_eq!(r.classify(240.001), DataRange::Danger);
    }

    #[test]
    fn unranged_type_is_always_normal() {
        assert_eq!(classify_range(MetricType::Steps, -50.0), DataRange::Normal);
        assert_eq!(classify_range(MetricType::Steps, 1e12), DataRange::Normal);
        assert_eq!(range_status(MetricType::Steps, 100.0), None);
    }

    #[test]
    fn heart_rate_200_is_danger() {
        assert_eq!(classify_range(MetricType::HeartRate, 200.0), DataRange::Danger);
    }

    #[test]
    fn blood_glucose_145_is_warning() {
        assert_eq!(classify_range(MetricType::BloodGlucose, 145.0), DataRange::Warning);
        assert_eq!(classify_range(MetricType::BloodGlucose, 168.0), DataRange::Warning);
        assert_eq!(classify_range(MetricType::BloodGlucose, 169.0), DataRange::Danger);
    }

    #[test]
    fn non_finite_policy() {
        assert_eq!(classify_range(MetricType::HeartRate, f64::INFINITY), DataRange::Danger);
        assert_eq!(classify_range(MetricType::HeartRate, f64::NEG_INFINITY), DataRange::Danger);
        assert_eq!(classify_range(MetricType::HeartRate, f64::NAN), DataRange::Warning);
        assert_eq!(classify_range(MetricType::Steps, f64::NAN), DataRange::Normal);
    }

    #[test]
    fn unknown_type_name_is_normal() {
        assert_eq!(classify_range_str("cholesterol", 900.0), DataRange::Normal);
        assert_eq!(classify_range_str("heart_rate", 200.0), DataRange::Danger);
    }
}
