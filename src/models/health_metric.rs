use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::enums::{DataRange, MetricCategory};
use super::metric_type::MetricType;
use crate::classify::range_status;

/// Open per-type extra fields (e.g. `diastolic` next to a systolic reading).
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Metadata key carrying the diastolic companion of a blood pressure reading.
pub const DIASTOLIC_KEY: &str = "diastolic";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("Unknown metric type: {0}")]
    UnknownType(String),

    #[error("Non-finite value for {metric_type}: {value}")]
    NonFiniteValue { metric_type: MetricType, value: f64 },

    #[error("Unit mismatch for {metric_type}: expected {expected}, got {actual}")]
    UnitMismatch {
        metric_type: MetricType,
        expected: &'static str,
        actual: String,
    },

    #[error("Category mismatch for {metric_type}: expected {expected}, got {actual}")]
    CategoryMismatch {
        metric_type: MetricType,
        expected: MetricCategory,
        actual: MetricCategory,
    },
}

/// A single health measurement.
///
/// `category`, `unit` and `range` are derived from `metric_type` (and `value`)
/// when the metric is built and cannot be set on their own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthMetric {
    id: String,
    category: MetricCategory,
    #[serde(rename = "type")]
    metric_type: MetricType,
    value: f64,
    timestamp: DateTime<Utc>,
    unit: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<DataRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

impl HealthMetric {
    pub fn new(
        id: impl Into<String>,
        metric_type: MetricType,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            category: metric_type.category(),
            metric_type,
            value,
            timestamp,
            unit: metric_type.unit(),
            range: range_status(metric_type, value),
            metadata: None,
        }
    }

    /// Normalize an ingested record into the unified shape.
    pub fn from_raw(raw: RawHealthRecord) -> Result<Self, MetricError> {
        let metric_type: MetricType = raw
            .metric_type
            .parse()
            .map_err(|_| MetricError::UnknownType(raw.metric_type.clone()))?;

        if !raw.value.is_finite() {
            return Err(MetricError::NonFiniteValue {
                metric_type,
                value: raw.value,
            });
        }

        if let Some(unit) = raw.unit {
            if unit != metric_type.unit() {
                return Err(MetricError::UnitMismatch {
                    metric_type,
                    expected: metric_type.unit(),
                    actual: unit,
                });
            }
        }

        let id = raw.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut metric = Self::new(id, metric_type, raw.value, raw.timestamp);
        metric.metadata = raw.metadata.filter(|m| !m.is_empty());
        Ok(metric)
    }

    /// Attach one metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> MetricCategory {
        self.category
    }

    pub fn metric_type(&self) -> MetricType {
        self.metric_type
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn unit(&self) -> &'static str {
        self.unit
    }

    /// `None` when the type has no defined normal range.
    pub fn range(&self) -> Option<DataRange> {
        self.range
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn metadata_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.as_ref().and_then(|m| m.get(key))
    }

    /// Diastolic companion of a blood pressure reading, if recorded.
    pub fn diastolic(&self) -> Option<f64> {
        if self.metric_type != MetricType::BloodPressure {
            return None;
        }
        self.metadata_value(DIASTOLIC_KEY).and_then(|v| v.as_f64())
    }
}

/// Record shape produced by ingestion sources before normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHealthRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub metric_type: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Wire form accepted when deserializing a `HealthMetric`. Derived fields are
/// optional and checked against the type; `range` is always recomputed.
#[derive(Deserialize)]
struct HealthMetricRepr {
    id: String,
    #[serde(default)]
    category: Option<MetricCategory>,
    #[serde(rename = "type")]
    metric_type: MetricType,
    value: f64,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    metadata: Option<Metadata>,
}

impl TryFrom<HealthMetricRepr> for HealthMetric {
    type Error = MetricError;

    fn try_from(repr: HealthMetricRepr) -> Result<Self, Self::Error> {
        if let Some(actual) = repr.category {
            let expected = repr.metric_type.category();
            if actual != expected {
                return Err(MetricError::CategoryMismatch {
                    metric_type: repr.metric_type,
                    expected,
                    actual,
                });
            }
        }

        Self::from_raw(RawHealthRecord {
            id: Some(repr.id),
            metric_type: repr.metric_type.as_str().to_string(),
            value: repr.value,
            timestamp: repr.timestamp,
            unit: repr.unit,
            metadata: repr.metadata,
        })
    }
}

impl<'de> Deserialize<'de> for HealthMetric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = HealthMetricRepr::deserialize(deserializer)?;
        HealthMetric::try_from(repr).map_err(serde::de::Error::custom)
    }
}
