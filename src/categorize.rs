use serde::{Serialize, Serializer};
use serde::ser::SerializeMap;

use crate::models::{HealthMetric, MetricCategory};

/// Metrics grouped by category, insertion order kept within each group.
///
/// Built once from a flat list and never mutated; rebuild from the source
/// list to get a different grouping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorizedHealthData {
    vitals: Vec<HealthMetric>,
    activity: Vec<HealthMetric>,
    body: Vec<HealthMetric>,
    nutrition: Vec<HealthMetric>,
    sleep: Vec<HealthMetric>,
    mindfulness: Vec<HealthMetric>,
}

impl CategorizedHealthData {
    /// Partition owned metrics in one pass.
    pub fn from_metrics(metrics: impl IntoIterator<Item = HealthMetric>) -> Self {
        let mut data = Self::default();
        for metric in metrics {
            data.bucket_mut(metric.category()).push(metric);
        }
        data
    }

    pub fn get(&self, category: MetricCategory) -> &[HealthMetric] {
        match category {
            MetricCategory::Vitals => &self.vitals,
            MetricCategory::Activity => &self.activity,
            MetricCategory::Body => &self.body,
            MetricCategory::Nutrition => &self.nutrition,
            MetricCategory::Sleep => &self.sleep,
            MetricCategory::Mindfulness => &self.mindfulness,
        }
    }

    fn bucket_mut(&mut self, category: MetricCategory) -> &mut Vec<HealthMetric> {
        match category {
            MetricCategory::Vitals => &mut self.vitals,
            MetricCategory::Activity => &mut self.activity,
            MetricCategory::Body => &mut self.body,
            MetricCategory::Nutrition => &mut self.nutrition,
            MetricCategory::Sleep => &mut self.sleep,
            MetricCategory::Mindfulness => &mut self.mindfulness,
        }
    }

    /// All six categories in fixed order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (MetricCategory, &[HealthMetric])> {
        MetricCategory::ALL.iter().map(move |c| (*c, self.get(*c)))
    }

    pub fn total_len(&self) -> usize {
        self.iter().map(|(_, m)| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }
}

impl Serialize for CategorizedHealthData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MetricCategory::ALL.len()))?;
        for (category, metrics) in self.iter() {
            map.serialize_entry(category.as_str(), metrics)?;
        }
        map.end()
    }
}

/// Group a flat list of metrics by their `category` field.
pub fn categorize_health_metrics(metrics: &[HealthMetric]) -> CategorizedHealthData {
    CategorizedHealthData::from_metrics(metrics.iter().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricType;
    use chrono::{Duration, TimeZone, Utc};

    fn metric(id: &str, t: MetricType, value: f64, minutes: i64) -> HealthMetric {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        HealthMetric::new(id, t, value, base + Duration::minutes(minutes))
    }

    #[test]
    fn empty_input_has_all_six_keys() {
        let data = categorize_health_metrics(&[]);
        assert!(data.is_empty());
        assert_eq!(data.iter().count(), 6);

        let json = serde_json::to_value(&data).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 6);
        for c in MetricCategory::ALL {
            assert_eq!(obj[c.as_str()], serde_json::json!([]));
        }
    }

    #[test]
    fn partition_is_total_and_by_category() {
        let metrics = vec![
            metric("a", MetricType::HeartRate, 70.0, 0),
            metric("b", MetricType::Steps, 3000.0, 1),
            metric("c", MetricType::Weight, 72.5, 2),
            metric("d", MetricType::Sleep, 7.5, 3),
            metric("e", MetricType::Water, 1500.0, 4),
            metric("f", MetricType::MindfulMinutes, 10.0, 5),
            metric("g", MetricType::BloodGlucose, 99.0, 6),
        ];
        let data = categorize_health_metrics(&metrics);

        assert_eq!(data.total_len(), metrics.len());
        for (category, bucket) in data.iter() {
            assert!(bucket.iter().all(|m| m.category() == category));
        }
        assert_eq!(data.get(MetricCategory::Vitals).len(), 2);
        assert_eq!(data.get(MetricCategory::Nutrition).len(), 1);
    }

    #[test]
    fn insertion_order_preserved_not_sorted() {
        let metrics = vec![
            metric("late", MetricType::HeartRate, 80.0, 90),
            metric("steps", MetricType::Steps, 10.0, 0),
            metric("early", MetricType::HeartRate, 65.0, 5),
        ];
        let data = categorize_health_metrics(&metrics);
        let ids: Vec<&str> = data
            .get(MetricCategory::Vitals)
            .iter()
            .map(|m| m.id())
            .collect();
        assert_eq!(ids, vec!["late", "early"]);
    }

    #[test]
    fn from_metrics_consumes_without_cloning() {
        let data = CategorizedHealthData::from_metrics(vec![metric("a", MetricType::Bmi, 22.0, 0)]);
        assert_eq!(data.get(MetricCategory::Body)[0].id(), "a");
    }
}
