//! Spoken descriptions of metrics for screen readers.

use crate::models::{DataRange, HealthMetric, MetricCategory, MetricType};

/// Format a value for speech: counted types without decimals, others with one.
pub fn format_value(metric_type: MetricType, value: f64) -> String {
    if metric_type.is_whole_number() {
        format!("{}", value.round() as i64)
    } else {
        let rounded = (value * 10.0).round() / 10.0;
        if rounded.fract() == 0.0 {
            format!("{}", rounded as i64)
        } else {
            format!("{rounded:.1}")
        }
    }
}

fn range_word(range: DataRange) -> &'static str {
    match range {
        DataRange::Normal => "normal",
        DataRange::Warning => "outside the normal range",
        DataRange::Danger => "far outside the normal range",
    }
}

/// One-sentence description, e.g. "Heart Rate: 72 beats per minute, normal."
pub fn describe_metric(metric: &HealthMetric) -> String {
    let t = metric.metric_type();
    let value = match metric.diastolic() {
        Some(diastolic) => format!(
            "{} over {}",
            format_value(t, metric.value()),
            format_value(t, diastolic)
        ),
        None => format_value(t, metric.value()),
    };

    match metric.range() {
        Some(range) => format!(
            "{}: {} {}, {}.",
            t.display_name(),
            value,
            t.spoken_unit(),
            range_word(range)
        ),
        None => format!("{}: {} {}.", t.display_name(), value, t.spoken_unit()),
    }
}

fn category_title(category: MetricCategory) -> &'static str {
    match category {
        MetricCategory::Vitals => "Vitals",
        MetricCategory::Activity => "Activity",
        MetricCategory::Body => "Body",
        MetricCategory::Nutrition => "Nutrition",
        MetricCategory::Sleep => "Sleep",
        MetricCategory::Mindfulness => "Mindfulness",
    }
}

/// Summary of one category bucket: count, readings needing attention, latest.
pub fn describe_category(category: MetricCategory, metrics: &[HealthMetric]) -> String {
    let title = category_title(category);
    if metrics.is_empty() {
        return format!("{title}: no readings.");
    }

    let count = metrics.len();
    let flagged = metrics
        .iter()
        .filter(|m| m.range().is_some_and(|r| r.needs_attention()))
        .count();
    let noun = if count == 1 { "reading" } else { "readings" };

    let mut text = format!("{title}: {count} {noun}.");
    if flagged > 0 {
        let verb = if flagged == 1 { "needs" } else { "need" };
        text.push_str(&format!(" {flagged} {verb} attention."));
    }
    if let Some(latest) = metrics.iter().max_by_key(|m| m.timestamp()) {
        text.push_str(" Latest: ");
        text.push_str(&describe_metric(latest));
    }
    text
}
