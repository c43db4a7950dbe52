use serde::{Deserialize, Serialize};

use super::enums::{str_enum, MetricCategory};

str_enum!(
    /// Kind of health measurement. Each kind has exactly one category and one unit.
    MetricType {
        HeartRate => "heart_rate",
        RestingHeartRate => "resting_heart_rate",
        HeartRateVariability => "heart_rate_variability",
        BloodPressure => "blood_pressure",
        BloodOxygen => "blood_oxygen",
        RespiratoryRate => "respiratory_rate",
        BodyTemperature => "body_temperature",
        BloodGlucose => "blood_glucose",
        Steps => "steps",
        Distance => "distance",
        ActiveEnergy => "active_energy",
        ExerciseMinutes => "exercise_minutes",
        FlightsClimbed => "flights_climbed",
        StandHours => "stand_hours",
        Weight => "weight",
        Height => "height",
        Bmi => "bmi",
        BodyFat => "body_fat",
        Calories => "calories",
        Water => "water",
        Protein => "protein",
        Carbohydrates => "carbohydrates",
        Sleep => "sleep",
        DeepSleep => "deep_sleep",
        RemSleep => "rem_sleep",
        MindfulMinutes => "mindful_minutes",
        Mood => "mood",
    }
);

impl MetricType {
    pub fn category(self) -> MetricCategory {
        use MetricType::*;
        match self {
            HeartRate | RestingHeartRate | HeartRateVariability | BloodPressure | BloodOxygen
            | RespiratoryRate | BodyTemperature | BloodGlucose => MetricCategory::Vitals,
            Steps | Distance | ActiveEnergy | ExerciseMinutes | FlightsClimbed | StandHours => {
                MetricCategory::Activity
            }
            Weight | Height | Bmi | BodyFat => MetricCategory::Body,
            Calories | Water | Protein | Carbohydrates => MetricCategory::Nutrition,
            Sleep | DeepSleep | RemSleep => MetricCategory::Sleep,
            MindfulMinutes | Mood => MetricCategory::Mindfulness,
        }
    }

    /// Canonical display unit for this type.
    pub fn unit(self) -> &'static str {
        use MetricType::*;
        match self {
            HeartRate | RestingHeartRate => "bpm",
            HeartRateVariability => "ms",
            BloodPressure => "mmHg",
            BloodOxygen | BodyFat => "%",
            RespiratoryRate => "breaths/min",
            BodyTemperature => "°C",
            BloodGlucose => "mg/dL",
            Steps => "steps",
            Distance => "km",
            ActiveEnergy | Calories => "kcal",
            ExerciseMinutes | MindfulMinutes => "min",
            FlightsClimbed => "floors",
            StandHours | Sleep | DeepSleep | RemSleep => "hr",
            Weight => "kg",
            Height => "cm",
            Bmi => "kg/m²",
            Water => "mL",
            Protein | Carbohydrates => "g",
            Mood => "/10",
        }
    }

    pub fn display_name(self) -> &'static str {
        use MetricType::*;
        match self {
            HeartRate => "Heart Rate",
            RestingHeartRate => "Resting Heart Rate",
            HeartRateVariability => "Heart Rate Variability",
            BloodPressure => "Blood Pressure",
            BloodOxygen => "Blood Oxygen",
            RespiratoryRate => "Respiratory Rate",
            BodyTemperature => "Body Temperature",
            BloodGlucose => "Blood Glucose",
            Steps => "Steps",
            Distance => "Distance",
            ActiveEnergy => "Active Energy",
            ExerciseMinutes => "Exercise Minutes",
            FlightsClimbed => "Flights Climbed",
            StandHours => "Stand Hours",
            Weight => "Weight",
            Height => "Height",
            Bmi => "Body Mass Index",
            BodyFat => "Body Fat",
            Calories => "Calories",
            Water => "Water",
            Protein => "Protein",
            Carbohydrates => "Carbohydrates",
            Sleep => "Sleep",
            DeepSleep => "Deep Sleep",
            RemSleep => "REM Sleep",
            MindfulMinutes => "Mindful Minutes",
            Mood => "Mood",
        }
    }

    /// Unit as a screen reader should pronounce it.
    pub fn spoken_unit(self) -> &'static str {
        use MetricType::*;
        match self {
            HeartRate | RestingHeartRate => "beats per minute",
            HeartRateVariability => "milliseconds",
            BloodPressure => "millimeters of mercury",
            BloodOxygen | BodyFat => "percent",
            RespiratoryRate => "breaths per minute",
            BodyTemperature => "degrees Celsius",
            BloodGlucose => "milligrams per deciliter",
            Steps => "steps",
            Distance => "kilometers",
            ActiveEnergy | Calories => "kilocalories",
            ExerciseMinutes | MindfulMinutes => "minutes",
            FlightsClimbed => "floors",
            StandHours | Sleep | DeepSleep | RemSleep => "hours",
            Weight => "kilograms",
            Height => "centimeters",
            Bmi => "kilograms per square meter",
            Water => "milliliters",
            Protein | Carbohydrates => "grams",
            Mood => "out of 10",
        }
    }

    /// Counted quantities that read better without decimals.
    pub fn is_whole_number(self) -> bool {
        use MetricType::*;
        matches!(
            self,
            HeartRate
                | RestingHeartRate
                | HeartRateVariability
                | BloodPressure
                | RespiratoryRate
                | Steps
                | ActiveEnergy
                | ExerciseMinutes
                | FlightsClimbed
                | StandHours
                | Calories
                | Water
                | MindfulMinutes
        )
    }
}

/// Canonical unit for `metric_type`.
pub fn get_unit_for_type(metric_type: MetricType) -> &'static str {
    metric_type.unit()
}

/// Human-readable name for `metric_type`.
pub fn get_display_name_for_type(metric_type: MetricType) -> &'static str {
    metric_type.display_name()
}
