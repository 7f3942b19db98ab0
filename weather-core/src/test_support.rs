use crate::model::{Condition, ConditionKind, WeatherSample};

pub(crate) fn sample_with(timestamp: i64, temperature: f64, category: &str, icon: &str) -> WeatherSample {
    WeatherSample {
        timestamp,
        temperature,
        feels_like: temperature - 1.5,
        temp_min: temperature - 1.0,
        temp_max: temperature + 1.0,
        humidity: 60,
        pressure: 1013.0,
        wind_speed: 5.0,
        wind_direction: 180.0,
        condition: Condition {
            kind: ConditionKind::from_category(category),
            description: format!("{} sky", category.to_lowercase()),
            icon: icon.to_string(),
        },
    }
}

pub(crate) fn sample_at(timestamp: i64) -> WeatherSample {
    sample_with(timestamp, 15.0, "Clear", "01d")
}
