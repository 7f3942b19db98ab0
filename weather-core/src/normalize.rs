//! Conversion of raw OpenWeather JSON into the validated model.
//!
//! Every provider field is optional here. This module is the only place that
//! decides what a missing field means: a sample missing anything is dropped
//! (with a warning), never defaulted into the dataset.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::{Result, SampleError, WeatherError},
    model::{
        Condition, ConditionKind, CurrentObservation, ForecastSeries, Location, LocationSunState,
        WeatherSample,
    },
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMain {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCondition {
    pub main: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWind {
    pub speed: Option<f64>,
    pub deg: Option<f64>,
}

/// One entry of the provider's `list`, or the body of a current-weather reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSample {
    pub dt: Option<i64>,
    pub main: Option<RawMain>,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
    pub wind: Option<RawWind>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSys {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCurrent {
    pub name: Option<String>,
    pub timezone: Option<i32>,
    pub sys: Option<RawSys>,
    #[serde(flatten)]
    pub sample: RawSample,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCity {
    pub name: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<i32>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForecast {
    pub city: Option<RawCity>,
    /// Kept untyped so one mistyped entry cannot reject the whole payload.
    #[serde(default)]
    pub list: Vec<serde_json::Value>,
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, SampleError> {
    value.ok_or(SampleError::MissingField(field))
}

impl TryFrom<RawSample> for WeatherSample {
    type Error = SampleError;

    fn try_from(raw: RawSample) -> Result<Self, Self::Error> {
        let timestamp = require(raw.dt, "dt")?;
        let main = require(raw.main, "main")?;
        let wind = require(raw.wind, "wind")?;
        let condition = require(raw.weather.into_iter().next(), "weather")?;

        let humidity = require(main.humidity, "main.humidity")?;
        let humidity = u8::try_from(humidity)
            .ok()
            .filter(|h| *h <= 100)
            .ok_or_else(|| SampleError::InvalidField {
                field: "main.humidity",
                reason: format!("{humidity} is outside 0..=100"),
            })?;

        let category = require(condition.main, "weather.main")?;

        Ok(WeatherSample {
            timestamp,
            temperature: require(main.temp, "main.temp")?,
            feels_like: require(main.feels_like, "main.feels_like")?,
            temp_min: require(main.temp_min, "main.temp_min")?,
            temp_max: require(main.temp_max, "main.temp_max")?,
            humidity,
            pressure: require(main.pressure, "main.pressure")?,
            wind_speed: require(wind.speed, "wind.speed")?,
            wind_direction: require(wind.deg, "wind.deg")?,
            condition: Condition {
                kind: ConditionKind::from_category(&category),
                description: require(condition.description, "weather.description")?,
                icon: require(condition.icon, "weather.icon")?,
            },
        })
    }
}

fn sample_from_value(entry: serde_json::Value) -> Result<WeatherSample, SampleError> {
    let raw: RawSample =
        serde_json::from_value(entry).map_err(|err| SampleError::Malformed(err.to_string()))?;
    WeatherSample::try_from(raw)
}

/// Normalizes a forecast payload, skipping samples that fail validation.
///
/// An empty result is not an error; callers surface it as a "no data" state.
pub fn normalize_forecast(raw: RawForecast) -> ForecastSeries {
    let city = raw.city.unwrap_or_default();
    let location = Location {
        name: city.name.unwrap_or_default(),
        country: city.country.unwrap_or_default(),
        utc_offset_secs: city.timezone,
        sun: LocationSunState::new(city.sunrise.unwrap_or(0), city.sunset.unwrap_or(0)),
    };

    let total = raw.list.len();
    let samples: Vec<WeatherSample> = raw
        .list
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match sample_from_value(entry) {
            Ok(sample) => Some(sample),
            Err(err) => {
                warn!(index, error = %err, "skipping invalid forecast sample");
                None
            }
        })
        .collect();

    debug!(total, kept = samples.len(), city = %location.name, "normalized forecast");

    ForecastSeries { location, samples }
}

/// Normalizes a current-weather payload. Unlike forecasts there is nothing to
/// fall back on, so an invalid sample yields [`WeatherError::NoData`].
pub fn normalize_current(raw: RawCurrent, requested_city: &str) -> Result<CurrentObservation> {
    let sys = raw.sys.unwrap_or_default();
    let location = Location {
        name: raw.name.unwrap_or_else(|| requested_city.to_string()),
        country: sys.country.unwrap_or_default(),
        utc_offset_secs: raw.timezone,
        sun: LocationSunState::new(sys.sunrise.unwrap_or(0), sys.sunset.unwrap_or(0)),
    };

    let sample = WeatherSample::try_from(raw.sample).map_err(|err| {
        warn!(city = requested_city, error = %err, "current weather sample is incomplete");
        WeatherError::NoData(requested_city.to_string())
    })?;

    Ok(CurrentObservation { location, sample })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(dt: i64) -> serde_json::Value {
        json!({
            "dt": dt,
            "main": {
                "temp": 12.4, "feels_like": 11.0, "temp_min": 10.2, "temp_max": 13.9,
                "pressure": 1012, "humidity": 71
            },
            "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
            "wind": { "speed": 4.1, "deg": 240 }
        })
    }

    #[test]
    fn complete_entry_normalizes() {
        let raw: RawSample = serde_json::from_value(entry(1_700_000_000)).expect("valid json");
        let sample = WeatherSample::try_from(raw).expect("complete sample");

        assert_eq!(sample.timestamp, 1_700_000_000);
        assert_eq!(sample.humidity, 71);
        assert!((sample.pressure - 1012.0).abs() < f64::EPSILON);
        assert_eq!(sample.condition.kind, ConditionKind::Rain);
        assert_eq!(sample.condition.icon, "10d");
    }

    #[test]
    fn missing_timestamp_is_reported() {
        let mut value = entry(0);
        value.as_object_mut().expect("object").remove("dt");
        let raw: RawSample = serde_json::from_value(value).expect("valid json");

        assert_eq!(WeatherSample::try_from(raw).unwrap_err(), SampleError::MissingField("dt"));
    }

    #[test]
    fn empty_weather_array_is_missing_condition() {
        let mut value = entry(1);
        value["weather"] = json!([]);
        let raw: RawSample = serde_json::from_value(value).expect("valid json");

        assert_eq!(WeatherSample::try_from(raw).unwrap_err(), SampleError::MissingField("weather"));
    }

    #[test]
    fn humidity_above_hundred_is_invalid() {
        let mut value = entry(1);
        value["main"]["humidity"] = json!(140);
        let raw: RawSample = serde_json::from_value(value).expect("valid json");

        assert!(matches!(
            WeatherSample::try_from(raw),
            Err(SampleError::InvalidField { field: "main.humidity", .. })
        ));
    }

    #[test]
    fn forecast_skips_incomplete_entries_and_keeps_order() {
        let mut broken = entry(200);
        broken["main"].as_object_mut().expect("object").remove("temp");

        let raw: RawForecast = serde_json::from_value(json!({
            "city": { "name": "Oslo", "country": "NO", "timezone": 3600, "sunrise": 100, "sunset": 900 },
            "list": [entry(100), broken, entry(300)]
        }))
        .expect("valid json");

        let series = normalize_forecast(raw);
        let stamps: Vec<i64> = series.samples.iter().map(|s| s.timestamp).collect();

        assert_eq!(stamps, vec![100, 300]);
        assert_eq!(series.location.display_name(), "Oslo, NO");
        assert_eq!(series.location.utc_offset_secs, Some(3600));
        assert_eq!(series.location.sun, LocationSunState::new(100, 900));
    }

    #[test]
    fn mistyped_entry_does_not_reject_its_neighbours() {
        let mut mistyped = entry(200);
        mistyped["main"]["humidity"] = json!(71.5);
        let mut string_dt = entry(250);
        string_dt["dt"] = json!("soon");

        let raw: RawForecast = serde_json::from_value(json!({
            "list": [entry(100), mistyped, string_dt, entry(300)]
        }))
        .expect("envelope parses");

        let series = normalize_forecast(raw);
        let stamps: Vec<i64> = series.samples.iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![100, 300]);
    }

    #[test]
    fn mistyped_entry_is_reported_as_malformed() {
        let mut value = entry(1);
        value["main"]["humidity"] = json!(71.5);

        assert!(matches!(sample_from_value(value), Err(SampleError::Malformed(_))));
    }

    #[test]
    fn forecast_without_city_degrades_to_absent_sun() {
        let raw: RawForecast = serde_json::from_value(json!({ "list": [] })).expect("valid json");
        let series = normalize_forecast(raw);

        assert!(series.samples.is_empty());
        assert!(series.location.sun.is_absent());
    }

    #[test]
    fn current_weather_reads_sys_block() {
        let mut value = entry(1_700_000_000);
        value["name"] = json!("Lisbon");
        value["timezone"] = json!(0);
        value["sys"] = json!({ "country": "PT", "sunrise": 1_699_990_000, "sunset": 1_700_030_000 });
        let raw: RawCurrent = serde_json::from_value(value).expect("valid json");

        let current = normalize_current(raw, "lisbon").expect("complete observation");
        assert_eq!(current.location.name, "Lisbon");
        assert_eq!(current.location.country, "PT");
        assert_eq!(current.location.sun, LocationSunState::new(1_699_990_000, 1_700_030_000));
    }

    #[test]
    fn incomplete_current_weather_is_no_data() {
        let raw: RawCurrent = serde_json::from_value(json!({ "name": "Nowhere" })).expect("valid json");
        let err = normalize_current(raw, "nowhere").unwrap_err();
        assert!(matches!(err, WeatherError::NoData(_)));
    }
}
