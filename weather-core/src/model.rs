use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::error::{Result, WeatherError};

/// Days in a forecast when the caller does not ask for a specific span.
pub const DEFAULT_FORECAST_DAYS: u8 = 5;

/// Largest day span a forecast query may request.
pub const MAX_FORECAST_DAYS: u8 = 7;

/// Unit system requested from the provider. A series never mixes units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Kelvin, meters/second.
    Standard,
    /// Celsius, meters/second.
    #[default]
    Metric,
    /// Fahrenheit, miles/hour.
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Standard => "standard",
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Standard, Units::Metric, Units::Imperial]
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Standard => "K",
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_symbol(&self) -> &'static str {
        match self {
            Units::Standard | Units::Metric => "km/h",
            Units::Imperial => "mph",
        }
    }

    /// Converts a provider wind speed into the unit named by [`Units::wind_symbol`].
    pub fn display_wind_speed(&self, speed: f64) -> f64 {
        match self {
            Units::Standard | Units::Metric => speed * 3.6,
            Units::Imperial => speed,
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "standard" => Ok(Units::Standard),
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: standard, metric, imperial."
            )),
        }
    }
}

/// Weather category vocabulary used by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Smoke,
    Haze,
    Dust,
    Fog,
    Sand,
    Ash,
    Squall,
    Tornado,
    /// A category outside the known vocabulary.
    Unknown,
}

impl ConditionKind {
    pub fn from_category(category: &str) -> Self {
        match category {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Rain" => Self::Rain,
            "Drizzle" => Self::Drizzle,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Mist" => Self::Mist,
            "Smoke" => Self::Smoke,
            "Haze" => Self::Haze,
            "Dust" => Self::Dust,
            "Fog" => Self::Fog,
            "Sand" => Self::Sand,
            "Ash" => Self::Ash,
            "Squall" => Self::Squall,
            "Tornado" => Self::Tornado,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Rain => "Rain",
            Self::Drizzle => "Drizzle",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Mist => "Mist",
            Self::Smoke => "Smoke",
            Self::Haze => "Haze",
            Self::Dust => "Dust",
            Self::Fog => "Fog",
            Self::Sand => "Sand",
            Self::Ash => "Ash",
            Self::Squall => "Squall",
            Self::Tornado => "Tornado",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub kind: ConditionKind,
    pub description: String,
    /// Provider icon code, e.g. "10d". The trailing `d`/`n` marks day or night.
    pub icon: String,
}

/// One validated point-in-time observation or prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Seconds since the Unix epoch, UTC.
    pub timestamp: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    /// hPa.
    pub pressure: f64,
    /// Provider unit: m/s for metric and standard, mph for imperial.
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub condition: Condition,
}

/// Sunrise and sunset for one calendar day at one location. `0` means absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocationSunState {
    pub sunrise: i64,
    pub sunset: i64,
}

impl LocationSunState {
    pub const SECONDS_PER_DAY: i64 = 86_400;

    pub fn new(sunrise: i64, sunset: i64) -> Self {
        Self { sunrise, sunset }
    }

    pub fn is_absent(&self) -> bool {
        self.sunrise == 0 && self.sunset == 0
    }

    /// Shifts both events by whole days so that `sunrise <= current < sunrise + 1 day`.
    ///
    /// Lets one day's sun times stand in for the neighbouring days of a
    /// multi-day forecast. Absent state is returned unchanged.
    pub fn aligned_to(&self, current: i64) -> Self {
        if self.is_absent() {
            return *self;
        }
        let shift = current
            .saturating_sub(self.sunrise)
            .div_euclid(Self::SECONDS_PER_DAY)
            .saturating_mul(Self::SECONDS_PER_DAY);
        Self {
            sunrise: self.sunrise.saturating_add(shift),
            sunset: self.sunset.saturating_add(shift),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    /// Provider-reported shift from UTC in seconds.
    pub utc_offset_secs: Option<i32>,
    pub sun: LocationSunState,
}

impl Location {
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        self.utc_offset_secs.and_then(FixedOffset::east_opt)
    }

    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// Ordered samples from a single provider call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub location: Location,
    pub samples: Vec<WeatherSample>,
}

/// The "now" snapshot, kept apart from the forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentObservation {
    pub location: Location,
    pub sample: WeatherSample,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
    pub units: Units,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>, units: Units) -> Result<Self> {
        let city = validate_city(city.into())?;
        Ok(Self { city, units })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastQuery {
    pub city: String,
    pub units: Units,
    pub days: u8,
}

impl ForecastQuery {
    pub fn new(city: impl Into<String>, units: Units, days: Option<u8>) -> Result<Self> {
        let city = validate_city(city.into())?;
        let days = days.unwrap_or(DEFAULT_FORECAST_DAYS);
        if !(1..=MAX_FORECAST_DAYS).contains(&days) {
            return Err(WeatherError::InvalidQuery(format!(
                "days must be between 1 and {MAX_FORECAST_DAYS}, got {days}"
            )));
        }
        Ok(Self { city, units, days })
    }
}

fn validate_city(city: String) -> Result<String> {
    let trimmed = city.trim();
    if trimmed.is_empty() {
        return Err(WeatherError::InvalidQuery("city must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}
