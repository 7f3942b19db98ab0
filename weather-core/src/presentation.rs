//! Display-ready views over forecast buckets and current observations.
//!
//! Condition → gradient and condition → animation are fixed lookup tables.
//! Rounding to whole degrees happens here and nowhere else.

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fmt::Display;

use crate::{
    forecast::DayBucket,
    model::{ConditionKind, CurrentObservation, LocationSunState, Units, WeatherSample},
    temporal::{DayProgress, day_progress, is_day},
};

/// Rows shown in the hourly table (one day of 3-hour samples).
pub const HOURLY_ROWS: usize = 8;

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
const MISSING_TIME: &str = "--:--";

/// Background gradient stops, as palette tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Gradient {
    pub from: &'static str,
    pub to: &'static str,
}

const DEFAULT_GRADIENT: Gradient = Gradient { from: "blue-500", to: "indigo-500" };

pub fn gradient_for(kind: ConditionKind) -> Gradient {
    let (from, to) = match kind {
        ConditionKind::Clear => ("blue-400", "cyan-300"),
        ConditionKind::Clouds => ("blue-300", "gray-300"),
        ConditionKind::Rain | ConditionKind::Squall => ("blue-600", "gray-500"),
        ConditionKind::Drizzle => ("blue-500", "gray-400"),
        ConditionKind::Thunderstorm => ("indigo-900", "gray-700"),
        ConditionKind::Snow => ("blue-100", "gray-200"),
        ConditionKind::Mist | ConditionKind::Fog => ("gray-300", "gray-400"),
        ConditionKind::Smoke | ConditionKind::Ash => ("gray-500", "gray-600"),
        ConditionKind::Haze => ("yellow-200", "gray-300"),
        ConditionKind::Dust => ("yellow-300", "gray-400"),
        ConditionKind::Sand => ("yellow-400", "gray-400"),
        ConditionKind::Tornado => ("red-700", "gray-700"),
        ConditionKind::Unknown => return DEFAULT_GRADIENT,
    };
    Gradient { from, to }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Animation {
    Sun,
    Stars,
    DriftingClouds,
    Rain,
    Drizzle,
    Lightning,
    Snowfall,
    Haze,
    Gusts,
    Funnel,
    None,
}

impl Animation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Animation::Sun => "sun",
            Animation::Stars => "stars",
            Animation::DriftingClouds => "drifting_clouds",
            Animation::Rain => "rain",
            Animation::Drizzle => "drizzle",
            Animation::Lightning => "lightning",
            Animation::Snowfall => "snowfall",
            Animation::Haze => "haze",
            Animation::Gusts => "gusts",
            Animation::Funnel => "funnel",
            Animation::None => "none",
        }
    }
}

pub fn animation_for(kind: ConditionKind, daytime: bool) -> Animation {
    match kind {
        ConditionKind::Clear if daytime => Animation::Sun,
        ConditionKind::Clear => Animation::Stars,
        ConditionKind::Clouds => Animation::DriftingClouds,
        ConditionKind::Rain => Animation::Rain,
        ConditionKind::Drizzle => Animation::Drizzle,
        ConditionKind::Thunderstorm => Animation::Lightning,
        ConditionKind::Snow => Animation::Snowfall,
        ConditionKind::Mist
        | ConditionKind::Fog
        | ConditionKind::Haze
        | ConditionKind::Smoke
        | ConditionKind::Ash => Animation::Haze,
        ConditionKind::Dust | ConditionKind::Sand | ConditionKind::Squall => Animation::Gusts,
        ConditionKind::Tornado => Animation::Funnel,
        ConditionKind::Unknown => Animation::None,
    }
}

pub fn icon_url(icon: &str, scale: u8) -> String {
    let icon = if icon.is_empty() { "01d" } else { icon };
    if scale <= 1 {
        format!("{ICON_BASE_URL}/{icon}.png")
    } else {
        format!("{ICON_BASE_URL}/{icon}@{scale}x.png")
    }
}

/// Whole degrees, halves rounded up (so `-2.5` shows as `-2`).
pub fn whole_degrees(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn time_label<Tz>(timestamp: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(tz).format("%H:%M").to_string())
        .unwrap_or_else(|| MISSING_TIME.to_string())
}

/// Like [`time_label`], but `0` is the provider's "absent" marker for sun events.
fn sun_time_label<Tz>(timestamp: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if timestamp == 0 {
        return MISSING_TIME.to_string();
    }
    time_label(timestamp, tz)
}

/// Summary card for one forecast day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCard {
    /// e.g. "Mon, Jan 5".
    pub label: String,
    pub description: String,
    pub icon_url: String,
    pub high: i64,
    pub low: i64,
    pub progress: DayProgress,
    pub gradient: Gradient,
    pub animation: Animation,
}

impl DayCard {
    /// Builds the card from the bucket's representative sample. `sun` is the
    /// location's sun state for any one day; it is shifted onto the sample's day.
    pub fn from_bucket(bucket: &DayBucket, sun: LocationSunState) -> Self {
        let sample = bucket.representative();
        let condition = &sample.condition;
        let daytime = is_day(Some(condition.icon.as_str()));

        Self {
            label: bucket.date().format("%a, %b %-d").to_string(),
            description: capitalize(&condition.description),
            icon_url: icon_url(&condition.icon, 2),
            high: whole_degrees(sample.temp_max),
            low: whole_degrees(sample.temp_min),
            progress: day_progress(sample.timestamp, sun.aligned_to(sample.timestamp)),
            gradient: gradient_for(condition.kind),
            animation: animation_for(condition.kind, daytime),
        }
    }
}

/// One line of the hourly table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyRow {
    pub time: String,
    pub condition: &'static str,
    pub icon_url: String,
    pub temperature: i64,
    pub wind: i64,
    pub humidity: u8,
}

impl HourlyRow {
    pub fn new<Tz>(sample: &WeatherSample, units: Units, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            time: time_label(sample.timestamp, tz),
            condition: sample.condition.kind.as_str(),
            icon_url: icon_url(&sample.condition.icon, 1),
            temperature: whole_degrees(sample.temperature),
            wind: whole_degrees(units.display_wind_speed(sample.wind_speed)),
            humidity: sample.humidity,
        }
    }
}

/// The first [`HOURLY_ROWS`] samples of a series.
pub fn hourly_rows<Tz>(samples: &[WeatherSample], units: Units, tz: &Tz) -> Vec<HourlyRow>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    samples.iter().take(HOURLY_ROWS).map(|s| HourlyRow::new(s, units, tz)).collect()
}

/// Headline view of the current observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentCard {
    pub location: String,
    pub description: String,
    pub icon_url: String,
    pub temperature: i64,
    pub feels_like: i64,
    pub high: i64,
    pub low: i64,
    pub humidity: u8,
    pub pressure: i64,
    pub wind: i64,
    pub wind_direction: i64,
    pub sunrise: String,
    pub sunset: String,
    pub progress: DayProgress,
    pub gradient: Gradient,
    pub animation: Animation,
}

impl CurrentCard {
    pub fn new<Tz>(current: &CurrentObservation, units: Units, now: i64, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let sample = &current.sample;
        let sun = current.location.sun;
        let daytime = is_day(Some(sample.condition.icon.as_str()));

        Self {
            location: current.location.display_name(),
            description: capitalize(&sample.condition.description),
            icon_url: icon_url(&sample.condition.icon, 4),
            temperature: whole_degrees(sample.temperature),
            feels_like: whole_degrees(sample.feels_like),
            high: whole_degrees(sample.temp_max),
            low: whole_degrees(sample.temp_min),
            humidity: sample.humidity,
            pressure: whole_degrees(sample.pressure),
            wind: whole_degrees(units.display_wind_speed(sample.wind_speed)),
            wind_direction: whole_degrees(sample.wind_direction),
            sunrise: sun_time_label(sun.sunrise, tz),
            sunset: sun_time_label(sun.sunset, tz),
            progress: day_progress(now, sun),
            gradient: gradient_for(sample.condition.kind),
            animation: animation_for(sample.condition.kind, daytime),
        }
    }
}
