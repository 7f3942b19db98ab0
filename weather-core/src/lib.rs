//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - The validated weather model and the normalization of raw OpenWeather JSON
//! - Grouping of 3-hour forecast samples into calendar days
//! - Day/night progress from sunrise and sunset
//! - The OpenWeather client, a forecast cache and configuration
//! - Lookup tables and view models for rendering
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod normalize;
pub mod presentation;
pub mod provider;
pub mod temporal;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::ForecastCache;
pub use config::Config;
pub use error::{SampleError, WeatherError};
pub use forecast::{DayBucket, group_by_day, group_by_day_limited};
pub use model::{
    Condition, ConditionKind, CurrentObservation, ForecastQuery, ForecastSeries, Location,
    LocationSunState, Units, WeatherQuery, WeatherSample,
};
pub use provider::{CachingProvider, WeatherProvider, provider_from_config};
pub use temporal::{DayProgress, day_progress, is_day};
