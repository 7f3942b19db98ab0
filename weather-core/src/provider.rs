use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};
use tracing::debug;

use crate::{
    Config,
    cache::ForecastCache,
    error::{Result, WeatherError},
    model::{CurrentObservation, ForecastQuery, ForecastSeries, WeatherQuery},
    provider::openweather::OpenWeatherProvider,
};

pub mod openweather;

/// Source of already-normalized weather data.
///
/// Failures come back as [`WeatherError`] (status + message), never as a
/// malformed payload.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &WeatherQuery) -> Result<CurrentObservation>;

    async fn forecast(&self, query: &ForecastQuery) -> Result<ForecastSeries>;
}

/// Wraps a provider and memoizes its forecasts. Current weather passes through.
#[derive(Debug)]
pub struct CachingProvider<P> {
    inner: P,
    cache: ForecastCache,
}

impl<P: WeatherProvider> CachingProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self { inner, cache: ForecastCache::new(ttl) }
    }

    pub fn cache(&self) -> &ForecastCache {
        &self.cache
    }
}

#[async_trait]
impl<P: WeatherProvider> WeatherProvider for CachingProvider<P> {
    async fn current(&self, query: &WeatherQuery) -> Result<CurrentObservation> {
        self.inner.current(query).await
    }

    async fn forecast(&self, query: &ForecastQuery) -> Result<ForecastSeries> {
        if let Some(series) = self.cache.get(query) {
            return Ok(series);
        }

        debug!(city = %query.city, "forecast cache miss");
        let series = self.inner.forecast(query).await?;
        self.cache.insert(query, series.clone());
        Ok(series)
    }
}

/// Build the cached OpenWeather provider described by `config`.
pub fn provider_from_config(config: &Config) -> Result<CachingProvider<OpenWeatherProvider>> {
    let api_key = config.api_key().ok_or(WeatherError::MissingApiKey)?;

    let provider = match config.base_url.as_deref() {
        Some(base_url) => OpenWeatherProvider::with_base_url(api_key.to_owned(), base_url)?,
        None => OpenWeatherProvider::new(api_key.to_owned())?,
    };

    Ok(CachingProvider::new(provider, config.cache_ttl()))
}
