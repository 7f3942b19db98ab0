use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    error::{Result, WeatherError},
    model::{CurrentObservation, ForecastQuery, ForecastSeries, Units, WeatherQuery},
    normalize::{RawCurrent, RawForecast, normalize_current, normalize_forecast},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at another host, e.g. a mock server in tests.
    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self { api_key, base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
        units: Units,
    ) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%url, city, %units, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("units", units.as_str()), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(endpoint, city, status = status.as_u16(), %message, "OpenWeather request failed");
            return Err(WeatherError::Api { status: status.as_u16(), message });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

/// Provider's own `message`, or a generic one when the body has none.
fn error_message(body: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "Unknown error".to_string())
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &WeatherQuery) -> Result<CurrentObservation> {
        let raw: RawCurrent = self.get_json("weather", &query.city, query.units).await?;
        normalize_current(raw, &query.city)
    }

    async fn forecast(&self, query: &ForecastQuery) -> Result<ForecastSeries> {
        let raw: RawForecast = self.get_json("forecast", &query.city, query.units).await?;
        Ok(normalize_forecast(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_reads_provider_message() {
        assert_eq!(error_message(r#"{"cod":"404","message":"city not found"}"#), "city not found");
    }

    #[test]
    fn error_message_falls_back_for_non_json() {
        assert_eq!(error_message("<html>bad gateway</html>"), "Unknown error");
        assert_eq!(error_message(r#"{"cod":500}"#), "Unknown error");
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let provider =
            OpenWeatherProvider::with_base_url("KEY".into(), "http://localhost:9000/").expect("client");
        assert_eq!(provider.base_url, "http://localhost:9000");
    }
}
