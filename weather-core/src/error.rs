use thiserror::Error;

/// Failures surfaced by the provider client and the caching layer.
///
/// Data-quality problems inside a payload are not errors: invalid samples are
/// skipped during normalization and grouping continues with the rest.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The provider answered with a non-success status.
    #[error("OpenWeather request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to reach OpenWeather: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse OpenWeather response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error(
        "No OpenWeather API key configured.\n\
         Hint: run `weather configure` or set OPENWEATHER_API_KEY."
    )]
    MissingApiKey,

    /// The provider answered successfully but nothing usable was in the payload.
    #[error("No usable weather data returned for '{0}'")]
    NoData(String),
}

impl WeatherError {
    /// HTTP-like status for callers that relay failures (status + message).
    pub fn status(&self) -> u16 {
        match self {
            WeatherError::Api { status, .. } => *status,
            WeatherError::InvalidQuery(_) => 422,
            WeatherError::NoData(_) => 404,
            WeatherError::Network(_) | WeatherError::Parse(_) | WeatherError::MissingApiKey => 500,
        }
    }
}

/// Reason a raw provider sample was rejected by normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// The entry could not be read at all, e.g. a field of the wrong JSON type.
    #[error("malformed sample: {0}")]
    Malformed(String),
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_keeps_provider_status() {
        let err = WeatherError::Api { status: 404, message: "city not found".into() };
        assert_eq!(err.status(), 404);
        assert!(err.to_string().contains("city not found"));
    }

    #[test]
    fn invalid_query_maps_to_unprocessable() {
        assert_eq!(WeatherError::InvalidQuery("empty city".into()).status(), 422);
    }

    #[test]
    fn missing_api_key_carries_hint() {
        let msg = WeatherError::MissingApiKey.to_string();
        assert!(msg.contains("Hint: run `weather configure`"));
    }
}
