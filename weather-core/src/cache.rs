//! In-memory forecast cache with a fixed time-to-live.

use parking_lot::Mutex;
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};
use tracing::debug;

use crate::model::{ForecastQuery, ForecastSeries, Units};

/// One hour, the window a forecast is reused for by default.
pub const DEFAULT_FORECAST_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    city: String,
    units: Units,
    days: u8,
}

impl From<&ForecastQuery> for CacheKey {
    fn from(query: &ForecastQuery) -> Self {
        Self { city: query.city.trim().to_lowercase(), units: query.units, days: query.days }
    }
}

#[derive(Debug)]
struct Entry {
    stored_at: Instant,
    series: ForecastSeries,
}

#[derive(Debug)]
pub struct ForecastCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl Default for ForecastCache {
    fn default() -> Self {
        Self::new(DEFAULT_FORECAST_TTL)
    }
}

impl ForecastCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: Mutex::new(HashMap::new()) }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a fresh copy of the cached series, evicting it if it has expired.
    pub fn get(&self, query: &ForecastQuery) -> Option<ForecastSeries> {
        let key = CacheKey::from(query);
        let mut entries = self.entries.lock();

        match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                debug!(city = %key.city, units = %key.units, days = key.days, "forecast cache hit");
                Some(entry.series.clone())
            }
            Some(_) => {
                debug!(city = %key.city, "forecast cache entry expired");
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, query: &ForecastQuery, series: ForecastSeries) {
        let key = CacheKey::from(query);
        self.entries.lock().insert(key, Entry { stored_at: Instant::now(), series });
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
