//! Grouping of a flat forecast series into calendar-day buckets.

use chrono::{DateTime, NaiveDate, TimeZone};
use std::collections::HashMap;
use tracing::warn;

use crate::model::WeatherSample;

/// Samples sharing one local calendar date, in input order.
///
/// Only produced by [`group_by_day`], so a bucket always holds at least one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    date: NaiveDate,
    samples: Vec<WeatherSample>,
}

impl DayBucket {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn samples(&self) -> &[WeatherSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The middle sample of the day, standing in for "midday".
    ///
    /// This is the element at `len / 2`, not the sample closest to local noon.
    // TODO: pick the sample nearest local noon once callers no longer rely on middle-index selection.
    pub fn representative(&self) -> &WeatherSample {
        &self.samples[self.samples.len() / 2]
    }
}

/// Local calendar date of a UTC timestamp in `tz`, or `None` when the
/// timestamp is outside the representable range.
pub fn local_date<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(tz).date_naive())
}

/// Buckets `samples` by their local date in `tz`.
///
/// Buckets come out in order of first appearance and keep input order inside
/// each bucket. Unsorted input is tolerated: a date seen again later is
/// appended to its existing bucket. An empty input yields no buckets.
pub fn group_by_day<Tz: TimeZone>(samples: &[WeatherSample], tz: &Tz) -> Vec<DayBucket> {
    let mut buckets: Vec<DayBucket> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for sample in samples {
        let Some(date) = local_date(sample.timestamp, tz) else {
            warn!(timestamp = sample.timestamp, "skipping sample with unrepresentable timestamp");
            continue;
        };

        match index.get(&date) {
            Some(&slot) => buckets[slot].samples.push(sample.clone()),
            None => {
                index.insert(date, buckets.len());
                buckets.push(DayBucket { date, samples: vec![sample.clone()] });
            }
        }
    }

    buckets
}

/// [`group_by_day`] truncated to the first `max_days` buckets.
pub fn group_by_day_limited<Tz: TimeZone>(
    samples: &[WeatherSample],
    tz: &Tz,
    max_days: usize,
) -> Vec<DayBucket> {
    let mut buckets = group_by_day(samples, tz);
    buckets.truncate(max_days);
    buckets
}
