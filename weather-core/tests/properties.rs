use chrono::{FixedOffset, Utc};
use proptest::prelude::*;
use weather_core::{
    Condition, ConditionKind, LocationSunState, WeatherSample, day_progress, group_by_day,
};

fn sample(timestamp: i64) -> WeatherSample {
    WeatherSample {
        timestamp,
        temperature: 10.0,
        feels_like: 9.0,
        temp_min: 8.0,
        temp_max: 12.0,
        humidity: 50,
        pressure: 1015.0,
        wind_speed: 2.0,
        wind_direction: 90.0,
        condition: Condition {
            kind: ConditionKind::Clear,
            description: "clear sky".into(),
            icon: "01d".into(),
        },
    }
}

// 2000-01-01 .. 2100-01-01
const MIN_TS: i64 = 946_684_800;
const MAX_TS: i64 = 4_102_444_800;

proptest! {
    #[test]
    fn grouping_partitions_the_input(
        stamps in prop::collection::vec(MIN_TS..MAX_TS, 0..60),
        offset_hours in -12i32..=14,
    ) {
        let samples: Vec<_> = stamps.iter().copied().map(sample).collect();
        let tz = FixedOffset::east_opt(offset_hours * 3_600).unwrap();
        let buckets = group_by_day(&samples, &tz);

        let total: usize = buckets.iter().map(|b| b.len()).sum();
        prop_assert_eq!(total, samples.len());

        for (i, bucket) in buckets.iter().enumerate() {
            prop_assert!(!bucket.is_empty());
            // Each bucket is the in-order subsequence of its date.
            let expected: Vec<i64> = samples
                .iter()
                .map(|s| s.timestamp)
                .filter(|ts| weather_core::forecast::local_date(*ts, &tz) == Some(bucket.date()))
                .collect();
            let actual: Vec<i64> = bucket.samples().iter().map(|s| s.timestamp).collect();
            prop_assert_eq!(actual, expected);

            for later in &buckets[i + 1..] {
                prop_assert_ne!(later.date(), bucket.date());
            }
            prop_assert_eq!(bucket.representative(), &bucket.samples()[bucket.len() / 2]);
        }
    }

    #[test]
    fn sorted_input_concatenates_back_to_itself(mut stamps in prop::collection::vec(MIN_TS..MAX_TS, 1..60)) {
        stamps.sort_unstable();
        let samples: Vec<_> = stamps.iter().copied().map(sample).collect();

        let flattened: Vec<i64> = group_by_day(&samples, &Utc)
            .iter()
            .flat_map(|b| b.samples().iter().map(|s| s.timestamp))
            .collect();
        prop_assert_eq!(flattened, stamps);
    }

    #[test]
    fn progress_stays_in_bounds(
        current in -200_000i64..400_000,
        sunrise in 1i64..86_400,
        day_length in 0i64..86_400,
    ) {
        let sun = LocationSunState::new(sunrise, sunrise + day_length);
        let p = day_progress(current, sun);

        prop_assert!(p.progress_percent.is_finite());
        prop_assert!((0.0..=100.0).contains(&p.progress_percent));
        prop_assert_eq!(p.is_daytime, sunrise <= current && current < sunrise + day_length);
    }

    #[test]
    fn absent_sun_is_always_day_start(current in any::<i64>()) {
        let p = day_progress(current, LocationSunState::default());
        prop_assert!(p.is_daytime);
        prop_assert_eq!(p.progress_percent, 0.0);
    }
}
