//! Day/night classification and solar-cycle progress.

use serde::Serialize;

use crate::model::LocationSunState;

const SECONDS_PER_DAY: i64 = LocationSunState::SECONDS_PER_DAY;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayProgress {
    pub is_daytime: bool,
    /// Position within the current day or night, `0.0..=100.0`.
    pub progress_percent: f64,
}

impl DayProgress {
    const FALLBACK: DayProgress = DayProgress { is_daytime: true, progress_percent: 0.0 };
}

/// Where `current` sits between sunrise and sunset, or between sunset and the
/// following sunrise.
///
/// Absent sun data (both zero) is treated as the start of a day. Zero-length
/// spans report `0` progress instead of dividing by zero.
pub fn day_progress(current: i64, sun: LocationSunState) -> DayProgress {
    if sun.is_absent() {
        return DayProgress::FALLBACK;
    }

    let LocationSunState { sunrise, sunset } = sun;

    if sunrise <= current && current < sunset {
        return DayProgress {
            is_daytime: true,
            progress_percent: percent(current.saturating_sub(sunrise), sunset.saturating_sub(sunrise)),
        };
    }

    let night_length = sunrise.saturating_add(SECONDS_PER_DAY).saturating_sub(sunset);
    let elapsed = if current < sunrise {
        current.saturating_add(SECONDS_PER_DAY).saturating_sub(sunset)
    } else {
        current.saturating_sub(sunset)
    };

    DayProgress { is_daytime: false, progress_percent: percent(elapsed, night_length) }
}

fn percent(elapsed: i64, span: i64) -> f64 {
    if span <= 0 {
        return 0.0;
    }
    (elapsed as f64 / span as f64 * 100.0).clamp(0.0, 100.0)
}

/// `true` unless the icon code ends in something other than `d`.
///
/// Missing or empty codes count as day.
pub fn is_day(icon: Option<&str>) -> bool {
    match icon {
        None | Some("") => true,
        Some(code) => code.ends_with('d'),
    }
}
