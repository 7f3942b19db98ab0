//! Human-friendly terminal output, or JSON view models with `--json`.

use chrono::TimeZone;
use serde::Serialize;
use std::fmt::Display;
use weather_core::{
    DayBucket, DayProgress, ForecastSeries, Units,
    model::CurrentObservation,
    presentation::{CurrentCard, DayCard, HourlyRow, hourly_rows},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct ForecastView {
    location: String,
    units: Units,
    days: Vec<DayCard>,
    hourly: Vec<HourlyRow>,
}

/// "day 42%" / "night 7%".
pub fn phase(progress: &DayProgress) -> String {
    let label = if progress.is_daytime { "day" } else { "night" };
    format!("{label} {:.0}%", progress.progress_percent)
}

pub fn current<Tz>(
    current: &CurrentObservation,
    units: Units,
    now: i64,
    tz: &Tz,
    output: Output,
) -> anyhow::Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let card = CurrentCard::new(current, units, now, tz);
    if output == Output::Json {
        println!("{}", serde_json::to_string_pretty(&card)?);
        return Ok(());
    }

    let t = units.temperature_symbol();

    println!("{}", card.location);
    println!("  {} [{}]", card.description, card.animation.as_str());
    println!("  {}{t}  (feels like {}{t})", card.temperature, card.feels_like);
    println!("  High {}{t}  Low {}{t}", card.high, card.low);
    println!(
        "  Humidity {}%  Pressure {} hPa  Wind {} {} from {}°",
        card.humidity,
        card.pressure,
        card.wind,
        units.wind_symbol(),
        card.wind_direction
    );
    println!("  Sunrise {}  Sunset {}  ({})", card.sunrise, card.sunset, phase(&card.progress));
    println!();
    Ok(())
}

pub fn forecast<Tz>(
    series: &ForecastSeries,
    days: &[DayBucket],
    units: Units,
    tz: &Tz,
    output: Output,
) -> anyhow::Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let cards: Vec<DayCard> =
        days.iter().map(|bucket| DayCard::from_bucket(bucket, series.location.sun)).collect();
    let rows = hourly_rows(&series.samples, units, tz);

    if output == Output::Json {
        let view = ForecastView {
            location: series.location.display_name(),
            units,
            days: cards,
            hourly: rows,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if cards.is_empty() {
        println!(
            "No forecast data for {}. The provider returned no usable samples; please try again.",
            series.location.display_name()
        );
        return Ok(());
    }

    let t = units.temperature_symbol();

    println!("{}-Day Forecast for {}", cards.len(), series.location.display_name());
    for card in &cards {
        println!(
            "  {:<12} {:>4}{t} / {:>4}{t}  {}  [{}, {}]",
            card.label,
            card.high,
            card.low,
            card.description,
            phase(&card.progress),
            card.animation.as_str()
        );
    }
    println!();

    println!("Hourly Forecast");
    println!("  {:<6} {:<13} {:>6} {:>9} {:>9}", "Time", "Weather", "Temp", "Wind", "Humidity");
    for row in &rows {
        println!(
            "  {:<6} {:<13} {:>4}{t} {:>5} {} {:>8}%",
            row.time,
            row.condition,
            row.temperature,
            row.wind,
            units.wind_symbol(),
            row.humidity
        );
    }
    Ok(())
}
