use anyhow::Context;
use chrono::{Local, TimeZone, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use inquire::{Password, PasswordDisplayMode, Select};
use std::fmt::Display;
use tracing::warn;
use weather_core::{
    Config, ForecastQuery, ForecastSeries, Units, WeatherProvider, WeatherQuery,
    config::API_KEY_ENV, group_by_day_limited, model::CurrentObservation, provider_from_config,
};

use crate::render::{self, Output};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and 5-day forecasts")]
pub struct Cli {
    /// Log provider requests and cache activity to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the view models as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred units.
    Configure,

    /// Show current conditions for a city.
    Current(CityArgs),

    /// Show the daily and hourly forecast for a city.
    Forecast(ForecastArgs),

    /// Show current conditions and the forecast together.
    Show(ForecastArgs),
}

#[derive(Debug, Args)]
pub struct CityArgs {
    /// City name, e.g. "London" or "London,GB".
    pub city: String,

    /// Unit system; defaults to the configured one.
    #[arg(long, value_parser = parse_units)]
    pub units: Option<Units>,

    /// Time zone used for day boundaries and clock times.
    #[arg(long, value_enum, default_value_t = Zone::Local)]
    pub zone: Zone,
}

#[derive(Debug, Args)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub city: CityArgs,

    /// Number of days to show (1-7); defaults to the configured span.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=7))]
    pub days: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Zone {
    /// This machine's local time zone.
    Local,
    /// The city's own UTC offset as reported by the provider.
    City,
}

fn parse_units(value: &str) -> anyhow::Result<Units> {
    Units::try_from(value)
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        let output = if self.json { Output::Json } else { Output::Text };

        match self.command {
            Command::Configure => configure(config),
            Command::Current(args) => {
                let provider = provider_from_config(&config)?;
                let query = WeatherQuery::new(&args.city, args.units.unwrap_or(config.units))?;
                let current = provider.current(&query).await?;
                print_current(&current, query.units, args.zone, output)
            }
            Command::Forecast(args) => {
                let provider = provider_from_config(&config)?;
                let query = forecast_query(&args, &config)?;
                let series = provider.forecast(&query).await?;
                print_forecast(&series, &query, args.city.zone, output)
            }
            Command::Show(args) => {
                let provider = provider_from_config(&config)?;
                let query = forecast_query(&args, &config)?;
                let current_query = WeatherQuery::new(&query.city, query.units)?;

                let (current, forecast) =
                    tokio::join!(provider.current(&current_query), provider.forecast(&query));

                // Each half is shown on its own; only fail when both did.
                let mut failures = 0;
                match &current {
                    Ok(current) => print_current(current, query.units, args.city.zone, output)?,
                    Err(err) => {
                        failures += 1;
                        warn!(error = %err, "current weather unavailable");
                        eprintln!("Current weather unavailable: {err}");
                    }
                }
                match &forecast {
                    Ok(series) => print_forecast(series, &query, args.city.zone, output)?,
                    Err(err) => {
                        failures += 1;
                        warn!(error = %err, "forecast unavailable");
                        eprintln!("Forecast unavailable: {err}");
                    }
                }

                if failures == 2 {
                    anyhow::bail!("No weather data available for '{}'", query.city);
                }
                Ok(())
            }
        }
    }
}

fn forecast_query(args: &ForecastArgs, config: &Config) -> anyhow::Result<ForecastQuery> {
    let units = args.city.units.unwrap_or(config.units);
    let days = args.days.unwrap_or_else(|| config.forecast_days());
    Ok(ForecastQuery::new(&args.city.city, units, Some(days))?)
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    if std::env::var(API_KEY_ENV).is_ok() {
        println!("Note: {API_KEY_ENV} is set and takes precedence over the stored key.");
    }

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let units = Units::all().to_vec();
    let start = units.iter().position(|u| *u == config.units).unwrap_or(0);
    let units = Select::new("Units:", units)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read units")?;

    config.set_api_key(api_key.trim().to_string());
    config.units = units;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn print_current(
    current: &CurrentObservation,
    units: Units,
    zone: Zone,
    output: Output,
) -> anyhow::Result<()> {
    let now = Utc::now().timestamp();
    match (zone, current.location.utc_offset()) {
        (Zone::City, Some(offset)) => render::current(current, units, now, &offset, output),
        _ => render::current(current, units, now, &Local, output),
    }
}

fn print_forecast(
    series: &ForecastSeries,
    query: &ForecastQuery,
    zone: Zone,
    output: Output,
) -> anyhow::Result<()> {
    match (zone, series.location.utc_offset()) {
        (Zone::City, Some(offset)) => forecast_in(series, query, &offset, output),
        _ => forecast_in(series, query, &Local, output),
    }
}

fn forecast_in<Tz>(
    series: &ForecastSeries,
    query: &ForecastQuery,
    tz: &Tz,
    output: Output,
) -> anyhow::Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let days = group_by_day_limited(&series.samples, tz, usize::from(query.days));
    render::forecast(series, &days, query.units, tz, output)
}
