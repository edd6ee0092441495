use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use inquire::{Password, PasswordDisplayMode, Select};
use tracing::debug;
use weather_core::{CityWeatherRepository, Config, DataState, TemperatureUnit, WeatherRepository};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Log repository and HTTP activity to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred temperature unit.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "London" or "London,GB".
        city: String,
    },

    /// List the most recent lookups.
    History,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => show(&city).await,
            Command::History => history().await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("API key prompt was cancelled")?;
    config.set_api_key(api_key.trim().to_string());

    let units = TemperatureUnit::all().to_vec();
    let starting = units.iter().position(|u| *u == config.unit).unwrap_or(0);
    config.unit = Select::new("Temperature unit:", units)
        .with_starting_cursor(starting)
        .prompt()
        .context("Unit prompt was cancelled")?;

    let path = config.save()?;
    debug!(path = %path.display(), unit = %config.unit, "configuration saved");
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn show(city: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    // Lookups need a key; fail early with the configuration hint.
    config.api_key()?;
    let repository = CityWeatherRepository::from_config(&config)?;
    debug!(?repository, city, "looking up current weather");

    let mut states = repository.fetch_weather_by_city(city);
    while let Some(state) = states.next().await {
        match state {
            DataState::Loading => eprintln!("Fetching weather for {city}..."),
            DataState::Success(weather) => println!("{}", render::weather(&weather, config.unit)),
            DataState::Failure(reason) => return Err(anyhow!(reason)),
        }
    }

    Ok(())
}

async fn history() -> anyhow::Result<()> {
    let config = Config::load()?;
    let repository = CityWeatherRepository::from_config(&config)?;
    debug!(?repository, "reading lookup history");

    let mut states = repository.fetch_weather_history();
    while let Some(state) = states.next().await {
        match state {
            DataState::Loading => eprintln!("Loading recent lookups..."),
            DataState::Success(entries) => println!("{}", render::history(&entries, config.unit)),
            DataState::Failure(reason) => return Err(anyhow!(reason)),
        }
    }

    Ok(())
}
