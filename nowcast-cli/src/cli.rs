use std::{sync::Arc, time::Duration};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode};
use nowcast_core::{Config, Coordinates, FixedLocation, WeatherFeed};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "nowcast", version, about = "Current weather from OpenWeather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and an optional default location.
    Configure,

    /// Show the current weather once.
    Show {
        #[command(flatten)]
        location: LocationArgs,

        /// Print the reading as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Keep refreshing the current weather until interrupted.
    Watch {
        #[command(flatten)]
        location: LocationArgs,

        /// Seconds between refreshes.
        #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,
    },
}

/// Coordinates given on the command line; both or neither.
#[derive(Debug, Clone, Copy, Args)]
pub struct LocationArgs {
    /// Latitude in decimal degrees.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl LocationArgs {
    /// Command-line coordinates, else the configured default.
    pub fn resolve(&self, config: &Config) -> Coordinates {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
            _ => config.default_location(),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Show { location, json } => show(&config, location.resolve(&config), json).await,
            Command::Watch { location, interval } => {
                watch(&config, location.resolve(&config), Duration::from_secs(interval)).await
            }
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("API key prompt aborted")?;
    config.set_api_key(api_key.trim().to_string());

    let set_location = Confirm::new("Set a default location?")
        .with_default(config.location.is_some())
        .prompt()?;

    if set_location {
        let current = config.default_location();
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_default(current.latitude)
            .with_error_message("Please enter a decimal number")
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_default(current.longitude)
            .with_error_message("Please enter a decimal number")
            .prompt()?;
        config.location = Some(Coordinates::new(latitude, longitude));
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(config: &Config, coordinates: Coordinates, json: bool) -> anyhow::Result<()> {
    let client = config.client()?;
    let feed = WeatherFeed::new(Arc::new(client), Arc::new(FixedLocation(coordinates)));
    eprintln!("Loading weather for {coordinates}...");

    let result = feed.refresh().await;
    match render::show(&result, json)? {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(text) => {
            eprintln!("{text}");
            result.map(|_| ()).map_err(anyhow::Error::new)
        }
    }
}

async fn watch(config: &Config, coordinates: Coordinates, every: Duration) -> anyhow::Result<()> {
    let client = config.client()?;
    let feed = Arc::new(WeatherFeed::new(Arc::new(client), Arc::new(FixedLocation(coordinates))));
    let mut rx = feed.subscribe();
    let mut ticker = tokio::time::interval(every);

    tracing::info!(%coordinates, interval_secs = every.as_secs(), "watching weather");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                feed.spawn_refresh();
            }
            changed = rx.changed() => {
                changed?;
                if let Some(text) = render::state(&rx.borrow_and_update()) {
                    println!("{text}\n");
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
