//! Core library for the `nowcast` CLI.
//!
//! This crate defines:
//! - The current-weather reading and its decoder
//! - The OpenWeather client and the provider abstraction over it
//! - Coordinate sources (fixed or sensor-fed)
//! - A last-write-wins feed that delivers results to a renderer
//! - Configuration & credentials handling
//!
//! It is used by `nowcast-cli`, but can also be reused by other front-ends.

pub mod config;
pub mod error;
pub mod feed;
pub mod location;
pub mod model;
pub mod provider;

pub use config::Config;
pub use error::{ErrorKind, FetchError};
pub use feed::{FeedState, WeatherFeed};
pub use location::{CoordinateSource, FixedLocation, LiveLocation, SANTA_MONICA};
pub use model::{Coordinates, CurrentWeather, EndpointConfig};
pub use provider::{FetchResult, OpenWeatherClient, WeatherProvider, fetch_weather};
