use async_trait::async_trait;
use std::fmt::Debug;

use crate::model::{Coordinates, CurrentWeather};
use crate::error::FetchError;

pub mod openweather;

pub use openweather::{OpenWeatherClient, fetch_weather};

/// Outcome of one fetch: a full reading or a typed failure, never both.
pub type FetchResult = Result<CurrentWeather, FetchError>;

/// Anything that can turn coordinates into a current-weather reading.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, coordinates: Coordinates) -> FetchResult;
}
