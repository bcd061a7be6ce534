use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

use crate::{
    error::{FetchError, truncate_body},
    model::{Coordinates, CurrentWeather, DEFAULT_BASE_URL, EndpointConfig},
};

use super::{FetchResult, WeatherProvider};

/// Client for the OpenWeather current-weather endpoint.
#[derive(Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at another server speaking the same API.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    fn endpoint(&self, coordinates: Coordinates) -> EndpointConfig {
        EndpointConfig::new(self.api_key.clone(), coordinates).with_base_url(self.base_url.clone())
    }

    /// One GET, one decode, one result.
    #[instrument(skip(self), fields(base = %self.base_url), level = "debug")]
    pub async fn fetch(&self, coordinates: Coordinates) -> FetchResult {
        let url = self.endpoint(coordinates).request_url()?;

        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "weather request rejected");
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        let reading = CurrentWeather::from_json(&body).inspect_err(|e| {
            tracing::warn!(kind = %e.kind(), error = %e, "weather response did not match schema");
        })?;

        tracing::debug!(name = %reading.name, temp = reading.temp, "weather decoded");
        Ok(reading)
    }
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, coordinates: Coordinates) -> FetchResult {
        self.fetch(coordinates).await
    }
}

/// One-shot fetch for an endpoint description.
///
/// `EndpointConfig::new(api_key, coordinates)` targets the public API.
pub async fn fetch_weather(endpoint: EndpointConfig) -> FetchResult {
    let EndpointConfig { api_key, coordinates, base_url } = endpoint;
    OpenWeatherClient::with_base_url(api_key, base_url).fetch(coordinates).await
}
