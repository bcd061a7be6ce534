use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::FetchError;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

const ICON_URL_PREFIX: &str = "https://openweathermap.org/img/wn/";
const MISSING_DESCRIPTION: &str = "Description not available";

/// A latitude/longitude pair in decimal degrees.
///
/// Ranges are not checked here; the upstream API rejects bad values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Everything needed to derive one request URL.
#[derive(Clone)]
pub struct EndpointConfig {
    pub api_key: String,
    pub coordinates: Coordinates,
    pub base_url: String,
}

impl EndpointConfig {
    pub fn new(api_key: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            api_key: api_key.into(),
            coordinates,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `<base>?lat=<lat>&lon=<lon>&appid=<key>`, percent-encoded.
    pub fn request_url(&self) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)?;
        url.query_pairs_mut()
            .append_pair("lat", &self.coordinates.latitude.to_string())
            .append_pair("lon", &self.coordinates.longitude.to_string())
            .append_pair("appid", &self.api_key);
        Ok(url)
    }
}

// The key never shows up in logs or panics.
impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("api_key", &"<redacted>")
            .field("coordinates", &self.coordinates)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Normalized current-weather reading.
///
/// Temperatures are kept in whatever unit the upstream sends (Kelvin for
/// OpenWeather without a `units` parameter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub name: String,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub wind_speed: f64,
    pub wind_deg: i64,
    pub description: String,
    pub icon: String,
}

impl CurrentWeather {
    /// Decode an OpenWeather `/weather` response body.
    ///
    /// Missing or mistyped required fields fail; an empty or absent
    /// `weather` array does not.
    pub fn from_json(body: &str) -> Result<Self, FetchError> {
        let parsed: OwCurrentResponse = serde_json::from_str(body)?;
        Ok(parsed.into())
    }

    pub fn icon_url(&self) -> Option<String> {
        if self.icon.is_empty() {
            None
        } else {
            Some(format!("{ICON_URL_PREFIX}{}@2x.png", self.icon))
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: i64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    wind: OwWind,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

impl From<OwCurrentResponse> for CurrentWeather {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (description, icon) = match parsed.weather.into_iter().next() {
            Some(w) => (w.description, w.icon),
            None => (MISSING_DESCRIPTION.to_string(), String::new()),
        };

        Self {
            name: parsed.name,
            temp: parsed.main.temp,
            temp_min: parsed.main.temp_min,
            temp_max: parsed.main.temp_max,
            wind_speed: parsed.wind.speed,
            wind_deg: parsed.wind.deg,
            description,
            icon,
        }
    }
}
