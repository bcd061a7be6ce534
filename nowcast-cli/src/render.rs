//! Text output for readings and feed states.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use nowcast_core::{CurrentWeather, FeedState, FetchError};

/// Shown in place of the icon when the upstream sent none.
const NO_ICON: &str = "[no icon]";

pub fn reading(weather: &CurrentWeather, fetched_at: Option<DateTime<Utc>>) -> String {
    let icon = weather.icon_url().unwrap_or_else(|| NO_ICON.to_string());

    let mut out = format!(
        "{}\n{}°\n{}\nLow: {}° High: {}°\nWind: {} m/s ({}°)\nIcon: {}",
        weather.name,
        weather.temp,
        weather.description,
        weather.temp_min,
        weather.temp_max,
        weather.wind_speed,
        weather.wind_deg,
        icon,
    );

    if let Some(at) = fetched_at {
        out.push_str(&format!("\nUpdated: {}", at.with_timezone(&Local).format("%H:%M:%S")));
    }
    out
}

pub const SHOW_RETRY_HINT: &str = "Retry with `nowcast show`.";
pub const WATCH_RETRY_HINT: &str = "Will retry at the next refresh.";

pub fn failure(err: &FetchError, hint: &str) -> String {
    format!("{}\n{hint}", err.user_message())
}

/// Output of `show`: `Ok` goes to stdout, `Err` to stderr.
pub fn show(
    result: &Result<CurrentWeather, Arc<FetchError>>,
    json: bool,
) -> serde_json::Result<Result<String, String>> {
    Ok(match result {
        Ok(weather) if json => Ok(serde_json::to_string_pretty(weather)?),
        Ok(weather) => Ok(reading(weather, None)),
        Err(err) => Err(failure(err, SHOW_RETRY_HINT)),
    })
}

/// One line per state for the watch loop; `None` for states not worth printing.
pub fn state(state: &FeedState) -> Option<String> {
    match state {
        FeedState::Idle => None,
        FeedState::Loading => Some("Loading...".to_string()),
        FeedState::Ready { reading: weather, fetched_at } => Some(reading(weather, Some(*fetched_at))),
        FeedState::Failed(err) => Some(failure(err, WATCH_RETRY_HINT)),
    }
}
