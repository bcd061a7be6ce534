//! Integration tests for OpenWeatherClient using wiremock.

use std::sync::Arc;

use nowcast_core::{
    Coordinates, CurrentWeather, EndpointConfig, ErrorKind, FeedState, FixedLocation,
    OpenWeatherClient, WeatherFeed, fetch_weather,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SANTA_MONICA_BODY: &str = r#"{"name":"Santa Monica","main":{"temp":294.3,"temp_min":290.1,"temp_max":296.8},"wind":{"speed":3.6,"deg":210},"weather":[{"description":"clear sky","icon":"01d"}]}"#;

fn santa_monica() -> Coordinates {
    Coordinates::new(34.0194704, -118.4912273)
}

fn client_for(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::with_base_url("KEY", format!("{}/data/2.5/weather", server.uri()))
}

#[tokio::test]
async fn test_fetch_santa_monica() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "34.0194704"))
        .and(query_param("lon", "-118.4912273"))
        .and(query_param("appid", "KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SANTA_MONICA_BODY))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reading = client_for(&mock_server).fetch(santa_monica()).await.unwrap();

    assert_eq!(
        reading,
        CurrentWeather {
            name: "Santa Monica".to_string(),
            temp: 294.3,
            temp_min: 290.1,
            temp_max: 296.8,
            wind_speed: 3.6,
            wind_deg: 210,
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
        }
    );
    assert_eq!(
        reading.icon_url().as_deref(),
        Some("https://openweathermap.org/img/wn/01d@2x.png")
    );
}

#[tokio::test]
async fn test_fetch_weather_for_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "34.0194704"))
        .and(query_param("lon", "-118.4912273"))
        .and(query_param("appid", "KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SANTA_MONICA_BODY))
        .expect(1)
        .mount(&mock_server)
        .await;

    let endpoint = EndpointConfig::new("KEY", santa_monica())
        .with_base_url(format!("{}/data/2.5/weather", mock_server.uri()));
    let reading = fetch_weather(endpoint).await.unwrap();

    assert_eq!(reading.name, "Santa Monica");
    assert_eq!(reading.description, "clear sky");
    assert_eq!(reading.icon, "01d");
}

#[tokio::test]
async fn test_fetch_empty_weather_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Santa Monica",
            "main": { "temp": 294.3, "temp_min": 290.1, "temp_max": 296.8 },
            "wind": { "speed": 3.6, "deg": 210 },
            "weather": []
        })))
        .mount(&mock_server)
        .await;

    let reading = client_for(&mock_server).fetch(santa_monica()).await.unwrap();

    assert_eq!(reading.description, "Description not available");
    assert_eq!(reading.icon, "");
    assert!(reading.icon_url().is_none());
}

#[tokio::test]
async fn test_fetch_missing_temp_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Santa Monica",
            "main": { "temp_min": 290.1, "temp_max": 296.8 },
            "wind": { "speed": 3.6, "deg": 210 },
            "weather": []
        })))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).fetch(santa_monica()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeError);
}

#[tokio::test]
async fn test_fetch_weather_entry_without_icon_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Santa Monica",
            "main": { "temp": 294.3, "temp_min": 290.1, "temp_max": 296.8 },
            "wind": { "speed": 3.6, "deg": 210 },
            "weather": [{ "description": "d" }]
        })))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).fetch(santa_monica()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeError);
}

#[tokio::test]
async fn test_fetch_non_json_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).fetch(santa_monica()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeError);
}

#[tokio::test]
async fn test_fetch_unauthorized_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key."
        })))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).fetch(santa_monica()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkError);
    assert!(err.to_string().contains("401"));
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn test_fetch_server_error_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).fetch(santa_monica()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkError);
}

#[tokio::test]
async fn test_fetch_connection_refused_is_network_error() {
    // Not taken from the shared pool, so dropping it closes the port.
    let mock_server = MockServer::builder().start().await;
    let client = client_for(&mock_server);
    drop(mock_server);

    let err = client.fetch(santa_monica()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkError);
}

#[tokio::test]
async fn test_feed_delivers_reading_from_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("lat", "34.0194704"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SANTA_MONICA_BODY))
        .mount(&mock_server)
        .await;

    let feed = Arc::new(WeatherFeed::new(
        Arc::new(client_for(&mock_server)),
        Arc::new(FixedLocation(santa_monica())),
    ));
    let mut rx = feed.subscribe();

    feed.spawn_refresh().await.unwrap();

    rx.changed().await.unwrap();
    match &*rx.borrow() {
        FeedState::Ready { reading, .. } => {
            assert_eq!(reading.name, "Santa Monica");
            assert_eq!(reading.wind_deg, 210);
        }
        other => panic!("unexpected state {other:?}"),
    }
}
