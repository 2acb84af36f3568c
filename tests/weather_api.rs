//! Weather and geolocation client tests against a mock HTTP server
//!
//! The in-crate unit tests cover response mapping; these exercise the
//! whole lookup over a real socket, including malformed payloads and a
//! geolocation service that answers too slowly.

use internet_speed_monitor::{models::Config, weather::WeatherService};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEO_BODY: &str = r#"{
    "status": "success",
    "countryCode": "NL",
    "city": "Amsterdam",
    "lat": 52.37,
    "lon": 4.89
}"#;

const WEATHER_BODY: &str = r#"{
    "weather": [{"description": "light rain"}],
    "main": {"temp": 14.2, "humidity": 87},
    "wind": {"speed": 7.1},
    "name": "Amsterdam"
}"#;

fn service(server_uri: &str) -> WeatherService {
    let mut config = Config::default();
    config.weather_enabled = true;
    config.weather_api_key = Some("integration-key".to_string());

    WeatherService::new(&config).unwrap().with_base_urls(
        format!("{}/json", server_uri),
        format!("{}/data/2.5/weather", server_uri),
    )
}

#[tokio::test]
async fn test_lookup_passes_coordinates_and_key_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GEO_BODY))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "52.37"))
        .and(query_param("lon", "4.89"))
        .and(query_param("appid", "integration-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WEATHER_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = service(&server.uri()).fetch().await.unwrap();
    assert_eq!(snapshot.city, "Amsterdam");
    assert_eq!(snapshot.country, "NL");
    assert_eq!(snapshot.temperature_c, 14.2);
    assert_eq!(snapshot.humidity_pct, 87);
    assert_eq!(snapshot.description, "light rain");
}

#[tokio::test]
async fn test_malformed_geolocation_json_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    assert!(service(&server.uri()).fetch().await.is_none());
}

#[tokio::test]
async fn test_malformed_weather_json_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GEO_BODY))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"weather": "wrong shape"}"#))
        .mount(&server)
        .await;

    assert!(service(&server.uri()).fetch().await.is_none());
}

#[tokio::test]
async fn test_geolocation_http_error_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(service(&server.uri()).fetch().await.is_none());
}

#[tokio::test]
async fn test_slow_geolocation_times_out_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(GEO_BODY)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let started = Instant::now();
    let snapshot = service(&server.uri()).fetch().await;
    assert!(snapshot.is_none());

    // The 3-second geolocation timeout must cut the wait short
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_unreachable_service_yields_none() {
    // Port 9 (discard) refuses connections immediately
    assert!(service("http://127.0.0.1:9").fetch().await.is_none());
}
