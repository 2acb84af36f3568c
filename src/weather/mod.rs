//! Local weather conditions
//!
//! Geolocates the public IP, then asks OpenWeatherMap for current
//! conditions at those coordinates. Both lookups are best-effort: a
//! missing API key or any failure along the way just means the report
//! carries no weather.

use crate::{
    error::{AppError, Result},
    log_debug, log_info, log_warn,
    logging::Logger,
    models::{Config, WeatherSnapshot},
};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

/// Where the public IP geolocated to.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub city: String,
    pub country_code: String,
    pub lat: f64,
    pub lon: f64,
}

/// ip-api.com response envelope
#[derive(Debug, Deserialize)]
struct GeoResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(rename = "countryCode", default)]
    country_code: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// OpenWeatherMap current-weather response, reduced to what we keep
#[derive(Debug, Deserialize)]
struct WeatherResponse {
    #[serde(default)]
    weather: Vec<WeatherCondition>,
    main: WeatherMain,
    #[serde(default)]
    wind: WeatherWind,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize, Default)]
struct WeatherWind {
    #[serde(default)]
    speed: f64,
}

/// Fetches a weather snapshot for wherever the connection appears to be.
pub struct WeatherService {
    client: Client,
    geo_url: String,
    weather_url: String,
    api_key: Option<String>,
    logger: Logger,
}

impl WeatherService {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(crate::defaults::WEATHER_TIMEOUT)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| AppError::weather(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            geo_url: crate::defaults::GEO_API_URL.to_string(),
            weather_url: crate::defaults::WEATHER_API_URL.to_string(),
            api_key: config.weather_api_key.clone(),
            logger: Logger::with_config("weather".to_string(), config),
        })
    }

    /// Point both lookups at different endpoints.
    pub fn with_base_urls(mut self, geo_url: String, weather_url: String) -> Self {
        self.geo_url = geo_url;
        self.weather_url = weather_url;
        self
    }

    /// Fetch current conditions. Never fails the cycle: without an API
    /// key the lookup is skipped, and any error is logged and swallowed.
    pub async fn fetch(&self) -> Option<WeatherSnapshot> {
        let api_key = match &self.api_key {
            Some(key) => key.clone(),
            None => {
                log_info!(
                    self.logger,
                    "Weather lookup enabled but WEATHER_API_KEY is not set; skipping"
                );
                return None;
            }
        };

        let location = match self.locate().await {
            Ok(location) => location,
            Err(e) => {
                log_warn!(self.logger, "Geolocation failed: {}", e);
                return None;
            }
        };
        log_debug!(
            self.logger,
            "Geolocated to {} ({}, {})",
            location.city,
            location.lat,
            location.lon
        );

        match self.current_weather(&location, &api_key).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log_warn!(self.logger, "Weather lookup failed: {}", e);
                None
            }
        }
    }

    /// Ask ip-api.com where this connection is.
    async fn locate(&self) -> Result<GeoLocation> {
        let response = self
            .client
            .get(&self.geo_url)
            .timeout(crate::defaults::GEO_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::weather(format!("Geolocation request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::weather(format!(
                "Geolocation service returned HTTP {}",
                response.status()
            )));
        }

        let geo: GeoResponse = response
            .json()
            .await
            .map_err(|e| AppError::weather(format!("Invalid geolocation response: {}", e)))?;

        geo_location_from(geo)
    }

    /// Ask OpenWeatherMap for current conditions at the coordinates.
    async fn current_weather(&self, location: &GeoLocation, api_key: &str) -> Result<WeatherSnapshot> {
        let response = self
            .client
            .get(&self.weather_url)
            .query(&[
                ("lat", location.lat.to_string()),
                ("lon", location.lon.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::weather(format!("Weather request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::weather(format!(
                "Weather service returned HTTP {}",
                response.status()
            )));
        }

        let weather: WeatherResponse = response
            .json()
            .await
            .map_err(|e| AppError::weather(format!("Invalid weather response: {}", e)))?;

        Ok(snapshot_from(weather, location))
    }
}

/// Validate a geolocation response into usable coordinates.
fn geo_location_from(geo: GeoResponse) -> Result<GeoLocation> {
    if geo.status != "success" {
        return Err(AppError::weather(format!(
            "Geolocation lookup failed: {}",
            geo.message.as_deref().unwrap_or("unknown reason")
        )));
    }

    match (geo.lat, geo.lon) {
        (Some(lat), Some(lon)) => Ok(GeoLocation {
            city: geo.city.unwrap_or_else(|| "unknown".to_string()),
            country_code: geo.country_code.unwrap_or_else(|| "??".to_string()),
            lat,
            lon,
        }),
        _ => Err(AppError::weather(
            "Geolocation response is missing coordinates",
        )),
    }
}

/// Assemble the snapshot, preferring the weather service's station name.
fn snapshot_from(weather: WeatherResponse, location: &GeoLocation) -> WeatherSnapshot {
    let city = weather
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| location.city.clone());

    let description = weather
        .weather
        .first()
        .map(|condition| condition.description.clone())
        .unwrap_or_else(|| "unknown".to_string());

    WeatherSnapshot {
        city,
        country: location.country_code.clone(),
        temperature_c: weather.main.temp,
        description,
        humidity_pct: weather.main.humidity.clamp(0.0, 100.0) as u8,
        wind_speed_ms: weather.wind.speed,
        fetched_at: Utc::now(),
    }
}
