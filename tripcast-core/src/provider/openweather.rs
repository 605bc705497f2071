use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::instrument;

use crate::{error::WeatherFetchError, model::LocationQuery};

use super::{OneCallPayload, WeatherProvider};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const ONECALL_PATH: &str = "/data/3.0/onecall";
const GEOCODE_PATH: &str = "/geo/1.0/direct";

/// OpenWeather One Call 3.0 client, metric units.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Resolve a place name to coordinates using the direct geocoding API.
    #[instrument(skip(self), level = "debug")]
    pub async fn geocode(&self, name: &str) -> Result<(f64, f64), WeatherFetchError> {
        let hits: Vec<OwGeoHit> = self
            .get_json(
                GEOCODE_PATH,
                &[("q", name.to_string()), ("limit", "1".to_string())],
            )
            .await?;

        let hit = hits
            .first()
            .ok_or_else(|| WeatherFetchError::LocationNotFound(name.to_string()))?;

        tracing::debug!(name, resolved = %hit.name, lat = hit.lat, lon = hit.lon, "geocoded");
        Ok((hit.lat, hit.lon))
    }

    async fn fetch_onecall(&self, lat: f64, lon: f64) -> Result<OneCallPayload, WeatherFetchError> {
        self.get_json(
            ONECALL_PATH,
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", "metric".to_string()),
                ("exclude", "alerts".to_string()),
            ],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, WeatherFetchError> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, path, "provider returned an error status");
            return Err(WeatherFetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoHit {
    name: String,
    lat: f64,
    lon: f64,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, location), fields(location = %location), level = "debug")]
    async fn fetch_forecast(
        &self,
        location: &LocationQuery,
    ) -> Result<OneCallPayload, WeatherFetchError> {
        let (lat, lon) = match location {
            LocationQuery::Coordinates { lat, lon } => (*lat, *lon),
            LocationQuery::Name(name) => self.geocode(name).await?,
        };
        self.fetch_onecall(lat, lon).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
