use crate::{
    Config,
    error::WeatherFetchError,
    model::LocationQuery,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod fake;
pub mod openweather;

/// Raw One Call response. Every block except `current` may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneCallPayload {
    /// Seconds east of UTC for the forecast location.
    #[serde(default)]
    pub timezone_offset: i32,
    pub current: RawCurrent,
    #[serde(default)]
    pub hourly: Vec<RawHourly>,
    #[serde(default)]
    pub minutely: Option<Vec<RawMinutely>>,
    #[serde(default)]
    pub daily: Vec<RawDaily>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawWeather {
    pub main: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCurrent {
    #[serde(default)]
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    #[serde(default)]
    pub weather: Vec<RawWeather>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHourly {
    pub dt: i64,
    pub temp: f64,
    #[serde(default)]
    pub pop: Option<f64>,
    #[serde(default)]
    pub weather: Vec<RawWeather>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMinutely {
    pub dt: i64,
    #[serde(default)]
    pub precipitation: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDailyTemp {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDaily {
    pub dt: i64,
    pub temp: RawDailyTemp,
    #[serde(default)]
    pub pop: Option<f64>,
    #[serde(default)]
    pub weather: Vec<RawWeather>,
}

/// First `weather[].main` label, if the provider sent one.
pub(crate) fn main_label(weather: &[RawWeather]) -> Option<&str> {
    weather.first().map(|w| w.main.as_str())
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_forecast(
        &self,
        location: &LocationQuery,
    ) -> Result<OneCallPayload, WeatherFetchError>;
}

#[async_trait]
impl<P: WeatherProvider + ?Sized> WeatherProvider for Box<P> {
    async fn fetch_forecast(
        &self,
        location: &LocationQuery,
    ) -> Result<OneCallPayload, WeatherFetchError> {
        (**self).fetch_forecast(location).await
    }
}

/// Construct the live provider. Fails when no API key is configured.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;
    Ok(Box::new(OpenWeatherProvider::new(api_key.to_owned())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            ..Config::default()
        };
        assert!(provider_from_config(&cfg).is_ok());
    }

    #[test]
    fn payload_tolerates_missing_blocks() {
        let payload: OneCallPayload = serde_json::from_value(serde_json::json!({
            "current": { "temp": 12.4, "feels_like": 10.6 }
        }))
        .expect("current-only payload parses");

        assert!(payload.hourly.is_empty());
        assert!(payload.minutely.is_none());
        assert!(payload.daily.is_empty());
        assert_eq!(main_label(&payload.current.weather), None);
    }

    #[test]
    fn payload_without_current_is_rejected() {
        let res: Result<OneCallPayload, _> =
            serde_json::from_value(serde_json::json!({ "hourly": [] }));
        assert!(res.is_err());
    }
}
