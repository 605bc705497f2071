//! Per-day forecast lookups used by the weekly resolver.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::{Rng, seq::IndexedRandom};

use crate::{
    error::WeatherFetchError,
    model::{EventWeatherForecast, LocationQuery},
    normalize::normalize_daily,
    provider::{WeatherProvider, fake::DEMO_CONDITIONS},
};

#[async_trait]
pub trait DayForecastSource: Send + Sync {
    /// Forecast for `location` on `date`.
    ///
    /// `None` location, places the source cannot find and dates it has
    /// nothing for yield `Ok(None)`.
    async fn forecast_for(
        &self,
        location: Option<&str>,
        date: NaiveDate,
    ) -> Result<Option<EventWeatherForecast>, WeatherFetchError>;
}

#[async_trait]
impl<F: DayForecastSource + ?Sized> DayForecastSource for Arc<F> {
    async fn forecast_for(
        &self,
        location: Option<&str>,
        date: NaiveDate,
    ) -> Result<Option<EventWeatherForecast>, WeatherFetchError> {
        (**self).forecast_for(location, date).await
    }
}

/// Looks the day up in a provider's normalized daily samples.
#[derive(Debug)]
pub struct ProviderForecastSource<P> {
    provider: P,
}

impl<P: WeatherProvider> ProviderForecastSource<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: WeatherProvider> DayForecastSource for ProviderForecastSource<P> {
    async fn forecast_for(
        &self,
        location: Option<&str>,
        date: NaiveDate,
    ) -> Result<Option<EventWeatherForecast>, WeatherFetchError> {
        let Some(name) = location else {
            return Ok(None);
        };

        let payload = match self.provider.fetch_forecast(&LocationQuery::parse(name)).await {
            Ok(payload) => payload,
            Err(WeatherFetchError::LocationNotFound(query)) => {
                tracing::debug!(location = %query, %date, "location not found, no forecast");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let day_iso = date.format("%Y-%m-%d").to_string();
        let found = normalize_daily(&payload)
            .iter()
            .find(|d| d.date_iso == day_iso)
            .map(EventWeatherForecast::from);

        if found.is_none() {
            tracing::debug!(location = name, %date, "no daily sample for date");
        }
        Ok(found)
    }
}

/// Random condition and temperature, wider spread for event destinations.
#[derive(Debug, Clone, Default)]
pub struct FakeForecastSource;

#[async_trait]
impl DayForecastSource for FakeForecastSource {
    async fn forecast_for(
        &self,
        location: Option<&str>,
        _date: NaiveDate,
    ) -> Result<Option<EventWeatherForecast>, WeatherFetchError> {
        let mut rng = rand::rng();
        let condition = DEMO_CONDITIONS.choose(&mut rng).copied();
        let base = match location {
            Some(_) => rng.random_range(5..=25),
            None => rng.random_range(10..=20),
        };
        Ok(Some(EventWeatherForecast {
            condition,
            temperature: Some(base + rng.random_range(-3..=3)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        condition::Condition,
        provider::{OneCallPayload, RawDaily, RawDailyTemp, RawWeather},
    };
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        asked: std::sync::Mutex<Vec<LocationQuery>>,
    }

    #[async_trait]
    impl WeatherProvider for CountingProvider {
        async fn fetch_forecast(
            &self,
            location: &LocationQuery,
        ) -> Result<OneCallPayload, WeatherFetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.asked.lock().unwrap().push(location.clone());
            match location {
                LocationQuery::Name(name) if name == "Zoom" => {
                    return Err(WeatherFetchError::LocationNotFound(name.clone()));
                }
                LocationQuery::Name(name) if name == "Offline" => {
                    return Err(WeatherFetchError::Status {
                        status: 503,
                        body: "unavailable".into(),
                    });
                }
                _ => {}
            }
            let day = |d: u32, max: f64, main: &str| RawDaily {
                dt: Utc.with_ymd_and_hms(2026, 10, d, 12, 0, 0).unwrap().timestamp(),
                temp: RawDailyTemp { min: max - 8.0, max },
                pop: None,
                weather: vec![RawWeather { main: main.into() }],
            };
            Ok(OneCallPayload {
                daily: vec![day(19, 14.2, "Clouds"), day(20, 21.7, "Clear")],
                ..OneCallPayload::default()
            })
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[tokio::test]
    async fn picks_the_matching_day() {
        let source = ProviderForecastSource::new(CountingProvider::default());
        let f = source
            .forecast_for(Some("Barcelona"), date(20))
            .await
            .expect("fetch")
            .expect("forecast for the 20th");
        assert_eq!(f.condition, Some(Condition::Clear));
        assert_eq!(f.temperature, Some(22));
    }

    #[tokio::test]
    async fn out_of_range_day_is_none() {
        let source = ProviderForecastSource::new(CountingProvider::default());
        let f = source.forecast_for(Some("Barcelona"), date(25)).await;
        assert!(matches!(f, Ok(None)));
    }

    #[tokio::test]
    async fn no_location_skips_the_provider() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = ProviderForecastSource::new(CountingProvider {
            calls: calls.clone(),
            ..CountingProvider::default()
        });
        let f = source.forecast_for(None, date(19)).await;
        assert!(matches!(f, Ok(None)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_place_is_none_not_an_error() {
        let source = ProviderForecastSource::new(CountingProvider::default());
        let f = source.forecast_for(Some("Zoom"), date(19)).await;
        assert!(matches!(f, Ok(None)));
    }

    #[tokio::test]
    async fn provider_failure_still_propagates() {
        let source = ProviderForecastSource::new(CountingProvider::default());
        let err = source.forecast_for(Some("Offline"), date(19)).await.unwrap_err();
        assert!(matches!(err, WeatherFetchError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn coordinate_locations_skip_geocoding() {
        let source = ProviderForecastSource::new(CountingProvider::default());
        source
            .forecast_for(Some("48.85,2.35"), date(19))
            .await
            .expect("fetch");
        let asked = source.provider.asked.lock().unwrap();
        assert_eq!(
            asked.as_slice(),
            [LocationQuery::Coordinates { lat: 48.85, lon: 2.35 }]
        );
    }

    #[tokio::test]
    async fn fake_source_stays_in_range() {
        for _ in 0..50 {
            let f = FakeForecastSource
                .forecast_for(None, date(19))
                .await
                .expect("fake never fails")
                .expect("always some");
            let t = f.temperature.expect("temperature");
            assert!((7..=23).contains(&t));
        }
    }
}
