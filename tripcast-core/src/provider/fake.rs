//! Random data source for demos and local development.

use async_trait::async_trait;
use chrono::{DurationRound, TimeDelta, Utc};
use rand::{Rng, seq::IndexedRandom};

use crate::{condition::Condition, error::WeatherFetchError, model::LocationQuery};

use super::{
    OneCallPayload, RawCurrent, RawDaily, RawDailyTemp, RawHourly, RawMinutely, RawWeather,
    WeatherProvider,
};

pub(crate) const DEMO_CONDITIONS: &[Condition] = &[
    Condition::Clear,
    Condition::Clouds,
    Condition::Rain,
    Condition::Snow,
    Condition::Mist,
];

/// Produces a plausible One Call payload for any location.
///
/// Hourly samples start at the next full hour, so the normalizer's
/// synthetic "Now" entry shows up most of the time.
#[derive(Debug, Clone, Default)]
pub struct FakeWeatherProvider;

impl FakeWeatherProvider {
    pub fn payload(&self) -> OneCallPayload {
        let mut rng = rand::rng();
        let now = Utc::now();
        let next_hour = now
            .duration_trunc(TimeDelta::hours(1))
            .map(|t| t + TimeDelta::hours(1))
            .unwrap_or(now);

        let base: f64 = rng.random_range(5.0..25.0);
        let mut pick = || {
            let label = DEMO_CONDITIONS
                .choose(&mut rng)
                .copied()
                .unwrap_or_default();
            vec![RawWeather {
                main: label.as_str().to_string(),
            }]
        };

        let current = RawCurrent {
            dt: now.timestamp(),
            temp: base,
            feels_like: base - 1.5,
            weather: pick(),
        };

        let hourly = (0..48)
            .map(|i| RawHourly {
                dt: (next_hour + TimeDelta::hours(i)).timestamp(),
                temp: base + (i % 24) as f64 * 0.3 - 3.0,
                pop: Some(((i * 7) % 100) as f64 / 100.0),
                weather: pick(),
            })
            .collect();

        let daily = (0..8)
            .map(|i| RawDaily {
                dt: (now + TimeDelta::days(i)).timestamp(),
                temp: RawDailyTemp {
                    min: base - 5.0 + i as f64 * 0.5,
                    max: base + 4.0 - i as f64 * 0.5,
                },
                pop: Some(((i * 13) % 100) as f64 / 100.0),
                weather: pick(),
            })
            .collect();

        let minute_base = now.timestamp() - now.timestamp() % 60;
        let rain_from = rng.random_range(0..90);
        let minutely = (0..61)
            .map(|i| RawMinutely {
                dt: minute_base + i * 60,
                precipitation: if i >= rain_from { rng.random_range(0.1..2.5) } else { 0.0 },
            })
            .collect();

        OneCallPayload {
            timezone_offset: 0,
            current,
            hourly,
            minutely: Some(minutely),
            daily,
        }
    }
}

#[async_trait]
impl WeatherProvider for FakeWeatherProvider {
    async fn fetch_forecast(
        &self,
        location: &LocationQuery,
    ) -> Result<OneCallPayload, WeatherFetchError> {
        tracing::debug!(%location, "serving fake forecast");
        Ok(self.payload())
    }
}
