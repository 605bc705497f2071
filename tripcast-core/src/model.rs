use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::condition::Condition;

/// What to ask the weather provider about.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Name(String),
    Coordinates { lat: f64, lon: f64 },
}

impl LocationQuery {
    /// `"48.85,2.35"` is read as coordinates, anything else as a place name.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if let Some((lat, lon)) = input.split_once(',') {
            if let (Ok(lat), Ok(lon)) = (lat.trim().parse(), lon.trim().parse()) {
                return LocationQuery::Coordinates { lat, lon };
            }
        }
        LocationQuery::Name(input.to_string())
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::Name(name) => f.write_str(name),
            LocationQuery::Coordinates { lat, lon } => write!(f, "{lat:.4},{lon:.4}"),
        }
    }
}

/// Current conditions for one location.
///
/// `high_temp`/`low_temp` come straight from the provider's first daily
/// sample, so they need not bracket `temperature`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temperature: i32,
    pub feels_like: i32,
    pub condition: Condition,
    pub high_temp: i32,
    pub low_temp: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySample {
    pub time_label: String,
    pub temperature: i32,
    pub condition: Condition,
    pub precipitation_chance: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinutelySample {
    pub timestamp_unix_seconds: i64,
    pub precipitation_rate_mm_per_hour: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySample {
    pub date_iso: String,
    pub high_temp: i32,
    pub low_temp: i32,
    pub condition: Condition,
    pub precipitation_chance: u8,
}

/// Normalized forecast for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub current: WeatherSnapshot,
    pub hourly: Vec<HourlySample>,
    pub minutely: Vec<MinutelySample>,
}

/// A calendar entry as handed over by a calendar source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    /// Empty when the event has no location.
    #[serde(default)]
    pub location: String,
}

impl CalendarEvent {
    pub fn has_location(&self) -> bool {
        !self.location.trim().is_empty()
    }
}

/// Reduced forecast for compact cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWeatherForecast {
    pub condition: Option<Condition>,
    pub temperature: Option<i32>,
}

impl From<&DailySample> for EventWeatherForecast {
    fn from(day: &DailySample) -> Self {
        Self {
            condition: Some(day.condition),
            temperature: Some(day.high_temp),
        }
    }
}

/// One day of the weekly travel forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayForecastCard {
    pub day_id: String,
    pub date: NaiveDate,
    pub day_label: String,
    /// Display text: the event location, or the marked current location.
    pub resolved_location: Option<String>,
    /// `None` means pending or unavailable, not an error.
    pub forecast: Option<EventWeatherForecast>,
    pub is_event_sourced: bool,
}
