//! Core library for the `tripcast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and the normalizer that shapes its payloads
//! - Calendar sources and the weekly event-location resolver
//!
//! Every external source sits behind a trait with a random fake beside the
//! live implementation, so the whole pipeline runs offline in demo mode.

pub mod calendar;
pub mod condition;
pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod resolver;

pub use calendar::{CalendarSource, FakeCalendar, JsonFileCalendar, NoCalendar};
pub use condition::Condition;
pub use config::Config;
pub use error::{CalendarAccessError, ConfigError, ErrorKind, ResolveError, WeatherFetchError};
pub use forecast::{DayForecastSource, FakeForecastSource, ProviderForecastSource};
pub use model::{
    CalendarEvent, DailySample, DayForecastCard, EventWeatherForecast, Forecast, HourlySample,
    LocationQuery, MinutelySample, WeatherSnapshot,
};
pub use provider::{WeatherProvider, fake::FakeWeatherProvider, openweather::OpenWeatherProvider};
pub use resolver::WeeklyResolver;
