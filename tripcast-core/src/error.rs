//! Error types shared by the weather, calendar and resolver layers.

use std::time::Duration;

use thiserror::Error;

/// Coarse error classes the presentation layer reacts to.
///
/// A day or hour with no forecast is not an error: it is carried as a `None`
/// forecast and rendered as a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing credential. Fatal at startup.
    Configuration,
    /// Location or calendar access refused by the user.
    PermissionDenied,
    /// Request failed or the provider returned something unusable.
    NetworkOrProvider,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "No OpenWeather API key configured.\n\
         Hint: run `tripcast configure` or set OPENWEATHER_API_KEY."
    )]
    MissingApiKey,
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}

/// Any failure while fetching or decoding a provider payload.
#[derive(Error, Debug)]
pub enum WeatherFetchError {
    #[error("Network error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse provider response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Location not found: {0}")]
    LocationNotFound(String),
}

impl WeatherFetchError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::NetworkOrProvider
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::LocationNotFound(name) => format!("Couldn't find a place called \"{name}\"."),
            _ => "Failed to fetch weather data.".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CalendarAccessError {
    #[error("Calendar access denied")]
    PermissionDenied,

    #[error("Failed to read calendar: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse calendar events: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CalendarAccessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PermissionDenied => ErrorKind::PermissionDenied,
            Self::Io(_) | Self::Parse(_) => ErrorKind::NetworkOrProvider,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied => {
                "Calendar access is off. Showing weather for your current location.".to_string()
            }
            _ => "Could not load events.".to_string(),
        }
    }
}

/// Terminal failure of one weekly resolution pass. No cards are produced.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Calendar(#[from] CalendarAccessError),

    #[error(transparent)]
    Forecast(#[from] WeatherFetchError),

    #[error("Weekly forecast timed out after {0:?}")]
    Timeout(Duration),
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Calendar(e) => e.kind(),
            Self::Forecast(e) => e.kind(),
            Self::Timeout(_) => ErrorKind::NetworkOrProvider,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Calendar(CalendarAccessError::PermissionDenied) => {
                CalendarAccessError::PermissionDenied.user_message()
            }
            _ => "Failed to load weekly forecast data.".to_string(),
        }
    }
}
