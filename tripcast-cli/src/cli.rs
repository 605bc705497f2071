use std::{
    io::IsTerminal,
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, anyhow};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use tripcast_core::{
    CalendarAccessError, CalendarSource, Config, ConfigError, DayForecastSource, ErrorKind,
    FakeCalendar,
    FakeForecastSource, FakeWeatherProvider, JsonFileCalendar, LocationQuery, NoCalendar,
    ProviderForecastSource, ResolveError, WeatherFetchError, WeatherProvider, WeeklyResolver,
    normalize::{normalize, normalize_daily},
    provider::provider_from_config,
};

use crate::render;

const DEMO_LOCATION: &str = "Barcelona";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "tripcast", version, about = "Weather for where your calendar takes you")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and a default location.
    Configure,

    /// Current conditions, hourly, next-hour precipitation and daily outlook.
    Now {
        /// Place name or "lat,lon". Defaults to the configured location.
        #[arg(long)]
        location: Option<String>,

        /// Use generated data instead of the live API.
        #[arg(long)]
        demo: bool,
    },

    /// Seven-day travel forecast from your calendar.
    Week {
        /// Where you are when no event says otherwise.
        #[arg(long)]
        location: Option<String>,

        /// JSON export of calendar events.
        #[arg(long)]
        events: Option<PathBuf>,

        /// Give up on the whole week after this many seconds.
        #[arg(long)]
        timeout: Option<u64>,

        /// Use generated events and forecasts instead of the live API.
        #[arg(long)]
        demo: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Now { location, demo } => {
                let location = location.or(config.default_location.clone());
                let provider: Box<dyn WeatherProvider> = if demo {
                    Box::new(FakeWeatherProvider)
                } else {
                    provider_from_config(&config)?
                };
                let location = match (location, demo) {
                    (Some(l), _) => l,
                    (None, true) => DEMO_LOCATION.to_string(),
                    (None, false) => {
                        return Err(anyhow!(
                            "No location given.\n\
                             Hint: pass --location or run `tripcast configure`."
                        ));
                    }
                };
                show_now(provider.as_ref(), &location).await
            }
            Command::Week {
                location,
                events,
                timeout,
                demo,
            } => {
                let location = location.or(config.default_location.clone());
                let timeout = timeout.map(Duration::from_secs).unwrap_or(config.timeout());

                let calendar: Box<dyn CalendarSource>;
                let forecasts: Arc<dyn DayForecastSource>;
                if demo {
                    calendar = Box::new(FakeCalendar);
                    forecasts = Arc::new(FakeForecastSource);
                } else {
                    forecasts = Arc::new(ProviderForecastSource::new(provider_from_config(&config)?));
                    calendar = match events {
                        Some(path) => Box::new(JsonFileCalendar::new(path)),
                        None => Box::new(NoCalendar),
                    };
                }

                show_week(calendar, forecasts, location.as_deref(), timeout).await
            }
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let current = config.default_location.clone().unwrap_or_default();
    let default_location = Text::new("Default location (optional):")
        .with_default(&current)
        .prompt()
        .context("Failed to read default location")?;

    config.api_key = Some(api_key.trim().to_string());
    config.default_location = Some(default_location.trim().to_string()).filter(|l| !l.is_empty());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show_now(provider: &dyn WeatherProvider, location: &str) -> anyhow::Result<()> {
    let payload = provider
        .fetch_forecast(&LocationQuery::parse(location))
        .await
        .map_err(|e| surfaced(e.user_message(), e))?;

    let forecast = normalize(&payload, Utc::now());
    let daily = normalize_daily(&payload);

    print!("{}", render::forecast(location, &forecast, &daily, use_color())?);
    Ok(())
}

async fn show_week(
    calendar: Box<dyn CalendarSource>,
    forecasts: Arc<dyn DayForecastSource>,
    location: Option<&str>,
    timeout: Duration,
) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let resolver = WeeklyResolver::new(calendar, forecasts.clone());

    let cards = match resolver
        .resolve_week_with_timeout(location, today, &Local, timeout)
        .await
    {
        Ok(cards) => cards,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            tracing::warn!(error = %e, "calendar unavailable, using current location only");
            eprintln!("{}", e.user_message());
            WeeklyResolver::new(NoCalendar, forecasts)
                .resolve_week_with_timeout(location, today, &Local, timeout)
                .await
                .map_err(|e| surfaced(e.user_message(), e))?
        }
        Err(e) => return Err(surfaced(e.user_message(), e)),
    };

    print!("{}", render::week(&cards, use_color())?);
    Ok(())
}

fn use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Exit status for a failed run, picked from the first classified error in
/// the chain.
pub fn exit_code(err: &anyhow::Error) -> ExitCode {
    match error_kind(err) {
        Some(ErrorKind::Configuration) => ExitCode::from(78),
        Some(ErrorKind::PermissionDenied) => ExitCode::from(77),
        Some(ErrorKind::NetworkOrProvider) => ExitCode::from(69),
        None => ExitCode::FAILURE,
    }
}

fn error_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            Some(e.kind())
        } else if let Some(e) = cause.downcast_ref::<ResolveError>() {
            Some(e.kind())
        } else if let Some(e) = cause.downcast_ref::<WeatherFetchError>() {
            Some(e.kind())
        } else {
            cause.downcast_ref::<CalendarAccessError>().map(CalendarAccessError::kind)
        }
    })
}

/// Fixed user-facing message on top, the underlying cause beneath it.
fn surfaced<E>(message: String, err: E) -> anyhow::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    anyhow::Error::new(err).context(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = provider_from_config(&Config::default()).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Configuration));
    }

    #[test]
    fn surfaced_errors_keep_their_kind() {
        let err = surfaced(
            "Failed to load weekly forecast data.".into(),
            ResolveError::Timeout(Duration::from_secs(20)),
        );
        assert_eq!(err.to_string(), "Failed to load weekly forecast data.");
        assert_eq!(error_kind(&err), Some(ErrorKind::NetworkOrProvider));

        let denied = surfaced(
            "denied".into(),
            ResolveError::Calendar(CalendarAccessError::PermissionDenied),
        );
        assert_eq!(error_kind(&denied), Some(ErrorKind::PermissionDenied));
    }

    #[test]
    fn unclassified_errors_have_no_kind() {
        assert_eq!(error_kind(&anyhow!("No location given.")), None);
    }
}
