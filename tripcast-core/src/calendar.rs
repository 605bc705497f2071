//! Calendar sources feeding the weekly resolver.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use rand::{Rng, seq::IndexedRandom};
use serde::Deserialize;
use tracing::instrument;

use crate::{error::CalendarAccessError, model::CalendarEvent};

/// Read-only access to the user's events.
///
/// Permission prompts are the caller's business; a source that has not been
/// granted access returns [`CalendarAccessError::PermissionDenied`].
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Events starting in `[start, end)`, in source order.
    async fn fetch_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, CalendarAccessError>;
}

#[async_trait]
impl<C: CalendarSource + ?Sized> CalendarSource for Box<C> {
    async fn fetch_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, CalendarAccessError> {
        (**self).fetch_events(start, end).await
    }
}

/// No calendar at all: every day falls back to the current location.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCalendar;

#[async_trait]
impl CalendarSource for NoCalendar {
    async fn fetch_events(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, CalendarAccessError> {
        Ok(Vec::new())
    }
}

/// On-disk record; dates may be missing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEvent {
    id: String,
    #[serde(default)]
    title: String,
    start_date: Option<DateTime<FixedOffset>>,
    end_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    location: Option<String>,
}

impl StoredEvent {
    fn into_event(self) -> Option<CalendarEvent> {
        Some(CalendarEvent {
            id: self.id,
            title: self.title,
            start_date: self.start_date?,
            end_date: self.end_date?,
            location: self.location.unwrap_or_default(),
        })
    }
}

/// Events exported as a JSON array of
/// `{ id, title, startDate, endDate, location }` objects.
#[derive(Debug, Clone)]
pub struct JsonFileCalendar {
    path: PathBuf,
}

impl JsonFileCalendar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CalendarSource for JsonFileCalendar {
    #[instrument(skip(self), fields(path = %self.path.display()), level = "debug")]
    async fn fetch_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, CalendarAccessError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(CalendarAccessError::PermissionDenied);
            }
            Err(e) => return Err(e.into()),
        };
        let stored: Vec<StoredEvent> = serde_json::from_slice(&raw)?;
        let total = stored.len();

        let events: Vec<CalendarEvent> = stored
            .into_iter()
            .filter_map(StoredEvent::into_event)
            .collect();
        if events.len() < total {
            tracing::warn!(dropped = total - events.len(), "skipped events without dates");
        }

        Ok(events
            .into_iter()
            .filter(|e| {
                let s = e.start_date.with_timezone(&Utc);
                s >= start && s < end
            })
            .collect())
    }
}

const DEMO_LOCATIONS: &[Option<&str>] = &[
    Some("Flight LGW->BCN"),
    Some("Generator Hostel Barcelona"),
    Some("Sagrada Familia Tour"),
    None,
    Some("Train BCN->PAR"),
    Some("Hotel St-Michel Paris"),
    Some("Home"),
];

/// Random travel itinerary: each day has an even chance of one event.
#[derive(Debug, Clone, Default)]
pub struct FakeCalendar;

#[async_trait]
impl CalendarSource for FakeCalendar {
    async fn fetch_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, CalendarAccessError> {
        let mut rng = rand::rng();
        let days = (end - start).num_days();
        let mut events = Vec::new();

        for i in 0..days {
            if !rng.random_bool(0.5) {
                continue;
            }
            let at = (start + TimeDelta::days(i) + TimeDelta::hours(9)).fixed_offset();
            let location = DEMO_LOCATIONS.choose(&mut rng).copied().flatten();
            events.push(CalendarEvent {
                id: format!("event-{i}-a"),
                title: match location {
                    Some(loc) => format!("Event {}A - {loc}", i + 1),
                    None => format!("Event {}A - NoLoc", i + 1),
                },
                start_date: at,
                end_date: at + TimeDelta::hours(1),
                location: location.unwrap_or_default().to_string(),
            });
        }

        Ok(events)
    }
}
