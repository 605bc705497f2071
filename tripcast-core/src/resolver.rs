//! Weekly travel forecast: which place's weather to show on each of the
//! next seven days.
//!
//! A day shows the location of its first located event (by start date, in
//! input order). Days without one fall back to the user's current location.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use futures::future::try_join_all;
use tracing::instrument;

use crate::{
    calendar::CalendarSource,
    error::ResolveError,
    forecast::DayForecastSource,
    model::{CalendarEvent, DayForecastCard},
};

pub const WEEK_LEN: usize = 7;
pub const LOCATION_MARKER: &str = "📍";

/// Location decision for a single day, before any forecast is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub day_label: String,
    /// What to ask the forecast source for.
    pub lookup_location: Option<String>,
    /// What to show on the card.
    pub display_location: Option<String>,
    pub is_event_sourced: bool,
}

/// "Today", "Tomorrow", then short weekday names.
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a").to_string(),
    }
}

/// `[start of today, start of today + 7 days)` in `tz`, as UTC instants.
pub fn week_window<Tz: TimeZone>(today: NaiveDate, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let start_of = |d: NaiveDate| {
        let midnight = d.and_time(NaiveTime::MIN);
        tz.from_local_datetime(&midnight)
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|| midnight.and_utc())
    };
    (start_of(today), start_of(today + TimeDelta::days(WEEK_LEN as i64)))
}

/// Decide the location for each day of the week starting at `today`.
///
/// Only an event's start date counts: multi-day events are matched on their
/// first day alone.
pub fn plan_week<Tz: TimeZone>(
    events: &[CalendarEvent],
    current_location: Option<&str>,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<DayPlan> {
    (0..WEEK_LEN as i64)
        .map(|offset| {
            let date = today + TimeDelta::days(offset);
            let located = events.iter().find(|e| {
                e.has_location() && e.start_date.with_timezone(tz).date_naive() == date
            });

            match located {
                Some(event) => DayPlan {
                    date,
                    day_label: day_label(date, today),
                    lookup_location: Some(event.location.clone()),
                    display_location: Some(event.location.clone()),
                    is_event_sourced: true,
                },
                None => DayPlan {
                    date,
                    day_label: day_label(date, today),
                    lookup_location: current_location.map(str::to_string),
                    display_location: current_location.map(|l| format!("{LOCATION_MARKER} {l}")),
                    is_event_sourced: false,
                },
            }
        })
        .collect()
}

pub struct WeeklyResolver<C, F> {
    calendar: C,
    forecasts: F,
}

impl<C: CalendarSource, F: DayForecastSource> WeeklyResolver<C, F> {
    pub fn new(calendar: C, forecasts: F) -> Self {
        Self {
            calendar,
            forecasts,
        }
    }

    /// Build all seven cards. Calendar events are fetched once; the daily
    /// forecasts are fetched concurrently and the first failure abandons the
    /// rest, so a pass yields either a full week or an error.
    #[instrument(skip(self, tz), level = "info")]
    pub async fn resolve_week<Tz: TimeZone>(
        &self,
        current_location: Option<&str>,
        today: NaiveDate,
        tz: &Tz,
    ) -> Result<Vec<DayForecastCard>, ResolveError> {
        let (start, end) = week_window(today, tz);
        let events = self.calendar.fetch_events(start, end).await?;
        tracing::debug!(events = events.len(), %start, %end, "calendar loaded");

        let plans = plan_week(&events, current_location, today, tz);
        let forecasts = try_join_all(
            plans
                .iter()
                .map(|p| self.forecasts.forecast_for(p.lookup_location.as_deref(), p.date)),
        )
        .await?;

        let cards: Vec<DayForecastCard> = plans
            .into_iter()
            .zip(forecasts)
            .map(|(plan, forecast)| DayForecastCard {
                day_id: plan.date.format("%Y-%m-%d").to_string(),
                date: plan.date,
                day_label: plan.day_label,
                resolved_location: plan.display_location,
                forecast,
                is_event_sourced: plan.is_event_sourced,
            })
            .collect();

        tracing::info!(
            event_days = cards.iter().filter(|c| c.is_event_sourced).count(),
            pending = cards.iter().filter(|c| c.forecast.is_none()).count(),
            "weekly forecast resolved"
        );
        Ok(cards)
    }

    /// [`Self::resolve_week`] bounded by `timeout` for the whole pass.
    pub async fn resolve_week_with_timeout<Tz: TimeZone>(
        &self,
        current_location: Option<&str>,
        today: NaiveDate,
        tz: &Tz,
        timeout: Duration,
    ) -> Result<Vec<DayForecastCard>, ResolveError> {
        tokio::time::timeout(timeout, self.resolve_week(current_location, today, tz))
            .await
            .map_err(|_| ResolveError::Timeout(timeout))?
    }
}
