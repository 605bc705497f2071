//! Turns a raw One Call payload into the application's forecast shapes.
//!
//! Rules:
//! - temperatures are rounded to whole degrees, half-way values upwards;
//! - conditions come from the first `weather[].main` label, `Unknown` if absent;
//! - `pop` (0..=1) becomes a 0..=100 percentage, 0 if absent;
//! - the hourly list is capped at 24 entries and always starts with "Now".

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::{
    condition::Condition,
    model::{DailySample, Forecast, HourlySample, MinutelySample, WeatherSnapshot},
    provider::{OneCallPayload, RawHourly, main_label},
};

pub const HOURLY_LIMIT: usize = 24;
pub const NOW_LABEL: &str = "Now";
const NOW_WINDOW_SECS: i64 = 30 * 60;

pub fn normalize(payload: &OneCallPayload, now: DateTime<Utc>) -> Forecast {
    let offset = local_offset(payload);
    let current = current_snapshot(payload);
    let hourly = hourly_samples(&payload.hourly, &current, now, offset);
    let minutely = payload
        .minutely
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|m| MinutelySample {
            timestamp_unix_seconds: m.dt,
            precipitation_rate_mm_per_hour: m.precipitation,
        })
        .collect();

    Forecast {
        current,
        hourly,
        minutely,
    }
}

/// Daily samples, one per provider day, index 0 = today at the location.
pub fn normalize_daily(payload: &OneCallPayload) -> Vec<DailySample> {
    let offset = local_offset(payload);
    payload
        .daily
        .iter()
        .map(|d| DailySample {
            date_iso: DateTime::from_timestamp(d.dt, 0)
                .map(|t| t.with_timezone(&offset).format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            high_temp: round_temp(d.temp.max),
            low_temp: round_temp(d.temp.min),
            condition: condition_of(main_label(&d.weather)),
            precipitation_chance: precipitation_chance(d.pop),
        })
        .collect()
}

pub fn precipitation_chance(pop: Option<f64>) -> u8 {
    (pop.unwrap_or(0.0) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// "Now" within half an hour of `now`, otherwise a lower-case 12-hour label.
pub fn hour_label(ts: i64, now: DateTime<Utc>, offset: FixedOffset) -> String {
    if (ts - now.timestamp()).abs() < NOW_WINDOW_SECS {
        return NOW_LABEL.to_string();
    }
    DateTime::from_timestamp(ts, 0)
        .map(|t| t.with_timezone(&offset).format("%-I %P").to_string())
        .unwrap_or_default()
}

fn current_snapshot(payload: &OneCallPayload) -> WeatherSnapshot {
    let (high_temp, low_temp) = payload
        .daily
        .first()
        .map(|d| (round_temp(d.temp.max), round_temp(d.temp.min)))
        .unwrap_or((0, 0));

    WeatherSnapshot {
        temperature: round_temp(payload.current.temp),
        feels_like: round_temp(payload.current.feels_like),
        condition: condition_of(main_label(&payload.current.weather)),
        high_temp,
        low_temp,
    }
}

fn hourly_samples(
    raw: &[RawHourly],
    current: &WeatherSnapshot,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Vec<HourlySample> {
    let mut samples: Vec<HourlySample> = raw
        .iter()
        .take(HOURLY_LIMIT)
        .map(|h| HourlySample {
            time_label: hour_label(h.dt, now, offset),
            temperature: round_temp(h.temp),
            condition: condition_of(main_label(&h.weather)),
            precipitation_chance: precipitation_chance(h.pop),
        })
        .collect();

    let starts_with_now = samples.first().is_none_or(|s| s.time_label == NOW_LABEL);
    if !starts_with_now {
        let now_entry = HourlySample {
            time_label: NOW_LABEL.to_string(),
            temperature: current.temperature,
            condition: current.condition,
            precipitation_chance: precipitation_chance(raw.first().and_then(|h| h.pop)),
        };
        samples.insert(0, now_entry);
        samples.pop();
    }

    samples
}

fn local_offset(payload: &OneCallPayload) -> FixedOffset {
    FixedOffset::east_opt(payload.timezone_offset).unwrap_or_else(|| Utc.fix())
}

fn condition_of(label: Option<&str>) -> Condition {
    label.map(Condition::from_label).unwrap_or_default()
}

// Half-way values go towards +inf, so -2.5 becomes -2.
fn round_temp(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// What the next hour of minute-level precipitation looks like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextHourOutlook {
    /// Minutes from the first sample until precipitation starts.
    pub starts_in: Option<usize>,
    /// Minutes from the first sample until it stops again.
    pub stops_in: Option<usize>,
    pub peak_mm_per_hour: f64,
}

/// Summarise the first 61 minutely samples. `None` when there are none.
pub fn next_hour_outlook(minutely: &[MinutelySample]) -> Option<NextHourOutlook> {
    if minutely.is_empty() {
        return None;
    }
    let window = &minutely[..minutely.len().min(61)];
    let is_wet = |m: &MinutelySample| m.precipitation_rate_mm_per_hour > 0.0;

    let starts_in = window.iter().position(is_wet);
    let stops_in = starts_in.and_then(|start| {
        window[start..]
            .iter()
            .position(|m| !is_wet(m))
            .map(|offset| start + offset)
    });
    let peak_mm_per_hour = window
        .iter()
        .map(|m| m.precipitation_rate_mm_per_hour)
        .fold(0.0, f64::max);

    Some(NextHourOutlook {
        starts_in,
        stops_in,
        peak_mm_per_hour,
    })
}
