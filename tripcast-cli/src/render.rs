use std::fmt::{self, Write};

use tripcast_core::{
    Condition, DailySample, DayForecastCard, Forecast,
    condition::icon_for,
    normalize::{NextHourOutlook, next_hour_outlook},
};

const PLACEHOLDER: &str = "--";

pub fn forecast(
    location: &str,
    forecast: &Forecast,
    daily: &[DailySample],
    color: bool,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_forecast(&mut out, location, forecast, daily, color)?;
    Ok(out)
}

pub fn week(cards: &[DayForecastCard], color: bool) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_week(&mut out, cards, color)?;
    Ok(out)
}

fn write_forecast(
    out: &mut impl Write,
    location: &str,
    forecast: &Forecast,
    daily: &[DailySample],
    color: bool,
) -> fmt::Result {
    let now = &forecast.current;
    let header = format!("{location}  {} {}", now.condition.icon(), now.condition);
    writeln!(out, "{}", paint(now.condition, &header, color))?;
    writeln!(
        out,
        "  {}°C (feels like {}°C)   H:{}° L:{}°",
        now.temperature, now.feels_like, now.high_temp, now.low_temp
    )?;

    if !forecast.hourly.is_empty() {
        writeln!(out, "\nHOURLY")?;
        for h in &forecast.hourly {
            writeln!(
                out,
                "  {:<6}{:>4}°  {} {:>3}%",
                h.time_label,
                h.temperature,
                h.condition.icon(),
                h.precipitation_chance
            )?;
        }
    }

    if let Some(outlook) = next_hour_outlook(&forecast.minutely) {
        writeln!(out, "\nNEXT HOUR")?;
        writeln!(out, "  {}", outlook_line(&outlook))?;
    }

    if !daily.is_empty() {
        writeln!(out, "\nDAILY")?;
        for d in daily {
            writeln!(
                out,
                "  {}  {:>3}°/{:<3}°  {} {:<12}{:>3}%",
                d.date_iso,
                d.high_temp,
                d.low_temp,
                d.condition.icon(),
                d.condition,
                d.precipitation_chance
            )?;
        }
    }
    Ok(())
}

fn outlook_line(outlook: &NextHourOutlook) -> String {
    match (outlook.starts_in, outlook.stops_in) {
        (None, _) => "No precipitation expected in the next hour.".to_string(),
        (Some(0), None) => format!(
            "Precipitation for the next hour, up to {:.1} mm/h.",
            outlook.peak_mm_per_hour
        ),
        (Some(0), Some(stop)) => format!("Precipitation stopping in {stop} min."),
        (Some(start), None) => format!("Precipitation starting in {start} min."),
        (Some(start), Some(stop)) => {
            format!("Precipitation starting in {start} min, stopping in {stop} min.")
        }
    }
}

fn write_week(out: &mut impl Write, cards: &[DayForecastCard], color: bool) -> fmt::Result {
    writeln!(out, "TRAVEL FORECAST")?;
    for card in cards {
        let location = card.resolved_location.as_deref().unwrap_or(PLACEHOLDER);
        let condition = card.forecast.and_then(|f| f.condition);
        let temperature = card
            .forecast
            .and_then(|f| f.temperature)
            .map(|t| format!("{t}°"))
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        let label = format!("{:<10}", card.day_label);
        writeln!(
            out,
            "  {}{:<32}{} {:>4}",
            paint(condition.unwrap_or_default(), &label, color),
            location,
            icon_for(condition),
            temperature
        )?;
    }
    Ok(())
}

/// Wrap `text` in 24-bit ANSI colours: the condition's top gradient stop as
/// background, its text colour as foreground.
fn paint(condition: Condition, text: &str, color: bool) -> String {
    let [top, _] = condition.gradient();
    match (color, rgb(top), rgb(condition.text_color())) {
        (true, Some((br, bg, bb)), Some((fr, fg, fb))) => {
            format!("\x1b[48;2;{br};{bg};{bb}m\x1b[38;2;{fr};{fg};{fb}m{text}\x1b[0m")
        }
        _ => text.to_string(),
    }
}

fn rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tripcast_core::{EventWeatherForecast, MinutelySample, WeatherSnapshot};

    fn card(label: &str, location: Option<&str>, temp: Option<i32>) -> DayForecastCard {
        DayForecastCard {
            day_id: "2026-10-19".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            day_label: label.into(),
            resolved_location: location.map(str::to_string),
            forecast: temp.map(|t| EventWeatherForecast {
                condition: Some(Condition::Clear),
                temperature: Some(t),
            }),
            is_event_sourced: false,
        }
    }

    #[test]
    fn week_shows_placeholders_for_missing_data() {
        let out = week(
            &[
                card("Today", Some("📍 Paris"), Some(21)),
                card("Tomorrow", None, None),
            ],
            false,
        )
        .unwrap();
        assert!(out.contains("📍 Paris"));
        assert!(out.contains("21°"));
        assert!(!out.contains('\x1b'));
        let tomorrow = out.lines().nth(2).unwrap();
        assert!(tomorrow.contains(PLACEHOLDER));
        assert!(tomorrow.contains(Condition::Unknown.icon()));
    }

    #[test]
    fn colored_week_uses_condition_palette() {
        let out = week(&[card("Today", Some("Oslo"), Some(3))], true).unwrap();
        // Clear: #479EEC background, white text
        assert!(out.contains("\x1b[48;2;71;158;236m\x1b[38;2;255;255;255mToday"));
        assert!(out.contains("\x1b[0m"));
    }

    #[test]
    fn light_backgrounds_get_dark_text() {
        let painted = paint(Condition::Snow, "x", true);
        assert!(painted.contains("38;2;51;51;51"));
        assert_eq!(paint(Condition::Snow, "x", false), "x");
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(rgb("#479EEC"), Some((71, 158, 236)));
        assert_eq!(rgb("479EEC"), None);
        assert_eq!(rgb("#47"), None);
    }

    #[test]
    fn forecast_reports_rain_start() {
        let f = Forecast {
            current: WeatherSnapshot {
                temperature: 12,
                feels_like: 10,
                condition: Condition::Rain,
                high_temp: 15,
                low_temp: 7,
            },
            hourly: vec![],
            minutely: (0..61)
                .map(|i| MinutelySample {
                    timestamp_unix_seconds: i * 60,
                    precipitation_rate_mm_per_hour: if i >= 12 { 1.0 } else { 0.0 },
                })
                .collect(),
        };
        let out = forecast("Oslo", &f, &[], false).unwrap();
        assert!(out.contains("Oslo"));
        assert!(out.contains("H:15° L:7°"));
        assert!(out.contains("starting in 12 min"));
        assert!(!out.contains("DAILY"));
    }
}
