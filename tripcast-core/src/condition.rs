use serde::{Deserialize, Serialize};

/// Canonical weather state, as reported in the provider's `weather[0].main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Drizzle,
    Mist,
    Smoke,
    Haze,
    Dust,
    Fog,
    Sand,
    Ash,
    Squall,
    Tornado,
    #[default]
    Unknown,
}

const DARK_TEXT: &str = "#333333";
const LIGHT_TEXT: &str = "#FFFFFF";

impl Condition {
    pub const fn all() -> &'static [Condition] {
        &[
            Condition::Clear,
            Condition::Clouds,
            Condition::Rain,
            Condition::Snow,
            Condition::Thunderstorm,
            Condition::Drizzle,
            Condition::Mist,
            Condition::Smoke,
            Condition::Haze,
            Condition::Dust,
            Condition::Fog,
            Condition::Sand,
            Condition::Ash,
            Condition::Squall,
            Condition::Tornado,
            Condition::Unknown,
        ]
    }

    /// Map a provider label to a condition. Anything unrecognised is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == label)
            .unwrap_or(Condition::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::Clouds => "Clouds",
            Condition::Rain => "Rain",
            Condition::Snow => "Snow",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Drizzle => "Drizzle",
            Condition::Mist => "Mist",
            Condition::Smoke => "Smoke",
            Condition::Haze => "Haze",
            Condition::Dust => "Dust",
            Condition::Fog => "Fog",
            Condition::Sand => "Sand",
            Condition::Ash => "Ash",
            Condition::Squall => "Squall",
            Condition::Tornado => "Tornado",
            Condition::Unknown => "Unknown",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Condition::Clear => "☀️",
            Condition::Clouds => "☁️",
            Condition::Rain => "🌧️",
            Condition::Snow => "❄️",
            Condition::Thunderstorm => "⛈️",
            Condition::Drizzle => "🌦️",
            Condition::Mist
            | Condition::Smoke
            | Condition::Haze
            | Condition::Dust
            | Condition::Fog
            | Condition::Sand
            | Condition::Ash => "🌫️",
            Condition::Squall => "🌬️",
            Condition::Tornado => "🌪️",
            Condition::Unknown => "❓",
        }
    }

    /// Two-stop background gradient, top colour first.
    pub fn gradient(&self) -> [&'static str; 2] {
        match self {
            Condition::Clear => ["#479EEC", "#87CEEB"],
            Condition::Clouds => ["#B0C4DE", "#778899"],
            Condition::Rain => ["#6495ED", "#4682B4"],
            Condition::Snow => ["#ADD8E6", "#FFFFFF"],
            Condition::Thunderstorm => ["#2F4F4F", "#708090"],
            Condition::Drizzle => ["#87CEFA", "#B0C4DE"],
            Condition::Mist => ["#D3D3D3", "#E0E0E0"],
            Condition::Smoke => ["#A9A9A9", "#C0C0C0"],
            Condition::Haze => ["#B0BEC5", "#CFD8DC"],
            Condition::Dust => ["#D2B48C", "#BC8F8F"],
            Condition::Fog => ["#BDBDBD", "#D3D3D3"],
            Condition::Sand => ["#F4A460", "#D2B48C"],
            Condition::Ash => ["#808080", "#A9A9A9"],
            Condition::Squall => ["#778899", "#B0C4DE"],
            Condition::Tornado => ["#37474F", "#546E7A"],
            Condition::Unknown => ["#757F9A", "#D7DDE8"],
        }
    }

    /// Light backgrounds get dark text.
    pub fn text_color(&self) -> &'static str {
        match self {
            Condition::Snow
            | Condition::Mist
            | Condition::Smoke
            | Condition::Haze
            | Condition::Fog => DARK_TEXT,
            _ => LIGHT_TEXT,
        }
    }
}

/// Icon for an optional condition; a missing one renders like `Unknown`.
pub fn icon_for(condition: Option<Condition>) -> &'static str {
    condition.unwrap_or_default().icon()
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_roundtrip() {
        for c in Condition::all() {
            assert_eq!(Condition::from_label(c.as_str()), *c);
        }
    }

    #[test]
    fn unrecognised_label_is_unknown() {
        assert_eq!(Condition::from_label("Sunny"), Condition::Unknown);
        assert_eq!(Condition::from_label(""), Condition::Unknown);
        assert_eq!(Condition::from_label("rain"), Condition::Unknown);
    }

    #[test]
    fn fog_like_conditions_share_an_icon() {
        assert_eq!(Condition::Mist.icon(), Condition::Ash.icon());
        assert_eq!(Condition::Dust.icon(), Condition::Fog.icon());
        assert_ne!(Condition::Rain.icon(), Condition::Fog.icon());
    }

    #[test]
    fn missing_condition_uses_unknown_icon() {
        assert_eq!(icon_for(None), Condition::Unknown.icon());
        assert_eq!(icon_for(Some(Condition::Clear)), "☀️");
    }

    #[test]
    fn gradients_are_two_hex_stops() {
        for c in Condition::all() {
            for stop in c.gradient() {
                assert!(stop.starts_with('#') && stop.len() == 7, "{c}: {stop}");
            }
        }
        assert_eq!(Condition::Clear.gradient(), ["#479EEC", "#87CEEB"]);
    }

    #[test]
    fn display_honours_width() {
        assert_eq!(format!("{:<6}|", Condition::Fog), "Fog   |");
    }

    #[test]
    fn text_color_is_dark_on_light_backgrounds() {
        assert_eq!(Condition::Snow.text_color(), "#333333");
        assert_eq!(Condition::Haze.text_color(), "#333333");
        assert_eq!(Condition::Rain.text_color(), "#FFFFFF");
        assert_eq!(Condition::Sand.text_color(), "#FFFFFF");
    }
}
