//! Display formatting for readings: units, icons, clock times and the
//! temperature range bar.

use chrono::{DateTime, Utc};

/// Fill used when the day's range is degenerate (`temp_max == temp_min`).
pub const FLAT_RANGE_FILL: f64 = 50.0;

pub const DEFAULT_ICON: &str = "🌡️";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn from_celsius_flag(is_celsius: bool) -> Self {
        if is_celsius { Self::Celsius } else { Self::Fahrenheit }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    /// Convert a Celsius source value into this unit.
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// "15.0°C" / "59.0°F".
    pub fn format(&self, celsius: f64) -> String {
        format!("{:.1}{}", self.convert(celsius), self.symbol())
    }
}

/// Icon for a provider condition category ("Clouds", "Rain", ...).
pub fn condition_icon(category: &str) -> &'static str {
    match category.to_ascii_lowercase().as_str() {
        "clear" => "☀️",
        "clouds" => "☁️",
        "rain" => "🌧️",
        "drizzle" => "🌦️",
        "thunderstorm" => "⛈️",
        "snow" => "❄️",
        "mist" | "haze" | "fog" => "🌫️",
        "smoke" => "💨",
        _ => DEFAULT_ICON,
    }
}

/// Position of `temp` within the day's range, as a percentage in [0, 100].
pub fn range_fill_percent(temp: f64, temp_min: f64, temp_max: f64) -> f64 {
    let span = temp_max - temp_min;
    if span == 0.0 || !span.is_finite() {
        return FLAT_RANGE_FILL;
    }

    let pct = (temp - temp_min) / span * 100.0;
    if pct.is_nan() {
        return FLAT_RANGE_FILL;
    }
    pct.clamp(0.0, 100.0)
}

/// Wall-clock instant at a location `offset_secs` away from UTC.
fn local_instant(timestamp: i64, offset_secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.checked_add(offset_secs)?, 0)
}

/// Local clock time, e.g. "4:45 AM".
pub fn local_clock_time(timestamp: i64, offset_secs: i64) -> String {
    local_instant(timestamp, offset_secs)
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// Local calendar date, e.g. "Monday, June 10, 2024".
pub fn local_long_date(timestamp: i64, offset_secs: i64) -> String {
    local_instant(timestamp, offset_secs)
        .map(|t| t.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|| "Unknown date".to_string())
}

/// Upper-case the first letter of every word: "overcast clouds" -> "Overcast Clouds".
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn visibility_km(meters: Option<u32>) -> String {
    match meters {
        Some(m) => format!("{:.1} km", f64::from(m) / 1000.0),
        None => "N/A".to_string(),
    }
}
