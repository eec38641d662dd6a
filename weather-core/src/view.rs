//! Structured view models produced by the widget.
//!
//! Everything here is plain data; turning it into markup or terminal text is
//! the job of a [`crate::render::Renderer`].

use crate::{
    format::{
        TemperatureUnit, condition_icon, local_clock_time, local_long_date, range_fill_percent,
        title_case, visibility_km,
    },
    model::WeatherReading,
};

/// What the widget's output area currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Loading,
    Locating,
    Weather(WeatherCard),
    Error(ErrorCard),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCard {
    pub location: String,
    pub date: String,
    pub icon: &'static str,
    pub description: String,
    pub temperature: String,
    pub feels_like: String,
    pub temp_min: String,
    pub temp_max: String,
    /// 0..=100, position of the current temperature within the day's range.
    pub range_fill: f64,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub visibility: String,
    pub sunrise: String,
    pub sunset: String,
    pub unit: TemperatureUnit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorCard {
    pub message: String,
    /// City a retry would fetch again; `None` hides the retry action.
    pub retry_city: Option<String>,
}

/// Format a reading for display in the given unit. Pure; no I/O.
pub fn display_weather(reading: &WeatherReading, unit: TemperatureUnit) -> WeatherCard {
    let main = &reading.main;
    let (icon, description) = match reading.condition() {
        Some(c) => (condition_icon(&c.main), title_case(&c.description)),
        None => (condition_icon(""), "Unknown".to_string()),
    };

    WeatherCard {
        location: reading.place_name(),
        date: local_long_date(reading.dt, reading.timezone),
        icon,
        description,
        temperature: unit.format(main.temp),
        feels_like: unit.format(main.feels_like),
        temp_min: unit.format(main.temp_min),
        temp_max: unit.format(main.temp_max),
        range_fill: range_fill_percent(main.temp, main.temp_min, main.temp_max),
        humidity: format!("{}%", main.humidity),
        wind: format!("{:.1} m/s", reading.wind.speed),
        pressure: format!("{} hPa", main.pressure),
        visibility: visibility_km(reading.visibility),
        sunrise: local_clock_time(reading.sys.sunrise, reading.timezone),
        sunset: local_clock_time(reading.sys.sunset, reading.timezone),
        unit,
    }
}
