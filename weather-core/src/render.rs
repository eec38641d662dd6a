use maud::{Markup, html};

use crate::view::{ErrorCard, View, WeatherCard};

/// Turns a [`View`] into output for a particular surface.
pub trait Renderer {
    fn render(&self, view: &View) -> String;
}

/// HTML fragments for the widget's output container.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, view: &View) -> String {
        view_markup(view).into_string()
    }
}

pub fn view_markup(view: &View) -> Markup {
    match view {
        View::Loading => placeholder("Fetching weather data..."),
        View::Locating => placeholder("Detecting your location..."),
        View::Weather(card) => weather_card(card),
        View::Error(card) => error_card(card),
    }
}

fn placeholder(text: &str) -> Markup {
    html! {
        div class="loading" {
            div class="spinner" {}
            p { (text) }
        }
    }
}

pub fn weather_card(card: &WeatherCard) -> Markup {
    html! {
        div class="weather-card" {
            div class="weather-header" {
                h2 class="location" { (card.location) }
                p class="date" { (card.date) }
            }
            div class="weather-main" {
                span class="weather-icon" { (card.icon) }
                div class="temperature" { (card.temperature) }
                p class="description" { (card.description) }
                p class="feels-like" { "Feels like " (card.feels_like) }
            }
            div class="temp-range" {
                span class="temp-min" { (card.temp_min) }
                div class="range-bar" {
                    div class="range-fill" style=(format!("width: {:.0}%", card.range_fill)) {}
                }
                span class="temp-max" { (card.temp_max) }
            }
            div class="weather-details" {
                (detail("Humidity", &card.humidity))
                (detail("Wind", &card.wind))
                (detail("Pressure", &card.pressure))
                (detail("Visibility", &card.visibility))
                (detail("Sunrise", &card.sunrise))
                (detail("Sunset", &card.sunset))
            }
        }
    }
}

fn detail(label: &str, value: &str) -> Markup {
    html! {
        div class="detail" {
            span class="detail-label" { (label) }
            span class="detail-value" { (value) }
        }
    }
}

pub fn error_card(card: &ErrorCard) -> Markup {
    html! {
        div class="error-card" {
            span class="error-icon" { "⚠️" }
            h3 { "Oops!" }
            p class="error-message" { (card.message) }
            @if let Some(city) = &card.retry_city {
                button class="retry-btn" data-city=(city) { "Try Again" }
            }
        }
    }
}

/// Plain text for terminals.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&self, view: &View) -> String {
        match view {
            View::Loading => "Fetching weather data...".to_string(),
            View::Locating => "Detecting your location...".to_string(),
            View::Weather(card) => text_card(card),
            View::Error(card) => match &card.retry_city {
                Some(city) => format!("Error: {} (retry: weather show \"{city}\")", card.message),
                None => format!("Error: {}", card.message),
            },
        }
    }
}

fn text_card(card: &WeatherCard) -> String {
    const BAR_WIDTH: usize = 20;
    let filled = ((card.range_fill / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));

    let lines = [
        card.location.clone(),
        card.date.clone(),
        String::new(),
        format!("{}  {}  {}", card.icon, card.temperature, card.description),
        format!("Feels like {}", card.feels_like),
        format!("{} [{bar}] {}", card.temp_min, card.temp_max),
        String::new(),
        format!("Humidity:   {}", card.humidity),
        format!("Wind:       {}", card.wind),
        format!("Pressure:   {}", card.pressure),
        format!("Visibility: {}", card.visibility),
        format!("Sunrise:    {}", card.sunrise),
        format!("Sunset:     {}", card.sunset),
    ];
    lines.join("\n")
}
