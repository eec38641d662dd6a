//! Core library for the weather widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The provider client and the payload decoder
//! - The widget controller, its view models and renderers
//!
//! It is used by `weather-cli` and `weather-proxy`.

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod provider;
pub mod render;
pub mod view;
pub mod widget;

pub use config::Config;
pub use error::{LocationError, WeatherError};
pub use format::TemperatureUnit;
pub use model::{WeatherQuery, WeatherReading};
pub use provider::{ProviderReply, WeatherProvider, openweather::OpenWeatherProvider};
pub use render::{HtmlRenderer, Renderer, TextRenderer};
pub use view::{ErrorCard, View, WeatherCard};
pub use widget::{FixedPosition, Geolocator, Position, Surface, UiState, WeatherWidget};
