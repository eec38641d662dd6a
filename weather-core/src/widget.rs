//! The widget controller.
//!
//! [`WeatherWidget`] owns the UI state (selected unit, last good reading, the
//! text in the city field) and drives a [`Surface`] through the
//! `Idle -> Loading -> {Weather, Error}` cycle for each user action.

use async_trait::async_trait;

use crate::{
    error::{LocationError, WeatherError},
    format::TemperatureUnit,
    model::{WeatherQuery, WeatherReading},
    provider::WeatherProvider,
    view::{ErrorCard, View, display_weather},
};

pub const LOCATION_FETCH_FAILED: &str = "Unable to fetch weather for your location.";
pub const LOCATION_PERMISSION_HINT: &str =
    "Unable to retrieve your location. Please check your location permissions.";

/// Where the widget puts its output.
pub trait Surface {
    fn show(&mut self, view: View);

    /// Replace the text in the city field.
    fn set_input(&mut self, _text: &str) {}

    /// Update the unit toggle's label/active state.
    fn set_unit(&mut self, _unit: TemperatureUnit) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Source of the device position.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Position, LocationError>;
}

/// A geolocator that always answers with the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Position);

#[async_trait]
impl Geolocator for FixedPosition {
    async fn current_position(&self) -> Result<Position, LocationError> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub is_celsius: bool,
    /// Most recent successful reading; failed fetches never touch it.
    pub last_reading: Option<WeatherReading>,
    pub input: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self { is_celsius: true, last_reading: None, input: String::new() }
    }
}

impl UiState {
    pub fn unit(&self) -> TemperatureUnit {
        TemperatureUnit::from_celsius_flag(self.is_celsius)
    }
}

pub struct WeatherWidget<P, S> {
    provider: P,
    surface: S,
    geolocator: Option<Box<dyn Geolocator>>,
    state: UiState,
}

impl<P: WeatherProvider, S: Surface> WeatherWidget<P, S> {
    pub fn new(provider: P, surface: S) -> Self {
        Self { provider, surface, geolocator: None, state: UiState::default() }
    }

    pub fn with_geolocator(mut self, geolocator: Box<dyn Geolocator>) -> Self {
        self.geolocator = Some(geolocator);
        self
    }

    pub fn with_unit(mut self, unit: TemperatureUnit) -> Self {
        self.state.is_celsius = unit == TemperatureUnit::Celsius;
        self
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Mirror of the user typing into the city field.
    pub fn set_input(&mut self, text: &str) {
        self.state.input = text.to_string();
    }

    /// Look up a city, taken from `city` or else the input field.
    pub async fn fetch_weather(&mut self, city: Option<&str>) -> View {
        let city = city.unwrap_or(self.state.input.as_str()).trim().to_string();
        if city.is_empty() {
            return self.show_error(WeatherError::Validation.to_string());
        }

        self.surface.show(View::Loading);

        match self.provider.current(&WeatherQuery::City(city.clone())).await {
            Ok(reading) => {
                tracing::info!(city = %city, "weather fetched");
                self.accept(reading)
            }
            Err(err) => {
                tracing::debug!(city = %city, error = %err, "weather lookup failed");
                self.show_error(err.to_string())
            }
        }
    }

    /// Look up the weather at the device position.
    pub async fn get_current_location(&mut self) -> View {
        let Some(geolocator) = self.geolocator.as_deref() else {
            return self.show_error(LocationError::Unsupported.to_string());
        };

        self.surface.show(View::Locating);
        let position = geolocator.current_position().await;

        let position = match position {
            Ok(position) => position,
            Err(LocationError::Unsupported) => {
                return self.show_error(LocationError::Unsupported.to_string());
            }
            Err(err) => {
                tracing::debug!(error = %err, "position unavailable");
                return self.show_error(LOCATION_PERMISSION_HINT.to_string());
            }
        };

        self.surface.show(View::Loading);

        let query = WeatherQuery::Coordinates {
            latitude: position.latitude,
            longitude: position.longitude,
        };
        match self.provider.current(&query).await {
            Ok(reading) => {
                tracing::info!(%query, place = %reading.name, "weather fetched for position");
                self.state.input = reading.name.clone();
                self.surface.set_input(&reading.name);
                self.accept(reading)
            }
            Err(err) => {
                tracing::debug!(%query, error = %err, "weather lookup for position failed");
                self.show_error(LOCATION_FETCH_FAILED.to_string())
            }
        }
    }

    /// Flip Celsius/Fahrenheit and redraw the last reading, if any. No network call.
    pub fn toggle_unit(&mut self) -> Option<View> {
        self.state.is_celsius = !self.state.is_celsius;
        let unit = self.state.unit();
        self.surface.set_unit(unit);

        let reading = self.state.last_reading.as_ref()?;
        let view = View::Weather(display_weather(reading, unit));
        self.surface.show(view.clone());
        Some(view)
    }

    /// Show an error card; the retry action targets the current input.
    pub fn show_error(&mut self, message: String) -> View {
        let input = self.state.input.trim();
        let retry_city = (!input.is_empty()).then(|| input.to_string());

        let view = View::Error(ErrorCard { message, retry_city });
        self.surface.show(view.clone());
        view
    }

    /// The error card's retry action. Does nothing when the input is empty.
    pub async fn retry(&mut self) -> Option<View> {
        if self.state.input.trim().is_empty() {
            return None;
        }
        Some(self.fetch_weather(None).await)
    }

    fn accept(&mut self, reading: WeatherReading) -> View {
        let view = View::Weather(display_weather(&reading, self.state.unit()));
        self.state.last_reading = Some(reading);
        self.surface.show(view.clone());
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::fixtures, provider::ProviderReply};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    enum Outcome {
        Found,
        Missing,
        Garbage,
    }

    #[derive(Debug)]
    struct StubProvider {
        outcomes: Mutex<Vec<Outcome>>,
        calls: Mutex<Vec<WeatherQuery>>,
    }

    impl StubProvider {
        fn new(outcomes: Vec<Outcome>) -> Arc<Self> {
            Arc::new(Self { outcomes: Mutex::new(outcomes), calls: Mutex::new(Vec::new()) })
        }

        fn calls(&self) -> Vec<WeatherQuery> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn fetch_raw(&self, query: &WeatherQuery) -> Result<ProviderReply, WeatherError> {
            self.calls.lock().unwrap().push(query.clone());
            let outcome = self.outcomes.lock().unwrap().remove(0);
            Ok(match outcome {
                Outcome::Found => ProviderReply { status: 200, body: fixtures::LONDON.to_string() },
                Outcome::Missing => ProviderReply {
                    status: 404,
                    body: r#"{"cod":"404","message":"city not found"}"#.to_string(),
                },
                Outcome::Garbage => ProviderReply { status: 200, body: "not json".to_string() },
            })
        }
    }

    #[derive(Debug, Default)]
    struct Recorder {
        views: Vec<View>,
        input: Option<String>,
        unit: Option<TemperatureUnit>,
    }

    impl Surface for Recorder {
        fn show(&mut self, view: View) {
            self.views.push(view);
        }

        fn set_input(&mut self, text: &str) {
            self.input = Some(text.to_string());
        }

        fn set_unit(&mut self, unit: TemperatureUnit) {
            self.unit = Some(unit);
        }
    }

    /// A geolocator whose position request always fails the same way.
    struct Failing(LocationError);

    #[async_trait]
    impl Geolocator for Failing {
        async fn current_position(&self) -> Result<Position, LocationError> {
            Err(self.0)
        }
    }

    fn london_position() -> Box<dyn Geolocator> {
        Box::new(FixedPosition(Position { latitude: 51.5085, longitude: -0.1257 }))
    }

    fn error_message(view: &View) -> &str {
        match view {
            View::Error(card) => &card.message,
            other => panic!("expected error view, got {other:?}"),
        }
    }

    fn temperature(view: &View) -> &str {
        match view {
            View::Weather(card) => &card.temperature,
            other => panic!("expected weather view, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_input_never_hits_the_network() {
        let provider = StubProvider::new(vec![]);
        let mut widget = WeatherWidget::new(provider.clone(), Recorder::default());

        for input in ["", "   ", "\t\n"] {
            widget.set_input(input);
            let view = widget.fetch_weather(None).await;
            assert_eq!(error_message(&view), "Please enter a city name.");
        }
        let view = widget.fetch_weather(Some("  ")).await;
        assert!(matches!(view, View::Error(_)));

        assert!(provider.calls().is_empty());
        assert!(!widget.surface().views.contains(&View::Loading));
    }

    #[tokio::test]
    async fn successful_fetch_shows_loading_then_card() {
        let provider = StubProvider::new(vec![Outcome::Found]);
        let mut widget = WeatherWidget::new(provider.clone(), Recorder::default());
        widget.set_input("  London ");

        let view = widget.fetch_weather(None).await;

        assert_eq!(temperature(&view), "15.0°C");
        assert_eq!(provider.calls(), vec![WeatherQuery::City("London".into())]);
        assert_eq!(widget.surface().views.first(), Some(&View::Loading));
        assert_eq!(widget.surface().views.last(), Some(&view));
        assert!(widget.state().last_reading.is_some());
    }

    #[tokio::test]
    async fn explicit_city_wins_over_input() {
        let provider = StubProvider::new(vec![Outcome::Found]);
        let mut widget = WeatherWidget::new(provider.clone(), Recorder::default());
        widget.set_input("Paris");

        widget.fetch_weather(Some("London")).await;

        assert_eq!(provider.calls(), vec![WeatherQuery::City("London".into())]);
    }

    #[tokio::test]
    async fn not_found_shows_retryable_error() {
        let provider = StubProvider::new(vec![Outcome::Missing]);
        let mut widget = WeatherWidget::new(provider.clone(), Recorder::default());
        widget.set_input("Nonexistentville");

        let view = widget.fetch_weather(None).await;

        match view {
            View::Error(card) => {
                assert!(card.message.contains("not found"));
                assert_eq!(card.retry_city.as_deref(), Some("Nonexistentville"));
            }
            other => panic!("expected error view, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_reading() {
        let provider = StubProvider::new(vec![Outcome::Found, Outcome::Garbage]);
        let mut widget = WeatherWidget::new(provider.clone(), Recorder::default());

        widget.fetch_weather(Some("London")).await;
        let before = widget.state().last_reading.clone();

        let view = widget.fetch_weather(Some("Elsewhere")).await;
        assert!(error_message(&view).starts_with("Unexpected response"));
        assert_eq!(widget.state().last_reading, before);

        // Toggling after the error still redraws the earlier success.
        let redrawn = widget.toggle_unit().expect("cached reading");
        assert_eq!(temperature(&redrawn), "59.0°F");
    }

    #[tokio::test]
    async fn toggle_twice_restores_celsius() {
        let provider = StubProvider::new(vec![Outcome::Found]);
        let mut widget = WeatherWidget::new(provider.clone(), Recorder::default());

        let original = widget.fetch_weather(Some("London")).await;
        let fahrenheit = widget.toggle_unit().unwrap();
        let back = widget.toggle_unit().unwrap();

        assert_eq!(temperature(&fahrenheit), "59.0°F");
        assert_eq!(back, original);
        assert_eq!(provider.calls().len(), 1);
    }

    #[test]
    fn toggle_without_reading_only_changes_label() {
        let provider = StubProvider::new(vec![]);
        let mut widget = WeatherWidget::new(provider.clone(), Recorder::default());

        assert!(widget.toggle_unit().is_none());

        assert!(!widget.state().is_celsius);
        assert_eq!(widget.surface().unit, Some(TemperatureUnit::Fahrenheit));
        assert!(widget.surface().views.is_empty());
    }

    #[tokio::test]
    async fn starting_unit_is_configurable() {
        let provider = StubProvider::new(vec![Outcome::Found]);
        let mut widget = WeatherWidget::new(provider.clone(), Recorder::default())
            .with_unit(TemperatureUnit::Fahrenheit);

        let view = widget.fetch_weather(Some("London")).await;
        assert_eq!(temperature(&view), "59.0°F");
    }

    #[tokio::test]
    async fn retry_refetches_current_input() {
        let provider = StubProvider::new(vec![Outcome::Missing, Outcome::Found]);
        let mut widget = WeatherWidget::new(provider.clone(), Recorder::default());
        widget.set_input("London");

        widget.fetch_weather(None).await;
        let view = widget.retry().await.expect("input is set");

        assert_eq!(temperature(&view), "15.0°C");
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn retry_with_empty_input_is_a_no_op() {
        let provider = StubProvider::new(vec![]);
        let mut widget = WeatherWidget::new(provider.clone(), Recorder::default());

        assert!(widget.retry().await.is_none());
        assert!(widget.surface().views.is_empty());
    }

    #[tokio::test]
    async fn geolocation_unsupported_without_locator() {
        let provider = StubProvider::new(vec![]);
        let mut widget = WeatherWidget::new(provider.clone(), Recorder::default());

        let view = widget.get_current_location().await;

        assert_eq!(error_message(&view), "Geolocation is not supported by your browser.");
        assert!(!widget.surface().views.contains(&View::Locating));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn geolocation_success_updates_input() {
        let provider = StubProvider::new(vec![Outcome::Found]);
        let mut widget =
            WeatherWidget::new(provider.clone(), Recorder::default()).with_geolocator(london_position());

        let view = widget.get_current_location().await;

        assert_eq!(temperature(&view), "15.0°C");
        assert_eq!(widget.state().input, "London");
        assert_eq!(widget.surface().input.as_deref(), Some("London"));
        assert_eq!(widget.surface().views[0], View::Locating);
        assert_eq!(
            provider.calls(),
            vec![WeatherQuery::Coordinates { latitude: 51.5085, longitude: -0.1257 }]
        );
    }

    #[tokio::test]
    async fn geolocation_denied_shows_permission_hint() {
        let provider = StubProvider::new(vec![]);
        let mut widget = WeatherWidget::new(provider.clone(), Recorder::default())
            .with_geolocator(Box::new(Failing(LocationError::PermissionDenied)));

        let view = widget.get_current_location().await;

        assert_eq!(error_message(&view), LOCATION_PERMISSION_HINT);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn geolocation_unavailable_shows_permission_hint() {
        let provider = StubProvider::new(vec![]);
        let mut widget = WeatherWidget::new(provider.clone(), Recorder::default())
            .with_geolocator(Box::new(Failing(LocationError::Unavailable)));

        let view = widget.get_current_location().await;

        assert_eq!(error_message(&view), LOCATION_PERMISSION_HINT);
        assert_eq!(widget.surface().views[0], View::Locating);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn geolocator_reporting_unsupported_shows_unsupported_message() {
        let provider = StubProvider::new(vec![]);
        let mut widget = WeatherWidget::new(provider.clone(), Recorder::default())
            .with_geolocator(Box::new(Failing(LocationError::Unsupported)));

        let view = widget.get_current_location().await;

        assert_eq!(error_message(&view), "Geolocation is not supported by your browser.");
        assert!(!widget.surface().views.contains(&View::Loading));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn geolocation_lookup_failure_is_location_specific() {
        let provider = StubProvider::new(vec![Outcome::Missing]);
        let mut widget =
            WeatherWidget::new(provider.clone(), Recorder::default()).with_geolocator(london_position());

        let view = widget.get_current_location().await;

        assert_eq!(error_message(&view), LOCATION_FETCH_FAILED);
        assert!(widget.state().last_reading.is_none());
        assert!(widget.state().input.is_empty());
    }
}
