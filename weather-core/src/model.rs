use serde::Deserialize;

use crate::error::WeatherError;

/// What to look up: a city name or a coordinate pair, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coordinates { latitude: f64, longitude: f64 },
}

impl WeatherQuery {
    /// Provider query parameters selecting the location.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            WeatherQuery::City(city) => vec![("q", city.clone())],
            WeatherQuery::Coordinates { latitude, longitude } => {
                vec![("lat", latitude.to_string()), ("lon", longitude.to_string())]
            }
        }
    }
}

impl std::fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherQuery::City(city) => f.write_str(city),
            WeatherQuery::Coordinates { latitude, longitude } => {
                write!(f, "{latitude:.4},{longitude:.4}")
            }
        }
    }
}

/// One observation as returned by the provider's current-weather endpoint.
///
/// Only the fields the card reads are decoded; everything else in the
/// payload is ignored. Temperatures are Celsius (the request pins
/// `units=metric`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherReading {
    pub name: String,
    /// Observation time, unix seconds.
    pub dt: i64,
    /// Shift from UTC in seconds for the reading's location.
    pub timezone: i64,
    pub main: MainReadings,
    pub wind: Wind,
    /// Meters; the provider omits it for some stations.
    #[serde(default)]
    pub visibility: Option<u32>,
    pub sys: SolarInfo,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SolarInfo {
    #[serde(default)]
    pub country: Option<String>,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
}

impl WeatherReading {
    /// Decode a provider body, failing with a typed error on missing fields.
    pub fn from_json(body: &str) -> Result<Self, WeatherError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Primary condition, if the provider sent any.
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }

    /// "London, GB", or just the name when no country code is present.
    pub fn place_name(&self) -> String {
        match self.sys.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_provider_payload() {
        let reading = fixtures::london();

        assert_eq!(reading.name, "London");
        assert_eq!(reading.main.temp, 15.0);
        assert_eq!(reading.main.humidity, 72);
        assert_eq!(reading.visibility, Some(10000));
        assert_eq!(reading.condition().map(|c| c.main.as_str()), Some("Clouds"));
        assert_eq!(reading.place_name(), "London, GB");
    }

    #[test]
    fn missing_required_field_is_a_decode_error() {
        let err = WeatherReading::from_json(r#"{"name": "London", "cod": 200}"#).unwrap_err();
        assert!(matches!(err, WeatherError::Decode(_)));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let body = r#"{
            "name": "Nowhere", "dt": 0, "timezone": 0,
            "main": {"temp": 1.0, "feels_like": 1.0, "temp_min": 1.0, "temp_max": 1.0,
                     "pressure": 1000, "humidity": 50},
            "wind": {"speed": 0.0},
            "sys": {"sunrise": 0, "sunset": 0}
        }"#;
        let reading = WeatherReading::from_json(body).unwrap();

        assert!(reading.condition().is_none());
        assert_eq!(reading.visibility, None);
        assert_eq!(reading.place_name(), "Nowhere");
    }

    #[test]
    fn query_pairs_use_one_form_only() {
        let city = WeatherQuery::City("Paris".into()).query_pairs();
        assert_eq!(city, vec![("q", "Paris".to_string())]);

        let coords = WeatherQuery::Coordinates { latitude: 48.85, longitude: 2.35 }.query_pairs();
        assert_eq!(coords, vec![("lat", "48.85".to_string()), ("lon", "2.35".to_string())]);
    }
}
