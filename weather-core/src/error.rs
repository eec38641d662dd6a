use thiserror::Error;

/// Why a device position could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Geolocation is not supported by your browser.")]
    Unsupported,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable")]
    Unavailable,
}

/// Failure of a single weather lookup attempt.
///
/// Every variant is terminal for the attempt; the widget turns it into an
/// error card and the proxy into an opaque JSON error.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Please enter a city name.")]
    Validation,

    #[error("City not found. Please try again.")]
    NotFound { status: u16 },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from weather provider: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Location(#[from] LocationError),
}

impl WeatherError {
    /// Whether the provider rejected the query, as opposed to the call failing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WeatherError::NotFound { .. })
    }
}
