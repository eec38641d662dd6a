use crate::{
    Config, WeatherError, WeatherQuery, WeatherReading, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Status and body of a provider response, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderReply {
    pub status: u16,
    pub body: String,
}

impl ProviderReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Issue the current-weather request and hand back the raw reply.
    async fn fetch_raw(&self, query: &WeatherQuery) -> Result<ProviderReply, WeatherError>;

    /// Fetch and decode a reading. Any non-2xx status counts as "not found".
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        let reply = self.fetch_raw(query).await?;
        if !reply.is_success() {
            return Err(WeatherError::NotFound { status: reply.status });
        }
        WeatherReading::from_json(&reply.body)
    }
}

#[async_trait]
impl<T: WeatherProvider + ?Sized> WeatherProvider for Arc<T> {
    async fn fetch_raw(&self, query: &WeatherQuery) -> Result<ProviderReply, WeatherError> {
        (**self).fetch_raw(query).await
    }

    async fn current(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        (**self).current(query).await
    }
}

/// Construct the provider client from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `weather configure` or set the API_KEY environment variable."
        )
    })?;

    let provider = match config.base_url() {
        Some(base) => OpenWeatherProvider::with_base_url(api_key.to_owned(), base.to_owned()),
        None => OpenWeatherProvider::new(api_key.to_owned()),
    };

    Ok(provider)
}
