use crate::{
    Config,
    error::{RateError, WeatherError},
    locale::Locale,
    model::WeatherSnapshot,
    provider::{exchangerate::ExchangeRateProvider, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use chrono::FixedOffset;
use std::{collections::HashMap, convert::TryFrom, fmt::Debug, sync::Arc};

pub mod exchangerate;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    ExchangeRate,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::ExchangeRate => "exchangerate",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::ExchangeRate]
    }

    /// Whether the provider refuses requests without a key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::OpenWeather)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "exchangerate" => Ok(ProviderId::ExchangeRate),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, exchangerate."
            )),
        }
    }
}

/// Raw rates as reported by a provider, relative to `base`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RateQuote {
    pub base: String,
    pub rates: HashMap<String, f64>,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `location`, already trimmed and non-blank.
    async fn current(&self, location: &str) -> Result<WeatherSnapshot, WeatherError>;
}

#[async_trait]
pub trait RateProvider: Send + Sync + Debug {
    async fn latest(&self, base: &str) -> Result<RateQuote, RateError>;
}

#[async_trait]
impl<T: WeatherProvider + ?Sized> WeatherProvider for Arc<T> {
    async fn current(&self, location: &str) -> Result<WeatherSnapshot, WeatherError> {
        (**self).current(location).await
    }
}

#[async_trait]
impl<T: RateProvider + ?Sized> RateProvider for Arc<T> {
    async fn latest(&self, base: &str) -> Result<RateQuote, RateError> {
        (**self).latest(base).await
    }
}

/// Construct the weather provider from config.
///
/// Sunrise and sunset are rendered for `locale` at `offset`.
pub fn weather_provider_from_config(
    config: &Config,
    locale: Locale,
    offset: FixedOffset,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = ProviderId::OpenWeather;
    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `wanderlust configure {id}` and enter your API key."
        )
    })?;

    let mut provider = OpenWeatherProvider::new(api_key.to_owned(), locale, offset);
    if let Some(url) = &config.weather.base_url {
        provider = provider.with_base_url(url.clone());
    }

    Ok(Box::new(provider))
}

/// Construct the rate provider from config. The access key is optional.
pub fn rate_provider_from_config(config: &Config) -> Box<dyn RateProvider> {
    let mut provider =
        ExchangeRateProvider::new(config.provider_api_key(ProviderId::ExchangeRate).map(str::to_owned));
    if let Some(url) = &config.currency.base_url {
        provider = provider.with_base_url(url.clone());
    }

    Box::new(provider)
}
