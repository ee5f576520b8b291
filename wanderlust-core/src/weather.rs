//! Weather enrichment for listing pages.
//!
//! A lookup never fails from the caller's point of view: a location that
//! cannot be resolved is retried once against the configured fallback city,
//! and if that also fails the page renders without a weather panel.

use crate::{
    config::WeatherSettings, error::WeatherError, model::WeatherSnapshot,
    provider::WeatherProvider,
};

/// Which lookup produced the snapshot, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherOutcome {
    /// The listing's own location resolved.
    Primary(WeatherSnapshot),
    /// The fallback city stood in for the listing's location.
    Fallback(WeatherSnapshot),
    Unavailable,
}

impl WeatherOutcome {
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            WeatherOutcome::Primary(s) | WeatherOutcome::Fallback(s) => Some(s),
            WeatherOutcome::Unavailable => None,
        }
    }

    pub fn into_snapshot(self) -> Option<WeatherSnapshot> {
        match self {
            WeatherOutcome::Primary(s) | WeatherOutcome::Fallback(s) => Some(s),
            WeatherOutcome::Unavailable => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, WeatherOutcome::Fallback(_))
    }
}

#[derive(Debug)]
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
    fallback_city: String,
}

impl WeatherService {
    pub fn new(provider: Box<dyn WeatherProvider>, fallback_city: impl Into<String>) -> Self {
        Self { provider, fallback_city: fallback_city.into() }
    }

    pub fn from_settings(provider: Box<dyn WeatherProvider>, settings: &WeatherSettings) -> Self {
        Self::new(provider, settings.fallback_city.clone())
    }

    /// Single lookup. Blank queries are rejected before touching the provider.
    pub async fn fetch_weather(&self, query: &str) -> Result<WeatherSnapshot, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherError::BlankQuery);
        }

        let result = self.provider.current(query).await;
        if let Err(error) = &result {
            tracing::warn!(query, error = %error, "weather lookup failed");
        }
        result
    }

    /// Looks up `query`, then the fallback city once if that yields nothing.
    pub async fn resolve(&self, query: &str) -> WeatherOutcome {
        match self.fetch_weather(query).await {
            Ok(snapshot) => return WeatherOutcome::Primary(snapshot),
            Err(WeatherError::BlankQuery) => {
                tracing::debug!("blank location; skipping primary weather lookup");
            }
            Err(_) => {}
        }

        tracing::info!(query, fallback = %self.fallback_city, "using fallback city for weather");
        match self.fetch_weather(&self.fallback_city).await {
            Ok(snapshot) => WeatherOutcome::Fallback(snapshot),
            Err(error) => {
                tracing::warn!(
                    query,
                    fallback = %self.fallback_city,
                    error = %error,
                    "weather unavailable; rendering without weather"
                );
                WeatherOutcome::Unavailable
            }
        }
    }
}
