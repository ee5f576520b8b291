use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{RateError, truncate_body};

use super::{RateProvider, RateQuote};

pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate.host";

#[derive(Debug, Clone)]
pub struct ExchangeRateProvider {
    access_key: Option<String>,
    base_url: String,
    http: Client,
}

impl ExchangeRateProvider {
    pub fn new(access_key: Option<String>) -> Self {
        Self { access_key, base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Deserialize)]
struct ErError {
    #[serde(default)]
    info: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErLatestResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<ErError>,
    /// Entries that are not numbers are dropped one by one.
    #[serde(default)]
    rates: HashMap<String, serde_json::Value>,
}

#[async_trait]
impl RateProvider for ExchangeRateProvider {
    async fn latest(&self, base: &str) -> Result<RateQuote, RateError> {
        let url = format!("{}/latest", self.base_url);
        tracing::debug!(base, "requesting latest rates");

        let mut query = vec![("base", base)];
        if let Some(key) = &self.access_key {
            query.push(("access_key", key.as_str()));
        }

        let res = self.http.get(&url).query(&query).send().await.map_err(RateError::Transport)?;

        let status = res.status();
        let body = res.text().await.map_err(RateError::Transport)?;

        if !status.is_success() {
            return Err(RateError::Status { status: status.as_u16(), body: truncate_body(&body) });
        }

        let parsed: ErLatestResponse = serde_json::from_str(&body)
            .map_err(|e| RateError::Malformed(format!("invalid rate JSON: {e}")))?;

        if parsed.success == Some(false) {
            let info = parsed.error.and_then(|e| e.info).unwrap_or_else(|| "unknown error".into());
            return Err(RateError::Malformed(format!("provider reported failure: {info}")));
        }

        let rates = parsed
            .rates
            .into_iter()
            .filter_map(|(code, value)| value.as_f64().map(|rate| (code, rate)))
            .collect();

        Ok(RateQuote { base: base.to_string(), rates })
    }
}
