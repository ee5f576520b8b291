use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Normalized current conditions for one resolved location.
///
/// Built only from a complete provider response; a lookup that cannot fill
/// every field yields no snapshot at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Location name as resolved by the provider, may differ from the query.
    pub city: String,
    pub country: String,
    pub temp_c: i32,
    pub feels_like_c: i32,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub description: String,
    pub icon_url: String,
    /// Localized time of day, e.g. `6:04:05 AM`.
    pub sunrise: String,
    pub sunset: String,
}

/// Exchange rates relative to a reference currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRateTable {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
}

impl CurrencyRateTable {
    /// Table holding only the reference currency at 1.0.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let mut rates = BTreeMap::new();
        rates.insert(base.clone(), 1.0);
        Self { base, rates }
    }

    /// Inserts or replaces a rate. The reference currency stays pinned at 1.0.
    pub fn with_rate(mut self, code: impl Into<String>, rate: f64) -> Self {
        let code = code.into();
        if code != self.base {
            self.rates.insert(code, rate);
        }
        self
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Rate for `code`, or 1.0 when the table has no entry for it.
    pub fn rate_or_identity(&self, code: &str) -> f64 {
        self.rate(code).unwrap_or(1.0)
    }

    pub fn covers<'a>(&self, codes: impl IntoIterator<Item = &'a str>) -> bool {
        codes.into_iter().all(|c| self.rates.contains_key(c))
    }
}

/// A property listing as read from the listing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Free-text location entered by the owner; used as the weather query.
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub country: String,
    /// Nightly price in the reference currency.
    #[serde(default)]
    pub price: f64,
}

/// What the detail view receives: the listing and its weather, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingDetail {
    pub listing: Listing,
    pub weather: Option<WeatherSnapshot>,
}
