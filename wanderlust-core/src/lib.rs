//! Core library for the `wanderlust` listing site.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Weather and exchange-rate provider clients
//! - Weather enrichment with a fallback city
//! - Currency conversion and locale-aware price formatting
//! - The listing-store interface the enrichment reads from
//!
//! Provider failures never reach callers: lookups degrade to fallback data instead.

pub mod config;
pub mod currency;
pub mod error;
pub mod listing;
pub mod locale;
pub mod model;
pub mod provider;
pub mod weather;

pub use config::{Config, CurrencySettings, ProviderConfig, WeatherSettings};
pub use currency::{AmountFormatter, CurrencyDisplay, PriceTag, PricedElement, RateService};
pub use error::{FormatError, RateError, WeatherError};
pub use listing::{JsonListingStore, ListingStore, enrich_listing};
pub use locale::Locale;
pub use model::{CurrencyRateTable, Listing, ListingDetail, WeatherSnapshot};
pub use provider::{ProviderId, RateProvider, WeatherProvider};
pub use weather::{WeatherOutcome, WeatherService};
