use std::path::PathBuf;

use anyhow::Context;
use chrono::{FixedOffset, Local, Offset};
use clap::{Parser, Subcommand};
use inquire::{Password, Select, Text};

use wanderlust_core::{
    AmountFormatter, Config, CurrencyDisplay, JsonListingStore, ListingStore, Locale, PriceTag,
    ProviderId, RateService, WeatherService,
    currency::{FileSelectionStore, MemorySelectionStore, SelectionStore, SELECTION_KEY},
    enrich_listing,
    provider::{rate_provider_from_config, weather_provider_from_config},
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wanderlust", version, about = "Listing weather and price enrichment")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "exchangerate".
        provider: String,
    },

    /// Show current weather for a location, falling back to the default city.
    Weather {
        /// Free-text location, e.g. "Goa" or "London".
        location: String,
    },

    /// Print the exchange rates prices are converted with.
    Rates,

    /// Convert a nightly price from the reference currency.
    Price {
        amount: f64,

        /// Display currency; defaults to the remembered selection.
        #[arg(long)]
        currency: Option<String>,
    },

    /// Show or change the remembered display currency.
    Currency {
        /// New currency code. Omit to show the current choice.
        code: Option<String>,

        /// Pick from the offered currencies interactively.
        #[arg(long, conflicts_with = "code")]
        pick: bool,
    },

    /// List listings with prices in the selected currency.
    Listings {
        /// JSON file holding an array of listings.
        #[arg(long)]
        file: PathBuf,

        /// Only listings whose title contains this text.
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one listing with its weather panel.
    Show {
        #[arg(long)]
        file: PathBuf,

        id: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        for warning in config.validate() {
            tracing::warn!("{warning}");
        }

        match self.command {
            Command::Configure { provider } => configure(config, &provider)?,
            Command::Weather { location } => {
                let weather = weather_service(&config)?;
                let outcome = weather.resolve(&location).await;
                render::print_weather(&location, &outcome);
            }
            Command::Rates => {
                let table = rate_service(&config).fetch_rates().await;
                render::print_rates(&table);
            }
            Command::Price { amount, currency } => {
                let mut tags = vec![PriceTag::from_amount(amount)];
                match currency {
                    Some(code) => {
                        let code = offered_code(&config, &code)?;
                        let mut display = CurrencyDisplay::new(
                            rate_service(&config),
                            formatter(&config),
                            MemorySelectionStore::new(),
                        );
                        display.select(&code, &mut tags).await;
                    }
                    None => {
                        let display = CurrencyDisplay::new(
                            rate_service(&config),
                            formatter(&config),
                            FileSelectionStore::in_config_dir()?,
                        );
                        display.apply(&mut tags).await;
                    }
                }
                println!("{}", tags[0].text);
            }
            Command::Currency { code, pick } => currency(&config, code, pick)?,
            Command::Listings { file, search } => {
                let store = JsonListingStore::load(&file)?;
                let listings = store.search(search.as_deref().unwrap_or_default());

                let mut tags: Vec<PriceTag> =
                    listings.iter().map(|l| PriceTag::from_amount(l.price)).collect();
                let display = CurrencyDisplay::new(
                    rate_service(&config),
                    formatter(&config),
                    FileSelectionStore::in_config_dir()?,
                );
                display.apply(&mut tags).await;

                render::print_listings(&listings, &tags);
            }
            Command::Show { file, id } => {
                let store = JsonListingStore::load(&file)?;
                let weather = weather_service(&config)?;

                let Some(detail) = enrich_listing(&store, &weather, &id).await else {
                    anyhow::bail!("Listing '{id}' does not exist.");
                };

                let mut tags = vec![PriceTag::from_amount(detail.listing.price)];
                let display = CurrencyDisplay::new(
                    rate_service(&config),
                    formatter(&config),
                    FileSelectionStore::in_config_dir()?,
                );
                display.apply(&mut tags).await;

                render::print_listing_detail(&detail, &tags[0].text);
            }
        }

        Ok(())
    }
}

fn configure(mut config: Config, provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    if config.is_provider_configured(id) {
        println!("A key for {id} is already configured; entering a new one replaces it.");
    }

    let prompt = if id.requires_api_key() {
        format!("API key for {id}:")
    } else {
        format!("Access key for {id} (leave empty for none):")
    };
    let api_key = Password::new(&prompt)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        if id.requires_api_key() {
            anyhow::bail!("An API key is required for provider '{id}'.");
        }
        config.providers.remove(id.as_str());
    } else {
        config.upsert_provider_api_key(id, api_key);
    }

    if id == ProviderId::OpenWeather {
        let city = Text::new("Fallback city for unresolvable locations:")
            .with_default(&config.weather.fallback_city)
            .prompt()
            .context("Failed to read fallback city")?;
        config.weather.fallback_city = city.trim().to_string();
    }

    if config.locale.is_none() {
        let locale = Select::new("Display locale:", Locale::all().to_vec())
            .with_starting_cursor(
                Locale::all().iter().position(|l| *l == detect_locale(&config)).unwrap_or(0),
            )
            .prompt()
            .context("Failed to read locale")?;
        config.locale = Some(locale);
    }

    config.save()?;
    println!("Saved configuration for {id} to {}", Config::config_file_path()?.display());
    Ok(())
}

fn currency(config: &Config, code: Option<String>, pick: bool) -> anyhow::Result<()> {
    let mut store = FileSelectionStore::in_config_dir()?;
    let offered = &config.currency.offered;

    let chosen = match (code, pick) {
        (Some(code), _) => Some(offered_code(config, &code)?),
        (None, true) => Some(
            Select::new("Display currency:", offered.clone())
                .prompt()
                .context("Failed to read currency")?,
        ),
        (None, false) => None,
    };

    match chosen {
        Some(code) => {
            store.set(SELECTION_KEY, &code)?;
            println!("Prices will be shown in {code}.");
        }
        None => {
            // Same resolution the display applies on start-up.
            let display = CurrencyDisplay::new(rate_service(config), formatter(config), store);
            println!("Selected currency: {}", display.selected());
            println!("Offered: {}", display.offered().join(", "));
        }
    }
    Ok(())
}

/// Normalizes `code` and rejects anything the selector does not offer.
fn offered_code(config: &Config, code: &str) -> anyhow::Result<String> {
    let code = code.trim().to_uppercase();
    if !config.currency.is_offered(&code) {
        anyhow::bail!(
            "Currency '{code}' is not offered. Offered currencies: {}.",
            config.currency.offered.join(", ")
        );
    }
    Ok(code)
}

fn weather_service(config: &Config) -> anyhow::Result<WeatherService> {
    let provider = weather_provider_from_config(config, detect_locale(config), local_offset())?;
    Ok(WeatherService::from_settings(provider, &config.weather))
}

fn rate_service(config: &Config) -> RateService {
    RateService::new(rate_provider_from_config(config), config.currency.clone())
}

fn formatter(config: &Config) -> AmountFormatter {
    AmountFormatter::new(detect_locale(config))
}

/// Configured locale, else the POSIX locale variables, else en-US.
fn detect_locale(config: &Config) -> Locale {
    if let Some(locale) = config.locale {
        return locale;
    }
    ["LC_ALL", "LC_MONETARY", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .filter(|value| !value.is_empty())
        .find_map(|value| Locale::parse(&value))
        .unwrap_or_default()
}

fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offered_code_is_normalized() {
        let config = Config::default();
        assert_eq!(offered_code(&config, " usd ").unwrap(), "USD");
        assert_eq!(offered_code(&config, "INR").unwrap(), "INR");
    }

    #[test]
    fn codes_outside_the_selector_are_refused() {
        let config = Config::default();

        let err = offered_code(&config, "GBP").unwrap_err();
        assert!(err.to_string().contains("'GBP' is not offered"));
        assert!(err.to_string().contains("INR, USD, EUR"));
    }
}
