use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::PathBuf,
};

use crate::{locale::Locale, model::CurrencyRateTable, provider::ProviderId};

pub const DEFAULT_FALLBACK_CITY: &str = "New York";
pub const DEFAULT_REFERENCE_CURRENCY: &str = "INR";
pub const DEFAULT_UNIT_SUFFIX: &str = " / night";

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Weather lookup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    /// Queried when a listing's own location yields nothing.
    pub fallback_city: String,
    /// Overrides the provider endpoint, mostly useful for testing.
    pub base_url: Option<String>,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self { fallback_city: DEFAULT_FALLBACK_CITY.to_string(), base_url: None }
    }
}

/// Currency display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencySettings {
    /// Currency every stored price is denominated in.
    pub reference: String,
    /// Codes the currency selector offers, reference included.
    pub offered: Vec<String>,
    /// Appended to every converted price.
    pub unit_suffix: String,
    pub base_url: Option<String>,
    /// Approximate rates used whenever the provider cannot supply one.
    pub fallback_rates: BTreeMap<String, f64>,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            reference: DEFAULT_REFERENCE_CURRENCY.to_string(),
            offered: vec!["INR".to_string(), "USD".to_string(), "EUR".to_string()],
            unit_suffix: DEFAULT_UNIT_SUFFIX.to_string(),
            base_url: None,
            fallback_rates: BTreeMap::from([("USD".to_string(), 0.012), ("EUR".to_string(), 0.011)]),
        }
    }
}

impl CurrencySettings {
    /// Static table covering the reference and every offered code.
    ///
    /// Offered codes without a configured rate pass through at 1.0.
    pub fn fallback_table(&self) -> CurrencyRateTable {
        self.offered.iter().fold(CurrencyRateTable::new(&self.reference), |table, code| {
            let rate = self.fallback_rate(code);
            table.with_rate(code.clone(), rate)
        })
    }

    pub fn fallback_rate(&self, code: &str) -> f64 {
        if code == self.reference {
            return 1.0;
        }
        self.fallback_rates
            .get(code)
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(1.0)
    }

    pub fn is_offered(&self, code: &str) -> bool {
        self.offered.iter().any(|c| c == code)
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Display locale, e.g. "en-US". Left unset, callers pick one from the environment.
    pub locale: Option<Locale>,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub weather: WeatherSettings,

    #[serde(default)]
    pub currency: CurrencySettings,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Platform directory holding the config file and other local state.
    pub fn config_dir() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "wanderlust", "wanderlust")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().to_path_buf())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Set or replace a provider API key.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }

    /// Problems that do not stop the app but degrade what it shows.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let currency = &self.currency;

        if self.weather.fallback_city.trim().is_empty() {
            warnings.push("weather.fallback_city is blank; fallback lookups will be skipped".into());
        }
        if !currency.is_offered(&currency.reference) {
            warnings.push(format!(
                "currency.offered does not include the reference currency {}",
                currency.reference
            ));
        }
        for code in &currency.offered {
            if code != &currency.reference && !currency.fallback_rates.contains_key(code) {
                warnings.push(format!(
                    "no fallback rate for {code}; it will pass through at 1.0 when rates are unavailable"
                ));
            }
        }
        warnings
    }
}
