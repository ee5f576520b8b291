use crate::{
    config::CurrencySettings,
    model::CurrencyRateTable,
    provider::{RateProvider, RateQuote},
};

/// Fetches exchange rates for the offered currencies.
///
/// Always produces a complete table: whatever the provider cannot supply is
/// taken from the configured fallback rates.
#[derive(Debug)]
pub struct RateService {
    provider: Box<dyn RateProvider>,
    settings: CurrencySettings,
}

impl RateService {
    pub fn new(provider: Box<dyn RateProvider>, settings: CurrencySettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &CurrencySettings {
        &self.settings
    }

    pub async fn fetch_rates(&self) -> CurrencyRateTable {
        match self.provider.latest(&self.settings.reference).await {
            Ok(quote) => table_from_quote(&quote, &self.settings),
            Err(error) => {
                tracing::warn!(
                    base = %self.settings.reference,
                    error = %error,
                    "rate lookup failed; using fallback rates"
                );
                self.settings.fallback_table()
            }
        }
    }
}

/// Keeps the provider's rate for each offered code, defaulting one code at a
/// time when the provider omitted it or reported something unusable.
pub fn table_from_quote(quote: &RateQuote, settings: &CurrencySettings) -> CurrencyRateTable {
    let mut table = CurrencyRateTable::new(&settings.reference);

    for code in &settings.offered {
        if *code == settings.reference {
            continue;
        }
        let rate = match quote.rates.get(code) {
            Some(rate) if rate.is_finite() && *rate > 0.0 => *rate,
            other => {
                tracing::debug!(code = %code, reported = ?other, "no usable rate; using fallback");
                settings.fallback_rate(code)
            }
        };
        table = table.with_rate(code.clone(), rate);
    }

    table
}
