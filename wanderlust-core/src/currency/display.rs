use crate::model::CurrencyRateTable;

use super::{
    format::AmountFormatter,
    rates::RateService,
    selection::{SELECTION_KEY, SelectionStore},
};

/// Anything on the page showing a price stored in the reference currency.
pub trait PricedElement {
    /// Raw base-price attribute, if the element carries one.
    fn base_price(&self) -> Option<&str>;
    fn set_text(&mut self, text: String);
}

/// Plain priced element for callers without a richer view model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTag {
    pub base_price: Option<String>,
    pub text: String,
}

impl PriceTag {
    pub fn new(base_price: impl Into<String>) -> Self {
        Self { base_price: Some(base_price.into()), text: String::new() }
    }

    pub fn from_amount(amount: f64) -> Self {
        Self::new(amount.to_string())
    }
}

impl PricedElement for PriceTag {
    fn base_price(&self) -> Option<&str> {
        self.base_price.as_deref()
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }
}

/// Converts every priced element into the selected display currency.
pub struct CurrencyDisplay<S> {
    rates: RateService,
    formatter: AmountFormatter,
    store: S,
    selected: String,
}

impl<S: SelectionStore> CurrencyDisplay<S> {
    /// Restores the persisted choice when it is still on offer, else the reference currency.
    pub fn new(rates: RateService, formatter: AmountFormatter, store: S) -> Self {
        let settings = rates.settings();
        let selected = match store.get(SELECTION_KEY) {
            Some(saved) if settings.is_offered(&saved) => saved,
            Some(saved) => {
                tracing::debug!(saved = %saved, "persisted currency no longer offered");
                settings.reference.clone()
            }
            None => settings.reference.clone(),
        };

        Self { rates, formatter, store, selected }
    }

    /// Restores the selection and runs the first conversion pass.
    pub async fn init<E: PricedElement>(
        rates: RateService,
        formatter: AmountFormatter,
        store: S,
        elements: &mut [E],
    ) -> Self {
        let display = Self::new(rates, formatter, store);
        display.apply(elements).await;
        display
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn offered(&self) -> &[String] {
        &self.rates.settings().offered
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetches rates once and rewrites every element.
    pub async fn apply<E: PricedElement>(&self, elements: &mut [E]) -> CurrencyRateTable {
        let table = self.rates.fetch_rates().await;
        self.render(&table, elements);
        table
    }

    /// Rewrites every element from an already fetched table.
    pub fn render<E: PricedElement>(&self, table: &CurrencyRateTable, elements: &mut [E]) {
        for element in elements.iter_mut() {
            let amount = parse_base_price(element.base_price());
            element.set_text(self.price_text(table, amount));
        }
    }

    /// Display string for one base amount, unit suffix included.
    pub fn price_text(&self, table: &CurrencyRateTable, base_amount: f64) -> String {
        let converted = base_amount * table.rate_or_identity(&self.selected);
        format!(
            "{}{}",
            self.formatter.format(converted, &self.selected),
            self.rates.settings().unit_suffix
        )
    }

    /// Remembers `code` and converts everything again.
    pub async fn select<E: PricedElement>(
        &mut self,
        code: &str,
        elements: &mut [E],
    ) -> CurrencyRateTable {
        if let Err(error) = self.store.set(SELECTION_KEY, code) {
            tracing::warn!(code, error = %format!("{error:#}"), "could not persist currency choice");
        }
        self.selected = code.to_string();
        self.apply(elements).await
    }
}

/// Missing or unparseable prices count as zero.
pub fn parse_base_price(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }
    match raw.parse::<f64>() {
        Ok(amount) if amount.is_finite() => amount,
        _ => {
            tracing::warn!(raw, "unparseable base price; treating as 0");
            0.0
        }
    }
}
