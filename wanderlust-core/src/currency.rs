//! Price conversion into the visitor's chosen display currency.

pub mod display;
pub mod format;
pub mod rates;
pub mod selection;

pub use display::{CurrencyDisplay, PriceTag, PricedElement};
pub use format::AmountFormatter;
pub use rates::RateService;
pub use selection::{FileSelectionStore, MemorySelectionStore, SELECTION_KEY, SelectionStore};
