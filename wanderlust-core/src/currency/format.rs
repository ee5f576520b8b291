//! Locale-aware currency formatting with a plain symbol-and-number fallback.

use crate::{
    error::FormatError,
    locale::{Locale, SymbolPosition},
};

const NBSP: char = '\u{00A0}';

/// ISO 4217 codes with locale data: (code, symbol, minor digits).
const CURRENCIES: &[(&str, &str, u8)] = &[
    ("AUD", "A$", 2),
    ("CAD", "CA$", 2),
    ("CHF", "CHF", 2),
    ("CNY", "CN¥", 2),
    ("EUR", "€", 2),
    ("GBP", "£", 2),
    ("INR", "₹", 2),
    ("JPY", "¥", 0),
    ("THB", "THB", 2),
    ("USD", "$", 2),
];

/// Symbols a locale writes differently from the table above.
const LOCALE_SYMBOLS: &[(Locale, &str, &str)] = &[
    (Locale::EnGb, "JPY", "JP¥"),
    (Locale::EnGb, "USD", "US$"),
    (Locale::EnIn, "JPY", "JP¥"),
    (Locale::DeDe, "AUD", "AU$"),
    (Locale::DeDe, "THB", "฿"),
    (Locale::FrFr, "AUD", "$AU"),
    (Locale::FrFr, "CAD", "$CA"),
    (Locale::FrFr, "CNY", "CNY"),
    (Locale::FrFr, "GBP", "£GB"),
    (Locale::FrFr, "JPY", "JPY"),
    (Locale::FrFr, "USD", "$US"),
];

/// Symbols used when locale-aware formatting is not possible.
const FALLBACK_SYMBOLS: &[(&str, &str)] = &[("INR", "₹"), ("USD", "$"), ("EUR", "€")];

/// Formats amounts for one caller locale. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmountFormatter {
    locale: Locale,
}

impl AmountFormatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Locale-aware rendering, or `"<symbol> <amount:.2>"` when that is unsupported.
    pub fn format(&self, amount: f64, code: &str) -> String {
        self.try_format(amount, code).unwrap_or_else(|error| {
            tracing::debug!(code, error = %error, "falling back to plain currency formatting");
            fallback_format(amount, code)
        })
    }

    pub fn try_format(&self, amount: f64, code: &str) -> Result<String, FormatError> {
        let code = normalize_code(code)?;
        let (symbol, digits) = lookup(&code).ok_or(FormatError::UnsupportedCurrency(code.clone()))?;
        if !amount.is_finite() {
            return Err(FormatError::NonFinite(amount));
        }

        let symbol = self.display_symbol(&code, symbol);
        let number = to_fixed(amount.abs(), digits);
        let negative = amount < 0.0 && number.bytes().any(|b| b.is_ascii_digit() && b != b'0');

        let (int_part, frac_part) = match number.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (number.as_str(), None),
        };
        let mut body = self.locale.group_digits(int_part);
        if let Some(frac) = frac_part {
            body.push(self.locale.decimal_mark());
            body.push_str(frac);
        }

        let sign = if negative { "-" } else { "" };
        Ok(match self.locale.symbol_position() {
            SymbolPosition::Prefix => {
                let gap = if symbol.ends_with(|c: char| c.is_alphabetic()) {
                    NBSP.to_string()
                } else {
                    String::new()
                };
                format!("{sign}{symbol}{gap}{body}")
            }
            SymbolPosition::Suffix => format!("{sign}{body}{NBSP}{symbol}"),
        })
    }

    fn display_symbol(&self, code: &str, symbol: &'static str) -> &'static str {
        LOCALE_SYMBOLS
            .iter()
            .find(|(locale, c, _)| *locale == self.locale && *c == code)
            .map_or(symbol, |(_, _, s)| *s)
    }
}

/// `"<symbol or empty> <amount to 2 decimals>"`.
pub fn fallback_format(amount: f64, code: &str) -> String {
    let symbol = fallback_symbol(code).unwrap_or_default();
    if !amount.is_finite() {
        return format!("{symbol} {amount}");
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{symbol} {sign}{}", to_fixed(amount.abs(), 2))
}

/// Renders a non-negative finite amount with `digits` decimals, rounding
/// ties away from zero.
fn to_fixed(amount: f64, digits: u8) -> String {
    let digits = usize::from(digits);
    let scaled = (amount * 10f64.powi(digits as i32)).round();
    if !scaled.is_finite() {
        return format!("{amount:.digits$}");
    }

    let raw = format!("{scaled:.0}");
    if digits == 0 {
        return raw;
    }
    let raw = format!("{raw:0>width$}", width = digits + 1);
    let (int_part, frac_part) = raw.split_at(raw.len() - digits);
    format!("{int_part}.{frac_part}")
}

pub fn fallback_symbol(code: &str) -> Option<&'static str> {
    let code = code.trim();
    FALLBACK_SYMBOLS
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, s)| *s)
}

fn normalize_code(code: &str) -> Result<String, FormatError> {
    let trimmed = code.trim();
    if trimmed.len() != 3 || !trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(FormatError::InvalidCode(code.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

fn lookup(code: &str) -> Option<(&'static str, u8)> {
    CURRENCIES.iter().find(|(c, _, _)| *c == code).map(|(_, s, d)| (*s, *d))
}
