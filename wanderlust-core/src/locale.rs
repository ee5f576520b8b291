//! Caller locale conventions used when rendering times and amounts.

use std::fmt;

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Locale {
    #[default]
    EnUs,
    EnGb,
    EnIn,
    DeDe,
    FrFr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// 1,234,567
    Thousands,
    /// 12,34,567
    Indian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    /// `$12.00`
    Prefix,
    /// `12,00 €`, separated by a no-break space.
    Suffix,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::EnGb => "en-GB",
            Locale::EnIn => "en-IN",
            Locale::DeDe => "de-DE",
            Locale::FrFr => "fr-FR",
        }
    }

    pub const fn all() -> &'static [Locale] {
        &[Locale::EnUs, Locale::EnGb, Locale::EnIn, Locale::DeDe, Locale::FrFr]
    }

    /// Parses tags such as `en-US`, `en_IN.UTF-8` or `de_DE@euro`.
    ///
    /// `C` and `POSIX` map to `en-US`. Unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Locale> {
        let tag = tag.trim();
        let tag = tag.split(['.', '@']).next().unwrap_or_default();
        if tag.eq_ignore_ascii_case("C") || tag.eq_ignore_ascii_case("POSIX") {
            return Some(Locale::EnUs);
        }

        let normalized = tag.replace('_', "-").to_ascii_lowercase();
        match normalized.as_str() {
            "en-us" | "en" => Some(Locale::EnUs),
            "en-gb" => Some(Locale::EnGb),
            "en-in" | "hi-in" => Some(Locale::EnIn),
            "de-de" | "de" => Some(Locale::DeDe),
            "fr-fr" | "fr" => Some(Locale::FrFr),
            _ => None,
        }
    }

    pub fn decimal_mark(&self) -> char {
        match self {
            Locale::EnUs | Locale::EnGb | Locale::EnIn => '.',
            Locale::DeDe | Locale::FrFr => ',',
        }
    }

    pub fn group_separator(&self) -> char {
        match self {
            Locale::EnUs | Locale::EnGb | Locale::EnIn => ',',
            Locale::DeDe => '.',
            Locale::FrFr => '\u{202F}',
        }
    }

    pub fn grouping(&self) -> Grouping {
        match self {
            Locale::EnIn => Grouping::Indian,
            _ => Grouping::Thousands,
        }
    }

    pub fn symbol_position(&self) -> SymbolPosition {
        match self {
            Locale::EnUs | Locale::EnGb | Locale::EnIn => SymbolPosition::Prefix,
            Locale::DeDe | Locale::FrFr => SymbolPosition::Suffix,
        }
    }

    /// Renders a wall-clock time of day the way this locale shows it.
    pub fn format_time<Tz>(&self, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self {
            Locale::EnUs => at.format("%-I:%M:%S %p").to_string(),
            Locale::EnIn => at.format("%-I:%M:%S %P").to_string(),
            Locale::EnGb | Locale::DeDe | Locale::FrFr => at.format("%H:%M:%S").to_string(),
        }
    }

    /// Converts epoch seconds into a localized time of day at `offset`.
    pub fn format_epoch_time(&self, epoch_secs: i64, offset: FixedOffset) -> Option<String> {
        let at = DateTime::from_timestamp(epoch_secs, 0)?.with_timezone(&offset);
        Some(self.format_time(&at))
    }

    /// Inserts group separators into a string of ASCII digits.
    pub fn group_digits(&self, digits: &str) -> String {
        let sep = self.group_separator();
        let len = digits.len();
        let mut out = String::with_capacity(len + len / 2);

        for (i, ch) in digits.chars().enumerate() {
            let remaining = len - i;
            if i > 0 && self.separator_before(remaining) {
                out.push(sep);
            }
            out.push(ch);
        }
        out
    }

    fn separator_before(&self, remaining: usize) -> bool {
        match self.grouping() {
            Grouping::Thousands => remaining % 3 == 0,
            Grouping::Indian => remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Locale {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Locale::parse(&value).ok_or_else(|| {
            anyhow::anyhow!(
                "Unsupported locale '{value}'. Supported locales: en-US, en-GB, en-IN, de-DE, fr-FR."
            )
        })
    }
}

impl From<Locale> for String {
    fn from(value: Locale) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_as_str_roundtrip() {
        for locale in Locale::all() {
            assert_eq!(Locale::parse(locale.as_str()), Some(*locale));
        }
    }

    #[test]
    fn parses_posix_style_tags() {
        assert_eq!(Locale::parse("en_IN.UTF-8"), Some(Locale::EnIn));
        assert_eq!(Locale::parse("de_DE@euro"), Some(Locale::DeDe));
        assert_eq!(Locale::parse("C"), Some(Locale::EnUs));
        assert_eq!(Locale::parse("sw_KE"), None);
    }

    #[test]
    fn unsupported_locale_error() {
        let err = Locale::try_from("xx-YY".to_string()).unwrap_err();
        assert!(err.to_string().contains("Unsupported locale"));
    }

    #[test]
    fn thousands_grouping() {
        let l = Locale::EnUs;
        assert_eq!(l.group_digits("0"), "0");
        assert_eq!(l.group_digits("999"), "999");
        assert_eq!(l.group_digits("1000"), "1,000");
        assert_eq!(l.group_digits("1234567"), "1,234,567");
    }

    #[test]
    fn indian_grouping() {
        let l = Locale::EnIn;
        assert_eq!(l.group_digits("1000"), "1,000");
        assert_eq!(l.group_digits("100000"), "1,00,000");
        assert_eq!(l.group_digits("12345678"), "1,23,45,678");
    }

    #[test]
    fn german_grouping_uses_dots() {
        assert_eq!(Locale::DeDe.group_digits("1234567"), "1.234.567");
    }

    #[test]
    fn time_styles() {
        let utc = FixedOffset::east_opt(0).unwrap();
        // 2024-01-01T06:04:05Z
        let ts = 1_704_089_045;
        assert_eq!(Locale::EnUs.format_epoch_time(ts, utc).unwrap(), "6:04:05 AM");
        assert_eq!(Locale::EnIn.format_epoch_time(ts, utc).unwrap(), "6:04:05 am");
        assert_eq!(Locale::EnGb.format_epoch_time(ts, utc).unwrap(), "06:04:05");
    }

    #[test]
    fn time_respects_offset() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        // 2024-01-01T06:04:05Z is 11:34:05 in IST
        assert_eq!(Locale::DeDe.format_epoch_time(1_704_089_045, ist).unwrap(), "11:34:05");
    }
}
