//! Locale-aware currency formatting for display. Formatting never feeds back
//! into calculated values.

use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    EnUs,
    EnGb,
    RoRo,
    DeDe,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported locale `{0}` (expected one of en-US, en-GB, ro-RO, de-DE)")]
pub struct ParseLocaleError(pub String);

impl FromStr for Locale {
    type Err = ParseLocaleError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "en-us" | "en" => Ok(Locale::EnUs),
            "en-gb" => Ok(Locale::EnGb),
            "ro-ro" | "ro" => Ok(Locale::RoRo),
            "de-de" | "de" => Ok(Locale::DeDe),
            _ => Err(ParseLocaleError(input.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Locale::EnUs => "en-US",
            Locale::EnGb => "en-GB",
            Locale::RoRo => "ro-RO",
            Locale::DeDe => "de-DE",
        })
    }
}

struct NumberStyle {
    group: char,
    decimal: char,
    symbol_first: bool,
}

impl Locale {
    fn style(&self) -> NumberStyle {
        match self {
            Locale::EnUs | Locale::EnGb => NumberStyle {
                group: ',',
                decimal: '.',
                symbol_first: true,
            },
            Locale::RoRo | Locale::DeDe => NumberStyle {
                group: '.',
                decimal: ',',
                symbol_first: false,
            },
        }
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        _ => None,
    }
}

/// Formats `amount` with two decimals, e.g. `$1,000.50` (en-US, USD) or
/// `1.000,50 RON` (ro-RO, RON). Unknown currency codes are shown as the code.
pub fn format_currency(amount: f64, locale: Locale, currency_code: &str) -> String {
    let code = currency_code.trim().to_ascii_uppercase();
    let style = locale.style();

    let cents = format!("{:.2}", amount.abs());
    let (whole, fraction) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let negative = amount < 0.0 && cents.bytes().any(|b| b.is_ascii_digit() && b != b'0');

    let mut number = group_digits(whole, style.group);
    number.push(style.decimal);
    number.push_str(fraction);

    let sign = if negative { "-" } else { "" };
    match (style.symbol_first, currency_symbol(&code)) {
        (true, Some(symbol)) => format!("{sign}{symbol}{number}"),
        (true, None) => format!("{sign}{code} {number}"),
        (false, symbol) => format!("{sign}{number} {}", symbol.unwrap_or(code.as_str())),
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn us_dollars() {
        assert_eq!(format_currency(12.34, Locale::EnUs, "USD"), "$12.34");
        assert_eq!(format_currency(0.0, Locale::EnUs, "USD"), "$0.00");
        assert_eq!(format_currency(1000.5, Locale::EnUs, "USD"), "$1,000.50");
        assert_eq!(format_currency(1_234_567.891, Locale::EnUs, "usd"), "$1,234,567.89");
    }

    #[test]
    fn suffix_locales() {
        assert_eq!(format_currency(70.275, Locale::RoRo, "RON"), "70,28 RON");
        assert_eq!(format_currency(70.265625, Locale::RoRo, "RON"), "70,27 RON");
        assert_eq!(format_currency(1000.5, Locale::RoRo, "RON"), "1.000,50 RON");
        assert_eq!(format_currency(99.999, Locale::DeDe, "EUR"), "100,00 €");
    }

    #[test]
    fn unknown_codes_in_prefix_locales() {
        assert_eq!(format_currency(12.34, Locale::EnGb, "RON"), "RON 12.34");
        assert_eq!(format_currency(5.0, Locale::EnGb, "GBP"), "£5.00");
    }

    #[test]
    fn negative_amounts() {
        assert_eq!(format_currency(-11.7125, Locale::EnUs, "USD"), "-$11.71");
        assert_eq!(format_currency(-3.5, Locale::DeDe, "EUR"), "-3,50 €");
        assert_eq!(format_currency(-0.001, Locale::EnUs, "USD"), "$0.00");
    }

    #[test]
    fn locale_tags_parse() {
        assert_eq!("en-US".parse(), Ok(Locale::EnUs));
        assert_eq!("ro_RO".parse(), Ok(Locale::RoRo));
        assert_eq!("de".parse(), Ok(Locale::DeDe));
        assert!("xx-YY".parse::<Locale>().is_err());
    }
}
