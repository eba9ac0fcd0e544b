//! Number formatting.
//!
//! Values are rounded to a number of significant digits, printed without
//! scientific notation, and marked with `≈` when rounding lost information.
//! Rounding is done on `rust_decimal::Decimal`; values outside its range go
//! through the float formatter instead.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Number;

/// Precision used when a caller has no specific requirement.
pub const DEFAULT_PRECISION: usize = 4;

/// Formats numeric values for display.
pub trait NumberFormatter: Send + Sync {
    /// Format `value` to `precision` significant digits, grouping the
    /// integer digits when `use_locale` is set.
    fn format(&self, value: f64, precision: usize, use_locale: bool) -> String;

    /// Format a JSON number. Implementations should keep integers exact.
    fn format_json(&self, value: &Number, precision: usize, use_locale: bool) -> String {
        self.format(value.as_f64().unwrap_or(f64::NAN), precision, use_locale)
    }
}

/// Default formatter with configurable separators.
#[derive(Debug, Clone)]
pub struct DecimalFormatter {
    grouping_separator: char,
    decimal_separator: char,
}

impl DecimalFormatter {
    pub fn new() -> Self {
        Self {
            grouping_separator: ',',
            decimal_separator: '.',
        }
    }

    /// Use locale-specific separators (e.g. `'.'` and `','` for de-DE).
    pub fn with_separators(grouping_separator: char, decimal_separator: char) -> Self {
        Self {
            grouping_separator,
            decimal_separator,
        }
    }

    fn group(&self, digits: &str) -> String {
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.grouping_separator);
            }
            grouped.push(ch);
        }
        grouped
    }

    fn format_decimal(&self, value: Decimal, precision: usize, use_locale: bool) -> Option<String> {
        let value = value.normalize();
        let digits = u32::try_from(precision.max(1)).unwrap_or(u32::MAX);
        let rounded = value
            .round_sf_with_strategy(digits, RoundingStrategy::MidpointNearestEven)?
            .normalize();

        let text = rounded.abs().to_string();
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
        Some(self.assemble(
            Parts {
                approximate: rounded != value,
                negative: rounded.is_sign_negative() && !rounded.is_zero(),
                int_part,
                frac_part,
            },
            use_locale,
        ))
    }

    /// Positional rendering of a float `Decimal` cannot hold.
    fn format_float(&self, value: f64, precision: usize, use_locale: bool) -> String {
        let sci = format!("{:.*e}", precision.max(1) - 1, value);
        let approximate = sci.parse::<f64>().map_or(true, |parsed| parsed != value);

        let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
        let exponent: i64 = exponent.parse().unwrap_or(0);
        let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
        let digits = match digits.trim_end_matches('0') {
            "" => "0",
            trimmed => trimmed,
        };

        let (int_part, frac_part) = if exponent >= 0 {
            let int_len = exponent as usize + 1;
            if digits.len() > int_len {
                (digits[..int_len].to_string(), digits[int_len..].to_string())
            } else {
                (format!("{digits:0<int_len$}"), String::new())
            }
        } else {
            let leading = "0".repeat(exponent.unsigned_abs() as usize - 1);
            ("0".to_string(), format!("{leading}{digits}"))
        };

        self.assemble(
            Parts {
                approximate,
                negative: mantissa.starts_with('-'),
                int_part: &int_part,
                frac_part: &frac_part,
            },
            use_locale,
        )
    }

    fn assemble(&self, parts: Parts<'_>, use_locale: bool) -> String {
        let mut text = String::new();
        if parts.approximate {
            text.push('≈');
        }
        if parts.negative {
            text.push('-');
        }
        if use_locale {
            text.push_str(&self.group(parts.int_part));
        } else {
            text.push_str(parts.int_part);
        }
        if !parts.frac_part.is_empty() {
            text.push(self.decimal_separator);
            text.push_str(parts.frac_part);
        }
        text
    }
}

struct Parts<'a> {
    approximate: bool,
    negative: bool,
    int_part: &'a str,
    frac_part: &'a str,
}

impl Default for DecimalFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberFormatter for DecimalFormatter {
    fn format(&self, value: f64, precision: usize, use_locale: bool) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "inf" } else { "-inf" }.to_string();
        }
        if value == 0.0 {
            return "0".to_string();
        }

        // Shortest round-trip text, so 0.1 is 0.1 and not its binary expansion.
        Decimal::from_scientific(&format!("{:e}", value))
            .ok()
            .filter(|decimal| !decimal.is_zero())
            .and_then(|decimal| self.format_decimal(decimal, precision, use_locale))
            .unwrap_or_else(|| self.format_float(value, precision, use_locale))
    }

    fn format_json(&self, value: &Number, precision: usize, use_locale: bool) -> String {
        let integer = value
            .as_i64()
            .map(Decimal::from)
            .or_else(|| value.as_u64().map(Decimal::from));

        match integer.and_then(|decimal| self.format_decimal(decimal, precision, use_locale)) {
            Some(text) => text,
            None => self.format(value.as_f64().unwrap_or(f64::NAN), precision, use_locale),
        }
    }
}
