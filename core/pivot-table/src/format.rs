//! FILENAME: core/pivot-table/src/format.rs
//! Display formatting of aggregate results.
//!
//! Aggregation stays in f64; formatting only happens when a result is
//! presented (`PivotCell::formatted_result`, the table view).

use serde::{Deserialize, Serialize};

/// How an aggregate result is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NumberFormat {
    #[default]
    General,
    Number {
        decimal_places: u8,
        use_thousands_separator: bool,
    },
    /// Number with explicit separators, e.g. `1.234,56`.
    Localized {
        decimal_places: u8,
        decimal_separator: char,
        thousands_separator: char,
    },
    Currency {
        decimal_places: u8,
        symbol: String,
        symbol_position: CurrencyPosition,
    },
    Percentage {
        decimal_places: u8,
    },
    /// Pattern such as `#,##0.00`.
    Custom {
        pattern: String,
    },
}

/// Position of the currency symbol relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyPosition {
    #[default]
    Before,
    After,
}

/// Formats `value` according to `format`.
pub fn format_number(value: f64, format: &NumberFormat) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    match format {
        NumberFormat::General => format_general(value),
        NumberFormat::Number {
            decimal_places,
            use_thousands_separator,
        } => {
            let separator = if *use_thousands_separator { Some(',') } else { None };
            format_grouped(value, *decimal_places, '.', separator)
        }
        NumberFormat::Localized {
            decimal_places,
            decimal_separator,
            thousands_separator,
        } => format_grouped(value, *decimal_places, *decimal_separator, Some(*thousands_separator)),
        NumberFormat::Currency {
            decimal_places,
            symbol,
            symbol_position,
        } => format_currency(value, *decimal_places, symbol, *symbol_position),
        NumberFormat::Percentage { decimal_places } => {
            format!("{:.prec$}%", value * 100.0, prec = *decimal_places as usize)
        }
        NumberFormat::Custom { pattern } => format_pattern(value, pattern),
    }
}

fn format_general(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{:.0}", value);
    }
    let formatted = format!("{:.10}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Rounds to `decimal_places`, then inserts the separators.
fn format_grouped(
    value: f64,
    decimal_places: u8,
    decimal_separator: char,
    thousands_separator: Option<char>,
) -> String {
    let rounded = format!("{:.prec$}", value.abs(), prec = decimal_places as usize);
    let (integer_part, fraction_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rounded.as_str(), None),
    };

    let mut result = String::with_capacity(rounded.len() + integer_part.len() / 3 + 1);
    let is_zero = rounded.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        result.push('-');
    }

    let len = integer_part.len();
    for (i, c) in integer_part.chars().enumerate() {
        if let Some(sep) = thousands_separator {
            if i > 0 && (len - i) % 3 == 0 {
                result.push(sep);
            }
        }
        result.push(c);
    }

    if let Some(fraction) = fraction_part {
        result.push(decimal_separator);
        result.push_str(fraction);
    }
    result
}

fn format_currency(
    value: f64,
    decimal_places: u8,
    symbol: &str,
    position: CurrencyPosition,
) -> String {
    let amount = format_grouped(value.abs(), decimal_places, '.', Some(','));
    let with_symbol = match position {
        CurrencyPosition::Before => format!("{}{}", symbol, amount),
        CurrencyPosition::After => format!("{}{}", amount, symbol),
    };
    if value < 0.0 {
        format!("({})", with_symbol)
    } else {
        with_symbol
    }
}

/// Reads decimals and grouping from a `#,##0.00`-style pattern.
fn format_pattern(value: f64, pattern: &str) -> String {
    let decimal_places = pattern
        .find('.')
        .map(|dot| {
            pattern[dot + 1..]
                .chars()
                .take_while(|c| *c == '0' || *c == '#')
                .count() as u8
        })
        .unwrap_or(0);
    let separator = if pattern.contains(',') { Some(',') } else { None };
    format_grouped(value, decimal_places, '.', separator)
}

/// Ready-made formats.
pub mod presets {
    use super::*;

    pub fn number(decimal_places: u8) -> NumberFormat {
        NumberFormat::Number {
            decimal_places,
            use_thousands_separator: true,
        }
    }

    /// `1.234,56`
    pub fn continental(decimal_places: u8) -> NumberFormat {
        NumberFormat::Localized {
            decimal_places,
            decimal_separator: ',',
            thousands_separator: '.',
        }
    }

    pub fn currency_eur(decimal_places: u8) -> NumberFormat {
        NumberFormat::Currency {
            decimal_places,
            symbol: " EUR".to_string(),
            symbol_position: CurrencyPosition::After,
        }
    }

    pub fn currency_usd(decimal_places: u8) -> NumberFormat {
        NumberFormat::Currency {
            decimal_places,
            symbol: "$".to_string(),
            symbol_position: CurrencyPosition::Before,
        }
    }

    pub fn percentage(decimal_places: u8) -> NumberFormat {
        NumberFormat::Percentage { decimal_places }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_general() {
        assert_eq!(format_number(0.0, &NumberFormat::General), "0");
        assert_eq!(format_number(150.0, &NumberFormat::General), "150");
        assert_eq!(format_number(3.14159, &NumberFormat::General), "3.14159");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_number(1234.567, &presets::number(2)), "1,234.57");
        assert_eq!(format_number(-1000000.0, &presets::number(0)), "-1,000,000");
        assert_eq!(format_number(1234.567, &presets::continental(2)), "1.234,57");
        assert_eq!(format_number(-0.001, &presets::number(2)), "0.00");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_number(1234.5, &presets::currency_usd(2)), "$1,234.50");
        assert_eq!(format_number(-12.0, &presets::currency_usd(0)), "($12)");
        assert_eq!(format_number(99.0, &presets::currency_eur(2)), "99.00 EUR");
    }

    #[test]
    fn test_format_percentage_and_pattern() {
        assert_eq!(format_number(0.125, &presets::percentage(1)), "12.5%");
        let pattern = NumberFormat::Custom {
            pattern: "#,##0.0".to_string(),
        };
        assert_eq!(format_number(98765.43, &pattern), "98,765.4");
    }
}
