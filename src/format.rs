//! Formatting of monetary amounts and rates for display.
use crate::units::{Dimensionless, Money};

/// Suffixes for compact notation in ascending order, along with the power of ten they represent
const COMPACT_SUFFIXES: [(&str, i32); 5] = [("", 0), ("K", 3), ("M", 6), ("B", 9), ("T", 12)];

/// Format an amount of money in compact US dollar notation, e.g. `$1.23K` or `-$50M`.
///
/// At most two fraction digits are shown and trailing zeros are dropped.
pub fn format_currency(value: Money) -> String {
    let value = value.value();
    if !value.is_finite() {
        return format!("${value}");
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    let mut index = COMPACT_SUFFIXES
        .iter()
        .rposition(|(_, exponent)| magnitude >= 10f64.powi(*exponent))
        .unwrap_or(0);
    let mut scaled = scale_to_suffix(magnitude, index);

    // Rounding can carry into the next suffix, e.g. 999,999 is $1M rather than $1000K
    if scaled >= 1000.0 && index + 1 < COMPACT_SUFFIXES.len() {
        index += 1;
        scaled = scale_to_suffix(magnitude, index);
    }

    format!(
        "{sign}${}{}",
        trim_fraction(scaled),
        COMPACT_SUFFIXES[index].0
    )
}

/// Format a fraction as a percentage with one decimal place, e.g. `0.055` as `5.5%`
pub fn format_percent(value: Dimensionless) -> String {
    format!("{:.1}%", value.value() * 100.0)
}

/// Divide by the power of ten for the given suffix and round to two fraction digits
fn scale_to_suffix(magnitude: f64, index: usize) -> f64 {
    let scaled = magnitude / 10f64.powi(COMPACT_SUFFIXES[index].1);
    (scaled * 100.0).round() / 100.0
}

/// Print with up to two fraction digits, without trailing zeros
fn trim_fraction(value: f64) -> String {
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
