//! Fixed-width formatting helpers
//!
//! Every numeric slot of a boleto line is zero-left-padded to a declared
//! width. Display forms use `#` templates where each `#` takes the next digit.

use rust_decimal::{Decimal, RoundingStrategy};

/// Keep only ASCII digits
pub fn only_numbers(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Zero-left-pad the digits of `value` to `width`, keeping the leading
/// `width` digits when longer.
pub fn pad(value: &str, width: usize) -> String {
    let digits = only_numbers(value);
    let kept: String = digits.chars().take(width).collect();
    format!("{:0>width$}", kept, width = width)
}

/// Zero-left-pad a number to `width`
pub fn pad_number(value: u64, width: usize) -> String {
    pad(&value.to_string(), width)
}

/// Apply a `#` template to `digits`.
///
/// Placeholders left over once `digits` is exhausted are dropped along with
/// everything after them.
pub fn mask(digits: &str, pattern: &str) -> String {
    let mut source = digits.chars();
    let mut out = String::with_capacity(pattern.len());
    for slot in pattern.chars() {
        if slot == '#' {
            match source.next() {
                Some(c) => out.push(c),
                None => break,
            }
        } else {
            out.push(slot);
        }
    }
    out
}

/// Render an amount with two decimals and no grouping (`1234.50`)
pub fn amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// True when `value` is non-empty and made of ASCII digits only
pub fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
