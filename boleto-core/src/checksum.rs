//! Weighted modulo-11 check digits
//!
//! Weights run from the rightmost digit starting at `factor`, increase by one
//! and wrap back to 2 after `base`. The digit is `(sum * 10) mod 11`; a
//! result of 10 maps to `remainder_10`.

use crate::{Error, Result};

/// Parameters of the modulo-11 primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modulo11 {
    /// Weight applied to the rightmost digit
    pub factor: u32,
    /// Largest weight before wrapping back to 2
    pub base: u32,
    /// Digit used when the computation yields 10
    pub remainder_10: u8,
}

impl Default for Modulo11 {
    fn default() -> Self {
        Self {
            factor: 2,
            base: 9,
            remainder_10: 0,
        }
    }
}

impl Modulo11 {
    fn fold(&self, digits: &str, mut step: impl FnMut(u64, u64) -> Result<u64>) -> Result<u64> {
        let mut acc = 0u64;
        let mut factor = u64::from(self.factor);
        for c in digits.chars().rev() {
            let d = c.to_digit(10).ok_or_else(|| {
                Error::InvalidArgument(format!("non-digit '{}' in checksum input", c))
            })?;
            acc = step(acc, u64::from(d) * factor)?;
            if factor == u64::from(self.base) {
                factor = 1;
            }
            factor += 1;
        }
        Ok(acc)
    }

    /// Weighted sum of `digits`
    pub fn weighted_sum(&self, digits: &str) -> Result<u64> {
        self.fold(digits, |sum, term| {
            sum.checked_add(term).ok_or(Error::OutOfRange {
                field: "weighted sum",
                value: sum,
                max: u64::MAX,
            })
        })
    }

    /// Check digit for `digits`; the sum is reduced mod 11 as it accumulates
    pub fn digit(&self, digits: &str) -> Result<u8> {
        let residue = self.fold(digits, |acc, term| Ok((acc + term % 11) % 11))?;
        let digit = (residue * 10) % 11;
        if digit == 10 {
            Ok(self.remainder_10)
        } else {
            Ok(digit as u8)
        }
    }
}

/// Check digit with the default weights (2..=9, 10 maps to 0)
pub fn modulo11(digits: &str) -> Result<u8> {
    Modulo11::default().digit(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_sum_cycles_weights() {
        // weights from the right: 2,3,4,5,6,7,8,9,2
        assert_eq!(Modulo11::default().weighted_sum("111111111").unwrap(), 46);
    }

    #[test]
    fn test_known_digits() {
        assert_eq!(modulo11("0716021234523200001").unwrap(), 0);
        assert_eq!(modulo11("112320000100716021234510").unwrap(), 6);
    }

    #[test]
    fn test_remainder_10_mapping() {
        // sum = 5 * 2 = 10, (10 * 10) % 11 = 1
        assert_eq!(modulo11("5").unwrap(), 1);
        // sum = 1 * 2 = 2, (2 * 10) % 11 = 9
        assert_eq!(modulo11("1").unwrap(), 9);
        // sum = 6 * 2 = 12, (12 * 10) % 11 = 10 -> remainder_10
        assert_eq!(modulo11("6").unwrap(), 0);
        let custom = Modulo11 {
            remainder_10: 1,
            ..Modulo11::default()
        };
        assert_eq!(custom.digit("6").unwrap(), 1);
    }

    #[test]
    fn test_long_input_does_not_overflow() {
        // ten million nines: sum * 10 no longer fits in a u32
        let digits = "9".repeat(10_000_000);
        let sum = Modulo11::default().weighted_sum(&digits).unwrap();
        assert!(sum * 10 > u64::from(u32::MAX));
        let expected = ((sum % 11) * 10 % 11) as u8;
        let expected = if expected == 10 { 0 } else { expected };
        assert_eq!(modulo11(&digits).unwrap(), expected);

        let wide = Modulo11 {
            factor: u32::MAX,
            base: u32::MAX,
            remainder_10: 0,
        };
        assert!(wide.digit(&digits).unwrap() <= 9);
    }

    #[test]
    fn test_rejects_non_digits() {
        let err = modulo11("12a4").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidArgument);
    }
}
