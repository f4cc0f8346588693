//! Fixed-point amounts.
//!
//! An [`Amount`] is an integer number of atomic units together with the
//! number of decimal places it carries: 8 for NEO and GAS on the wire, the
//! declared precision for NEP-5 tokens. Decimal text is parsed exactly and
//! scaled with `round(value * 10^decimals)`, rounding half away from zero.
//! No floating point is involved, so parsing an already-rounded amount
//! yields the same units again.

use crate::constants::MAX_DECIMALS;
use crate::error::FormatError;
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount {
    units: u64,
    decimals: u8,
}

/// `10^exp`, or `None` if it overflows a u64.
pub fn pow10(exp: u32) -> Option<u64> {
    10u64.checked_pow(exp)
}

impl Amount {
    pub const fn from_units(units: u64, decimals: u8) -> Self {
        Self { units, decimals }
    }

    pub const fn zero(decimals: u8) -> Self {
        Self { units: 0, decimals }
    }

    pub fn units(&self) -> u64 {
        self.units
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.units == 0
    }

    /// True when there is no fractional part.
    pub fn is_integral(&self) -> bool {
        match pow10(self.decimals as u32) {
            Some(scale) => self.units % scale == 0,
            None => false,
        }
    }

    /// Add two amounts of the same precision.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        if self.decimals != other.decimals {
            return None;
        }
        Some(Amount::from_units(
            self.units.checked_add(other.units)?,
            self.decimals,
        ))
    }

    /// Subtract two amounts of the same precision.
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        if self.decimals != other.decimals {
            return None;
        }
        Some(Amount::from_units(
            self.units.checked_sub(other.units)?,
            self.decimals,
        ))
    }

    /// Parse decimal text (`"1.5"`, `".25"`, `"1e-8"`) into fixed-point units.
    ///
    /// Digits beyond `decimals` are rounded half away from zero. Negative
    /// values are rejected.
    pub fn parse(text: &str, decimals: u8) -> Result<Self, FormatError> {
        let err = |reason: &str| FormatError::InvalidAmount {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        if decimals > MAX_DECIMALS {
            return Err(err("precision too large"));
        }

        let trimmed = text.trim();
        if trimmed.starts_with('-') {
            return Err(err("negative amounts are not allowed"));
        }
        let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let (mantissa, exponent) = match trimmed.find(['e', 'E']) {
            Some(pos) => {
                let exp: i32 = trimmed[pos + 1..]
                    .parse()
                    .map_err(|_| err("malformed exponent"))?;
                (&trimmed[..pos], exp)
            }
            None => (trimmed, 0),
        };

        let (whole, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(err("no digits"));
        }
        if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(err("unexpected character"));
        }

        // value = digits * 10^(exponent - frac.len()); scale by 10^decimals.
        let mut digits = String::with_capacity(whole.len() + frac.len());
        digits.push_str(whole);
        digits.push_str(frac);
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(Amount::zero(decimals));
        }

        let shift = exponent as i64 - frac.len() as i64 + decimals as i64;
        let overflow = || err("amount too large");

        let units = if shift >= 0 {
            if digits.len() as i64 + shift > 20 {
                return Err(overflow());
            }
            let mut units = accumulate_digits(digits).ok_or_else(overflow)?;
            for _ in 0..shift {
                units = units.checked_mul(10).ok_or_else(overflow)?;
            }
            units
        } else {
            let cut = shift.unsigned_abs() as usize;
            let (kept, first_dropped) = if cut > digits.len() {
                ("", b'0')
            } else {
                let split = digits.len() - cut;
                (&digits[..split], digits.as_bytes()[split])
            };
            let mut units = accumulate_digits(kept).ok_or_else(overflow)?;
            if first_dropped >= b'5' {
                units = units.checked_add(1).ok_or_else(overflow)?;
            }
            units
        };

        Ok(Amount::from_units(units, decimals))
    }

    /// Re-express at a different precision, rounding half away from zero.
    pub fn rescale(self, decimals: u8) -> Result<Amount, FormatError> {
        Amount::parse(&self.to_string(), decimals)
    }
}

fn accumulate_digits(digits: &str) -> Option<u64> {
    digits.bytes().try_fold(0u64, |acc, b| {
        acc.checked_mul(10)?.checked_add((b - b'0') as u64)
    })
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.decimals == 0 {
            return write!(f, "{}", self.units);
        }
        let digits = format!("{:0>width$}", self.units, width = self.decimals as usize + 1);
        let (whole, frac) = digits.split_at(digits.len() - self.decimals as usize);
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            write!(f, "{}", whole)
        } else {
            write!(f, "{}.{}", whole, frac)
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Serde helper for fixed-8 amounts that arrive as JSON numbers or strings.
///
/// Use with `#[serde(deserialize_with = "o3_types::amount::fixed8")]`.
pub fn fixed8<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_any(AmountVisitor {
        decimals: crate::constants::FIXED8_DECIMALS,
    })
}

struct AmountVisitor {
    decimals: u8,
}

impl<'de> serde::de::Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as a number or string")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::parse(v, self.decimals).map_err(E::custom)
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Amount, E> {
        Amount::parse(&v.to_string(), self.decimals).map_err(E::custom)
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Amount, E> {
        Amount::parse(&v.to_string(), self.decimals).map_err(E::custom)
    }

    // Shortest round-trip rendering recovers the decimal text the node sent.
    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Amount, E> {
        if !v.is_finite() {
            return Err(E::custom("non-finite amount"));
        }
        Amount::parse(&v.to_string(), self.decimals).map_err(E::custom)
    }
}
