//! Native currency amounts.
//!
//! Amounts are fixed-point integers counted in Na, the smallest unit.
//! One coin is 10^8 Na. Arithmetic never goes through floating point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::TypesError;

/// Number of Na in one coin.
pub const NA_PER_COIN: u64 = 100_000_000;

/// Number of fractional digits a coin amount may carry.
const COIN_DECIMALS: usize = 8;

/// An amount of the native currency in Na.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Na(u64);

impl Na {
    pub const ZERO: Self = Self(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Whole coins expressed in Na. Returns `None` on overflow.
    pub fn from_coins(coins: u64) -> Option<Self> {
        coins.checked_mul(NA_PER_COIN).map(Self)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Integer division by a non-zero divisor. A zero divisor yields zero.
    pub fn div(self, divisor: u64) -> Self {
        match divisor {
            0 => Self::ZERO,
            d => Self(self.0 / d),
        }
    }

    /// Parse a decimal coin amount such as `"12.5"` into Na.
    ///
    /// Rejects signs, empty input, more than eight fractional digits and
    /// values that do not fit in a `u64`.
    pub fn parse_coins(input: &str) -> Result<Self, TypesError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(TypesError::InvalidAmount("empty amount".into()));
        }
        let (whole, fraction) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(TypesError::InvalidAmount(input.to_string()));
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) {
            return Err(TypesError::InvalidAmount(input.to_string()));
        }
        if fraction.len() > COIN_DECIMALS {
            return Err(TypesError::InvalidAmount(format!(
                "{input}: more than {COIN_DECIMALS} fractional digits"
            )));
        }

        let whole_value: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| TypesError::AmountOverflow)?
        };
        let mut fraction_value: u64 = 0;
        for (i, b) in fraction.bytes().enumerate() {
            let scale = 10u64.pow((COIN_DECIMALS - 1 - i) as u32);
            fraction_value += u64::from(b - b'0') * scale;
        }

        whole_value
            .checked_mul(NA_PER_COIN)
            .and_then(|na| na.checked_add(fraction_value))
            .map(Self)
            .ok_or(TypesError::AmountOverflow)
    }
}

impl Add for Na {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Na {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl FromStr for Na {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_coins(s)
    }
}

impl fmt::Display for Na {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:08}",
            self.0 / NA_PER_COIN,
            self.0 % NA_PER_COIN
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_coins() {
        assert_eq!(Na::parse_coins("3").unwrap(), Na::new(300_000_000));
    }

    #[test]
    fn parse_fractional_coins() {
        assert_eq!(Na::parse_coins("12.5").unwrap(), Na::new(1_250_000_000));
        assert_eq!(Na::parse_coins("0.00000001").unwrap(), Na::new(1));
        assert_eq!(Na::parse_coins(".5").unwrap(), Na::new(50_000_000));
    }

    #[test]
    fn parse_rejects_negative_and_garbage() {
        assert!(Na::parse_coins("-1").is_err());
        assert!(Na::parse_coins("").is_err());
        assert!(Na::parse_coins(".").is_err());
        assert!(Na::parse_coins("1.2.3").is_err());
        assert!(Na::parse_coins("abc").is_err());
    }

    #[test]
    fn parse_rejects_excess_precision() {
        assert!(Na::parse_coins("0.000000001").is_err());
    }

    #[test]
    fn parse_rejects_overflow() {
        assert_eq!(
            Na::parse_coins("184467440738").unwrap_err(),
            TypesError::AmountOverflow
        );
    }

    #[test]
    fn display_pads_fraction() {
        assert_eq!(Na::new(150_000_001).to_string(), "1.50000001");
    }

    #[test]
    fn div_by_zero_is_zero() {
        assert_eq!(Na::new(10).div(0), Na::ZERO);
        assert_eq!(Na::new(10).div(3), Na::new(3));
    }
}
