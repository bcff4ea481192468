//! Money type for representing rupee amounts.
//!
//! Uses paise-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

use crate::error::CommerceError;

/// Currency symbol used for every displayed amount.
pub const CURRENCY_SYMBOL: &str = "\u{20b9}";

const PAISE_PER_RUPEE: i64 = 100;

/// A rupee amount.
///
/// Stored in paise (1/100 rupee). Display rounding happens only in the
/// `display*` methods; the stored value is always exact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money {
    paise: i64,
}

impl Money {
    /// Zero rupees.
    pub const ZERO: Money = Money { paise: 0 };

    /// Create a value from paise.
    pub const fn from_paise(paise: i64) -> Self {
        Self { paise }
    }

    /// Create a value from whole rupees. Saturates at the `i64` paise range.
    pub const fn from_rupees(rupees: i64) -> Self {
        Self {
            paise: rupees.saturating_mul(PAISE_PER_RUPEE),
        }
    }

    /// Parse a decimal rupee string such as `"49.99"`, `"100"` or `"7.5"`.
    ///
    /// Parsing is exact: no binary floating point is involved. More than two
    /// fractional digits is rejected rather than rounded.
    ///
    /// ```
    /// use vatika_commerce::money::Money;
    /// assert_eq!(Money::parse("49.99").unwrap().paise(), 4999);
    /// assert_eq!(Money::parse("7.5").unwrap().paise(), 750);
    /// ```
    pub fn parse(input: &str) -> Result<Self, CommerceError> {
        let invalid = || CommerceError::InvalidPrice(input.to_string());
        let s = input.trim();
        let s = s.strip_prefix(CURRENCY_SYMBOL).unwrap_or(s);
        let (negative, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if frac.len() > 2
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let rupees: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let paise: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        let total = rupees
            .checked_mul(PAISE_PER_RUPEE)
            .and_then(|r| r.checked_add(paise))
            .ok_or_else(invalid)?;
        Ok(Self::from_paise(if negative { -total } else { total }))
    }

    /// Amount in paise.
    pub const fn paise(&self) -> i64 {
        self.paise
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.paise == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.paise < 0
    }

    /// Add, returning `None` on overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.paise.checked_add(other.paise).map(Money::from_paise)
    }

    /// Multiply by a quantity, returning `None` on overflow.
    pub fn checked_mul(self, quantity: u32) -> Option<Money> {
        self.paise
            .checked_mul(i64::from(quantity))
            .map(Money::from_paise)
    }

    /// Add, clamping at the numeric bounds.
    pub fn saturating_add(self, other: Money) -> Money {
        Money::from_paise(self.paise.saturating_add(other.paise))
    }

    /// Multiply by a quantity, clamping at the numeric bounds.
    pub fn saturating_mul(self, quantity: u32) -> Money {
        Money::from_paise(self.paise.saturating_mul(i64::from(quantity)))
    }

    /// Format with two decimals (e.g., "₹49.99", "₹130.00").
    pub fn display(&self) -> String {
        format!("{}{}", CURRENCY_SYMBOL, self.display_amount())
    }

    /// Format without symbol, two decimals (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let sign = if self.paise < 0 { "-" } else { "" };
        let abs = self.paise.unsigned_abs();
        let per = PAISE_PER_RUPEE.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / per, abs % per)
    }

    /// Format dropping a zero fractional part (e.g., "₹130", "₹49.50").
    ///
    /// This is how amounts appear inside booking messages.
    pub fn display_compact(&self) -> String {
        if self.paise % PAISE_PER_RUPEE == 0 {
            format!("{}{}", CURRENCY_SYMBOL, self.paise / PAISE_PER_RUPEE)
        } else {
            self.display()
        }
    }
}

impl Add for Money {
    type Output = Money;

    /// Saturating addition; totals never panic.
    fn add(self, other: Money) -> Money {
        self.saturating_add(other)
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, quantity: u32) -> Money {
        self.saturating_mul(quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
