//! Integer-cent money values.
//!
//! Prices cross the API boundary as decimal strings (`"35.00"`) but all
//! internal arithmetic runs on whole cents so repeated operations never
//! accumulate rounding drift.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A monetary amount stored as whole cents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Convert a decimal amount to cents, rounding half away from zero.
    ///
    /// Returns `None` if the amount does not fit in an `i64` cent count.
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        let cents = (amount * Decimal::from(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        cents.to_i64().map(Money)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Decimal form with two fractional digits, for API payloads.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Scale a per-minute rate by a session length, `None` on overflow.
    pub fn times_minutes(&self, minutes: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(minutes)).map(Money)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal_exact() {
        let m = Money::from_decimal("35.00".parse().unwrap()).unwrap();
        assert_eq!(m.cents(), 3500);
    }

    #[test]
    fn test_from_decimal_rounds_half_away_from_zero() {
        let up = Money::from_decimal("1.005".parse().unwrap()).unwrap();
        assert_eq!(up.cents(), 101);

        let down = Money::from_decimal("-1.005".parse().unwrap()).unwrap();
        assert_eq!(down.cents(), -101);
    }

    #[test]
    fn test_to_decimal_has_two_places() {
        assert_eq!(Money::from_cents(3500).to_decimal().to_string(), "35.00");
        assert_eq!(Money::from_cents(5).to_decimal().to_string(), "0.05");
    }

    #[test]
    fn test_times_minutes() {
        let per_minute = Money::from_cents(250);
        assert_eq!(per_minute.times_minutes(30).unwrap().cents(), 7500);
        assert!(Money::from_cents(i64::MAX).times_minutes(2).is_none());
    }

    #[test]
    fn test_add_and_sub() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(250);
        assert_eq!((a + b).cents(), 1250);
        assert_eq!((a - b).cents(), 750);
    }

    #[test]
    fn test_display_matches_decimal_form() {
        assert_eq!(Money::from_cents(1999).to_string(), "19.99");
    }
}
