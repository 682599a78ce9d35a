//! Fixed-point money: a signed count of minor currency units (cents).
//!
//! Balances and amounts never touch floating point. A single implicit
//! currency is assumed (multi-currency is out of scope).

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Money in minor units, e.g. `Money::from_minor(1050)` is 10.50.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Whole currency units, e.g. `Money::from_major(10)` is 10.00.
    pub fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    pub fn minor(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Overflow-checked addition. `None` means the sum does not fit in the
    /// minor-unit representation.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtraction that refuses to cross zero; `None` means the debit
    /// would overdraw (or the difference does not fit).
    pub fn checked_deduct(&self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(remaining) if remaining >= 0 => Some(Money(remaining)),
            _ => None,
        }
    }
}

impl ValueObject for Money {}

// Plain operator arithmetic for totals known to fit (report sums, test
// fixtures). Balance mutations go through `checked_add` / `checked_deduct`.
impl core::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl core::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, core::ops::Add::add)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
