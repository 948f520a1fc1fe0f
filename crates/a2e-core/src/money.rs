//! Exact currency amounts
//!
//! Amounts are stored in minor units (cents) so that line totals and order
//! totals are exact sums with no float drift. On the wire the value is a
//! plain decimal number with currency scale (e.g. `12.0` for ¥12.00).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// A currency amount in minor units (1/100 of the major unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Money = Money(0);

    /// Construct from minor units (cents).
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Construct from whole major units (e.g. yuan).
    pub const fn from_major(units: i64) -> Self {
        Money(units * 100)
    }

    /// Minor units (cents).
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Line total: unit price times a quantity.
    pub fn times(&self, quantity: u32) -> Money {
        Money(self.0 * quantity as i64)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "¥{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(Money((value * 100.0).round() as i64))
    }
}
