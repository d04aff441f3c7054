use crate::error::{AllocationError, Result};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

/// Number of decimal places carried by the currency.
pub const CURRENCY_SCALE: u32 = 2;

/// A monetary value stored as an integer count of minor units (paise, cents).
///
/// All arithmetic inside the crate happens on the integer representation; decimals
/// only appear when parsing input or rendering output. Conversions from decimal round
/// half away from zero to [`CURRENCY_SCALE`] places.
///
/// `Money` itself may be negative (a discrepancy is a signed quantity); callers that
/// need a non-negative amount check [`Money::is_negative`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    /// The smallest representable non-zero amount.
    pub const MINOR_UNIT: Self = Self(1);

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub fn minor(&self) -> i64 {
        self.0
    }

    /// Converts a decimal currency value, rounding half away from zero.
    pub fn from_decimal(value: Decimal) -> Result<Self> {
        let rounded =
            value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded
            .checked_mul(Decimal::from(10_i64.pow(CURRENCY_SCALE)))
            .and_then(|minor| minor.to_i64())
            .map(Self)
            .ok_or(AllocationError::AmountOverflow)
    }

    /// Converts a floating point currency value, rejecting `NaN` and infinities.
    ///
    /// For callers holding an `f64`. The CSV, JSON and CLI inputs are parsed straight
    /// into `Decimal`, which has no non-finite values: `"NaN"` or `"inf"` fail there.
    pub fn try_from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(AllocationError::InvalidTotalAmount(format!(
                "{value} is not a finite number"
            )));
        }
        let decimal = Decimal::from_f64(value).ok_or(AllocationError::AmountOverflow)?;
        Self::from_decimal(decimal)
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, CURRENCY_SCALE)
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Distance between two amounts, in minor units.
    pub fn abs_diff(self, other: Self) -> u64 {
        self.0.abs_diff(other.0)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = AllocationError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.to_decimal()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Serialize::serialize(&self.to_decimal(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::from_decimal(value).map_err(serde::de::Error::custom)
    }
}
