use crate::domain::money::Money;
use crate::domain::resident::{Resident, ResidentId};
use crate::error::{AllocationError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Amounts owed under a custom split, keyed by resident.
pub type CustomSplits = HashMap<ResidentId, Money>;

/// Rule used to divide a bill's total across residents.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitStrategy {
    /// Every resident owes the same share.
    Equal,
    /// Every resident owes the amount listed for them, taken verbatim.
    Custom(CustomSplits),
    /// Shares are proportional to each resident's unit size.
    SizeBased,
}

impl SplitStrategy {
    /// Builds a custom split from the amounts carried on the resident records.
    ///
    /// Residents without a `custom_amount` are left out of the map, so allocation
    /// will report them as missing instead of assuming zero.
    pub fn custom_from_residents(residents: &[Resident]) -> Result<Self> {
        custom_splits_from(residents).map(Self::Custom)
    }

    pub fn split_type(&self) -> SplitType {
        match self {
            Self::Equal => SplitType::Equal,
            Self::Custom(_) => SplitType::Custom,
            Self::SizeBased => SplitType::SizeBased,
        }
    }
}

/// Collects the `custom_amount` of every resident that has one.
///
/// Fails with [`AllocationError::DuplicateResident`] when an id appears twice, whether
/// or not either row carries an amount.
pub fn custom_splits_from(residents: &[Resident]) -> Result<CustomSplits> {
    reject_duplicates(residents)?;
    let mut splits = CustomSplits::with_capacity(residents.len());
    for resident in residents {
        if let Some(amount) = resident.custom_amount {
            splits.insert(resident.id.clone(), Money::from_decimal(amount)?);
        }
    }
    Ok(splits)
}

/// Discriminator of a [`SplitStrategy`], as stored on bills and sent by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitType {
    #[serde(rename = "equal")]
    Equal,
    #[serde(rename = "custom")]
    Custom,
    #[serde(rename = "sqft", alias = "size_based", alias = "sizeBased")]
    SizeBased,
}

impl FromStr for SplitType {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" => Ok(Self::Equal),
            "custom" => Ok(Self::Custom),
            "sqft" | "size_based" | "size-based" | "sizebased" => Ok(Self::SizeBased),
            other => Err(AllocationError::UnsupportedStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Equal => "equal",
            Self::Custom => "custom",
            Self::SizeBased => "sqft",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

impl PaymentStatus {
    /// Validates a status change. `Paid` is final.
    pub fn transition(self, to: PaymentStatus) -> Result<PaymentStatus> {
        match (self, to) {
            (Self::Pending, Self::Paid)
            | (Self::Pending, Self::Overdue)
            | (Self::Overdue, Self::Paid) => Ok(to),
            (from, to) => Err(AllocationError::InvalidStatusTransition { from, to }),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        })
    }
}

/// One resident's share of a bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub resident_id: ResidentId,
    pub resident_name: String,
    pub resident_email: String,
    pub building: String,
    pub flat_number: String,
    pub amount: Money,
    pub status: PaymentStatus,
}

impl Allocation {
    fn pending(resident: &Resident, amount: Money) -> Self {
        Self {
            resident_id: resident.id.clone(),
            resident_name: resident.name.clone(),
            resident_email: resident.email.clone(),
            building: resident.unit.building.clone(),
            flat_number: resident.unit.flat_number.clone(),
            amount,
            status: PaymentStatus::Pending,
        }
    }

    pub fn transition_to(&mut self, status: PaymentStatus) -> Result<()> {
        self.status = self.status.transition(status)?;
        Ok(())
    }
}

/// How independently computed shares are turned into whole minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rounding {
    /// Each share is rounded on its own. The sum may drift from the total by at
    /// most one minor unit per resident after the first.
    #[default]
    Independent,
    /// Shares are floored and the leftover units go to the largest fractional
    /// remainders (ties in input order). The sum always equals the total.
    LargestRemainder,
}

/// Knobs of the allocation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllocationPolicy {
    pub rounding: Rounding,
    /// Treat a missing custom amount as zero and a missing unit size as one
    /// instead of failing.
    pub legacy_defaults: bool,
}

/// Splits `total` across `residents` with the default policy.
pub fn allocate(
    total: Money,
    residents: &[Resident],
    strategy: &SplitStrategy,
) -> Result<Vec<Allocation>> {
    allocate_with(total, residents, strategy, &AllocationPolicy::default())
}

/// Splits `total` across `residents`.
///
/// The returned allocations follow the order of `residents`, one per resident, all
/// marked [`PaymentStatus::Pending`]. Custom amounts are taken as given and are not
/// reconciled with `total`; see [`custom_discrepancy`].
pub fn allocate_with(
    total: Money,
    residents: &[Resident],
    strategy: &SplitStrategy,
    policy: &AllocationPolicy,
) -> Result<Vec<Allocation>> {
    if total.is_negative() {
        return Err(AllocationError::InvalidTotalAmount(format!(
            "{total} is negative"
        )));
    }
    validate_residents(residents)?;

    debug!(
        total = %total,
        residents = residents.len(),
        split = %strategy.split_type(),
        rounding = ?policy.rounding,
        "allocating bill"
    );

    let amounts = match strategy {
        SplitStrategy::Equal => equal_shares(total, residents.len(), policy.rounding)?,
        SplitStrategy::SizeBased => {
            let weights = unit_weights(residents, policy.legacy_defaults)?;
            weighted_shares(total, &weights, policy.rounding)?
        }
        SplitStrategy::Custom(splits) => custom_amounts(residents, splits, policy.legacy_defaults)?,
    };
    // Callers sum the shares into bill totals, so the sum has to fit as well.
    amounts
        .iter()
        .try_fold(Money::ZERO, |acc, amount| acc.checked_add(*amount))
        .ok_or(AllocationError::AmountOverflow)?;

    Ok(residents
        .iter()
        .zip(amounts)
        .map(|(resident, amount)| Allocation::pending(resident, amount))
        .collect())
}

/// Difference between the sum of a custom split and the bill total.
///
/// Positive when residents would be charged more than the total.
pub fn custom_discrepancy(total: Money, splits: &CustomSplits) -> Result<Money> {
    splits
        .values()
        .try_fold(Money::ZERO, |acc, amount| acc.checked_add(*amount))
        .and_then(|sum| sum.checked_sub(total))
        .ok_or(AllocationError::AmountOverflow)
}

fn validate_residents(residents: &[Resident]) -> Result<()> {
    if residents.is_empty() {
        return Err(AllocationError::EmptyResidentList);
    }
    reject_duplicates(residents)
}

fn reject_duplicates(residents: &[Resident]) -> Result<()> {
    let mut seen = HashSet::with_capacity(residents.len());
    for resident in residents {
        if !seen.insert(&resident.id) {
            return Err(AllocationError::DuplicateResident(resident.id.to_string()));
        }
    }
    Ok(())
}

fn equal_shares(total: Money, count: usize, rounding: Rounding) -> Result<Vec<Money>> {
    let total = i128::from(total.minor());
    let count_wide = count as i128;
    match rounding {
        Rounding::Independent => {
            // Half away from zero on a non-negative dividend.
            let share = (2 * total + count_wide) / (2 * count_wide);
            Ok(vec![to_money(share)?; count])
        }
        Rounding::LargestRemainder => {
            let base = total / count_wide;
            let leftover = (total % count_wide) as usize;
            (0..count)
                .map(|i| to_money(if i < leftover { base + 1 } else { base }))
                .collect()
        }
    }
}

fn unit_weights(residents: &[Resident], legacy_defaults: bool) -> Result<Vec<Decimal>> {
    residents
        .iter()
        .map(|resident| match resident.unit_size {
            Some(size) if size > Decimal::ZERO => Ok(size),
            _ if legacy_defaults => {
                warn!(
                    resident = %resident.id,
                    unit = %resident.unit,
                    "unit size missing or non-positive, weighting as 1"
                );
                Ok(Decimal::ONE)
            }
            _ => Err(AllocationError::InvalidUnitSize {
                resident: resident.id.to_string(),
                unit: resident.unit.to_string(),
            }),
        })
        .collect()
}

fn weighted_shares(total: Money, weights: &[Decimal], rounding: Rounding) -> Result<Vec<Money>> {
    let weight_sum = weights
        .iter()
        .try_fold(Decimal::ZERO, |acc, weight| acc.checked_add(*weight))
        .ok_or(AllocationError::AmountOverflow)?;
    let total_minor = Decimal::from(total.minor());

    // Exact share of every resident, in minor units.
    let exact = weights
        .iter()
        .map(|weight| {
            total_minor
                .checked_mul(*weight)
                .and_then(|scaled| scaled.checked_div(weight_sum))
                .ok_or(AllocationError::AmountOverflow)
        })
        .collect::<Result<Vec<_>>>()?;

    match rounding {
        Rounding::Independent => exact
            .iter()
            .map(|share| {
                decimal_to_money(share.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            })
            .collect(),
        Rounding::LargestRemainder => {
            let floors = exact.iter().map(|share| share.floor()).collect::<Vec<_>>();
            let mut shares = floors
                .iter()
                .map(|floor| decimal_to_money(*floor))
                .collect::<Result<Vec<_>>>()?;

            let assigned: i64 = shares.iter().map(Money::minor).sum();
            let leftover = (total.minor() - assigned).max(0) as usize;

            let mut order = (0..exact.len()).collect::<Vec<_>>();
            // Stable sort keeps input order among equal remainders.
            order.sort_by(|&a, &b| (exact[b] - floors[b]).cmp(&(exact[a] - floors[a])));
            for &index in order.iter().take(leftover) {
                shares[index] += Money::MINOR_UNIT;
            }
            Ok(shares)
        }
    }
}

fn custom_amounts(
    residents: &[Resident],
    splits: &CustomSplits,
    legacy_defaults: bool,
) -> Result<Vec<Money>> {
    residents
        .iter()
        .map(|resident| match splits.get(&resident.id) {
            Some(amount) if amount.is_negative() => Err(AllocationError::InvalidCustomAmount {
                resident: resident.id.to_string(),
            }),
            Some(amount) => Ok(*amount),
            None if legacy_defaults => {
                warn!(
                    resident = %resident.id,
                    unit = %resident.unit,
                    "no custom amount for resident, assigning zero"
                );
                Ok(Money::ZERO)
            }
            None => Err(AllocationError::MissingSplitAmount {
                resident: resident.id.to_string(),
                unit: resident.unit.to_string(),
            }),
        })
        .collect()
}

fn to_money(minor: i128) -> Result<Money> {
    i64::try_from(minor)
        .map(Money::from_minor)
        .map_err(|_| AllocationError::AmountOverflow)
}

fn decimal_to_money(minor: Decimal) -> Result<Money> {
    minor
        .to_i64()
        .map(Money::from_minor)
        .ok_or(AllocationError::AmountOverflow)
}
