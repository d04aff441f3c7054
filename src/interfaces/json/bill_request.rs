use crate::domain::allocation::{CustomSplits, SplitStrategy, SplitType};
use crate::domain::bill::{BillCategory, NewBill};
use crate::domain::money::Money;
use crate::domain::resident::{Resident, ResidentId};
use crate::error::{AllocationError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// Body of a "create bill" request.
///
/// `splitType` is kept as free text so that an unknown strategy is reported as
/// [`AllocationError::UnsupportedStrategy`] rather than as a generic parse failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: BillCategory,
    pub total_amount: Decimal,
    pub due_date: NaiveDate,
    pub split_type: String,
    #[serde(default)]
    pub custom_splits: HashMap<ResidentId, Decimal>,
    pub created_by: String,
}

impl BillRequest {
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        Ok(serde_json::from_reader(source)?)
    }

    pub fn total(&self) -> Result<Money> {
        let total = Money::from_decimal(self.total_amount)?;
        if total.is_negative() {
            return Err(AllocationError::InvalidTotalAmount(format!(
                "{total} is negative"
            )));
        }
        Ok(total)
    }

    /// Resolves the requested strategy.
    ///
    /// A custom split with no `customSplits` falls back to the amounts stored on the
    /// resident records.
    pub fn strategy(&self, residents: &[Resident]) -> Result<SplitStrategy> {
        match self.split_type.parse::<SplitType>()? {
            SplitType::Equal => Ok(SplitStrategy::Equal),
            SplitType::SizeBased => Ok(SplitStrategy::SizeBased),
            SplitType::Custom if self.custom_splits.is_empty() => {
                SplitStrategy::custom_from_residents(residents)
            }
            SplitType::Custom => {
                let splits = self
                    .custom_splits
                    .iter()
                    .map(|(id, amount)| Ok((id.clone(), Money::from_decimal(*amount)?)))
                    .collect::<Result<CustomSplits>>()?;
                Ok(SplitStrategy::Custom(splits))
            }
        }
    }

    pub fn into_new_bill(self, residents: &[Resident]) -> Result<NewBill> {
        let total_amount = self.total()?;
        let strategy = self.strategy(residents)?;
        Ok(NewBill {
            title: self.title,
            description: self.description,
            category: self.category,
            total_amount,
            due_date: self.due_date,
            strategy,
            created_by: self.created_by,
        })
    }
}
