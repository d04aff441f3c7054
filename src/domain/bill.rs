use crate::domain::allocation::{Allocation, PaymentStatus, SplitStrategy, SplitType};
use crate::domain::money::Money;
use crate::domain::resident::ResidentId;
use crate::error::{AllocationError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillCategory {
    #[default]
    Maintenance,
    Water,
    Electricity,
    Security,
    Other,
}

/// Everything needed to raise a bill, before it has been split.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    pub title: String,
    pub description: String,
    pub category: BillCategory,
    pub total_amount: Money,
    pub due_date: NaiveDate,
    pub strategy: SplitStrategy,
    pub created_by: String,
}

/// A bill with one embedded assignment per resident.
///
/// The bill-level `status` is derived from the assignments: `Paid` once every
/// assignment is paid, `Overdue` while any assignment is overdue, `Pending` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: BillCategory,
    pub total_amount: Money,
    pub due_date: NaiveDate,
    pub split_type: SplitType,
    pub assignments: Vec<Allocation>,
    pub created_by: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    pub fn new(request: NewBill, assignments: Vec<Allocation>, now: DateTime<Utc>) -> Self {
        let mut bill = Self {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description,
            category: request.category,
            total_amount: request.total_amount,
            due_date: request.due_date,
            split_type: request.strategy.split_type(),
            assignments,
            created_by: request.created_by,
            status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        bill.refresh_status();
        bill
    }

    pub fn assignment(&self, resident: &ResidentId) -> Option<&Allocation> {
        self.assignments
            .iter()
            .find(|assignment| &assignment.resident_id == resident)
    }

    /// Moves one resident's assignment to `status` and re-derives the bill status.
    pub fn transition_assignment(
        &mut self,
        resident: &ResidentId,
        status: PaymentStatus,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let bill_id = self.id;
        let assignment = self
            .assignments
            .iter_mut()
            .find(|assignment| &assignment.resident_id == resident)
            .ok_or_else(|| AllocationError::AssignmentNotFound {
                bill: bill_id.to_string(),
                resident: resident.to_string(),
            })?;
        assignment.transition_to(status)?;
        self.updated_at = now;
        self.refresh_status();
        Ok(())
    }

    /// Marks every pending assignment overdue if the due date is before `today`.
    ///
    /// Returns whether anything changed.
    pub fn mark_overdue(&mut self, today: NaiveDate, now: DateTime<Utc>) -> bool {
        if today <= self.due_date {
            return false;
        }
        let mut changed = false;
        for assignment in &mut self.assignments {
            if assignment.status == PaymentStatus::Pending {
                assignment.status = PaymentStatus::Overdue;
                changed = true;
            }
        }
        if changed {
            self.updated_at = now;
            self.refresh_status();
        }
        changed
    }

    /// Sum of the assignments not yet paid.
    pub fn outstanding(&self) -> Result<Money> {
        self.assignments
            .iter()
            .filter(|assignment| assignment.status != PaymentStatus::Paid)
            .try_fold(Money::ZERO, |acc, assignment| acc.checked_add(assignment.amount))
            .ok_or(AllocationError::AmountOverflow)
    }

    fn refresh_status(&mut self) {
        let statuses = || self.assignments.iter().map(|assignment| assignment.status);
        self.status = if statuses().all(|status| status == PaymentStatus::Paid) {
            PaymentStatus::Paid
        } else if statuses().any(|status| status == PaymentStatus::Overdue) {
            PaymentStatus::Overdue
        } else {
            PaymentStatus::Pending
        };
    }
}
