use crate::domain::allocation::{AllocationPolicy, PaymentStatus, allocate_with};
use crate::domain::bill::{Bill, NewBill};
use crate::domain::ports::BillStoreBox;
use crate::domain::resident::{Resident, ResidentId};
use crate::error::{AllocationError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

/// Raises bills and tracks their payment state.
///
/// `BillLedger` owns the storage backend and the allocation policy. Time is always
/// passed in by the caller, so the ledger holds no clock of its own.
pub struct BillLedger {
    store: BillStoreBox,
    policy: AllocationPolicy,
}

impl BillLedger {
    /// Creates a new `BillLedger`.
    ///
    /// # Arguments
    ///
    /// * `store` - Where bills are persisted.
    /// * `policy` - Rounding and defaulting rules applied to every split.
    pub fn new(store: BillStoreBox, policy: AllocationPolicy) -> Self {
        Self { store, policy }
    }

    /// Splits `request` across `residents` and persists the resulting bill.
    ///
    /// Nothing is stored when the split fails.
    pub async fn create_bill(
        &self,
        request: NewBill,
        residents: &[Resident],
        now: DateTime<Utc>,
    ) -> Result<Bill> {
        let assignments = allocate_with(
            request.total_amount,
            residents,
            &request.strategy,
            &self.policy,
        )?;
        let bill = Bill::new(request, assignments, now);
        self.store.store(bill.clone()).await?;

        info!(
            bill = %bill.id,
            title = %bill.title,
            total = %bill.total_amount,
            split = %bill.split_type,
            residents = bill.assignments.len(),
            "bill created"
        );
        Ok(bill)
    }

    /// Marks one resident's share of a bill as paid.
    pub async fn record_payment(
        &self,
        bill_id: Uuid,
        resident: &ResidentId,
        now: DateTime<Utc>,
    ) -> Result<Bill> {
        let bill = self
            .store
            .update(
                bill_id,
                Box::new(|bill: &mut Bill| {
                    bill.transition_assignment(resident, PaymentStatus::Paid, now)
                }),
            )
            .await?;

        info!(bill = %bill_id, resident = %resident, status = %bill.status, "payment recorded");
        Ok(bill)
    }

    /// Flags every pending share of a bill past its due date as overdue.
    ///
    /// Returns the ids of the bills that changed. Each bill is re-read under the
    /// store's update, so payments recorded during the sweep are kept.
    pub async fn mark_overdue(&self, today: NaiveDate, now: DateTime<Utc>) -> Result<Vec<Uuid>> {
        let mut changed = Vec::new();
        for bill in self.store.all().await? {
            if today <= bill.due_date {
                continue;
            }
            let mut flagged = false;
            let flag = &mut flagged;
            self.store
                .update(
                    bill.id,
                    Box::new(move |bill: &mut Bill| {
                        *flag = bill.mark_overdue(today, now);
                        Ok(())
                    }),
                )
                .await?;
            if flagged {
                changed.push(bill.id);
            }
        }
        if !changed.is_empty() {
            info!(bills = changed.len(), %today, "bills marked overdue");
        }
        Ok(changed)
    }

    pub async fn bill(&self, bill_id: Uuid) -> Result<Bill> {
        self.store
            .get(bill_id)
            .await?
            .ok_or_else(|| AllocationError::BillNotFound(bill_id.to_string()))
    }

    /// Bills that carry an assignment for `resident`, oldest first.
    pub async fn bills_for_resident(&self, resident: &ResidentId) -> Result<Vec<Bill>> {
        Ok(self
            .store
            .all()
            .await?
            .into_iter()
            .filter(|bill| bill.assignment(resident).is_some())
            .collect())
    }

    /// Consumes the ledger and returns every stored bill.
    pub async fn into_bills(self) -> Result<Vec<Bill>> {
        self.store.all().await
    }
}
