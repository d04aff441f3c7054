use crate::domain::bill::Bill;
use crate::domain::ports::{BillStore, BillUpdate};
use crate::error::{AllocationError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory store for bills.
///
/// Uses `Arc<RwLock<HashMap<Uuid, Bill>>>` so clones share the same bills.
/// Suitable for tests and for one-shot CLI runs where nothing outlives the process.
#[derive(Default, Clone)]
pub struct InMemoryBillStore {
    bills: Arc<RwLock<HashMap<Uuid, Bill>>>,
}

impl InMemoryBillStore {
    /// Creates a new, empty in-memory bill store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BillStore for InMemoryBillStore {
    async fn store(&self, bill: Bill) -> Result<()> {
        let mut bills = self.bills.write().await;
        bills.insert(bill.id, bill);
        Ok(())
    }

    async fn get(&self, bill_id: Uuid) -> Result<Option<Bill>> {
        let bills = self.bills.read().await;
        Ok(bills.get(&bill_id).cloned())
    }

    /// Returns every bill, oldest first.
    async fn all(&self) -> Result<Vec<Bill>> {
        let bills = self.bills.read().await;
        let mut all: Vec<Bill> = bills.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    /// Holds the write lock across the whole read-modify-write.
    async fn update<'a>(&self, bill_id: Uuid, apply: BillUpdate<'a>) -> Result<Bill> {
        let mut bills = self.bills.write().await;
        let stored = bills
            .get_mut(&bill_id)
            .ok_or_else(|| AllocationError::BillNotFound(bill_id.to_string()))?;
        let mut updated = stored.clone();
        apply(&mut updated)?;
        *stored = updated.clone();
        Ok(updated)
    }
}
