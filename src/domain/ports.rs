use super::bill::Bill;
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// A change applied to a stored bill by [`BillStore::update`].
pub type BillUpdate<'a> = Box<dyn FnOnce(&mut Bill) -> Result<()> + Send + 'a>;

/// Persistence for bills and their embedded assignments.
#[async_trait]
pub trait BillStore: Send + Sync {
    async fn store(&self, bill: Bill) -> Result<()>;
    async fn get(&self, bill_id: Uuid) -> Result<Option<Bill>>;
    async fn all(&self) -> Result<Vec<Bill>>;

    /// Applies `apply` to the stored bill and persists the result as one step.
    ///
    /// No other write to the same bill may interleave between the read and the write.
    /// When `apply` fails the stored bill is left untouched. Returns the updated bill,
    /// or [`AllocationError::BillNotFound`](crate::error::AllocationError::BillNotFound).
    async fn update<'a>(&self, bill_id: Uuid, apply: BillUpdate<'a>) -> Result<Bill>;
}

pub type BillStoreBox = Box<dyn BillStore>;
