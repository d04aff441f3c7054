//! Domain layer: money, residents, the allocation engine and bills.
//!
//! Nothing in here performs I/O. The allocation engine in [`allocation`] is a set of
//! pure functions; persistence is only described through the [`ports`] traits.

pub mod allocation;
pub mod bill;
pub mod money;
pub mod ports;
pub mod resident;
