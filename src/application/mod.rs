//! Application layer orchestrating the domain.
//!
//! [`ledger::BillLedger`] is the calling layer around the allocation engine: it
//! turns a bill request into a persisted bill and drives the payment status of
//! each resident's share.

pub mod ledger;
