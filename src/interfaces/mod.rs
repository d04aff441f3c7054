//! Boundary adapters: CSV rosters and reports, JSON bill requests.

pub mod csv;
pub mod json;
