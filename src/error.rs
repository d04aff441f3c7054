use crate::domain::allocation::PaymentStatus;
use thiserror::Error;

/// Coarse classification of [`AllocationError`], used by callers to pick a response.
///
/// Everything except [`ErrorKind::Internal`] is caused by the request itself and
/// should be reported back to the user (a 4xx in HTTP terms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    InvalidStrategyParameters,
    UnsupportedStrategy,
    Ledger,
    Internal,
}

#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("Invalid total amount: {0}")]
    InvalidTotalAmount(String),
    #[error("Cannot split a bill across an empty resident list")]
    EmptyResidentList,
    #[error("Resident {0} appears more than once")]
    DuplicateResident(String),
    #[error("Split amount missing for resident {resident} (flat {unit})")]
    MissingSplitAmount { resident: String, unit: String },
    #[error("Unit size missing or non-positive for flat {unit} (resident {resident})")]
    InvalidUnitSize { resident: String, unit: String },
    #[error("Custom amount for resident {resident} must not be negative")]
    InvalidCustomAmount { resident: String },
    #[error("Unsupported split strategy: {0}")]
    UnsupportedStrategy(String),
    #[error("Amount is too large to allocate")]
    AmountOverflow,
    #[error("Bill {0} not found")]
    BillNotFound(String),
    #[error("Resident {resident} has no assignment on bill {bill}")]
    AssignmentNotFound { bill: String, resident: String },
    #[error("Cannot move a payment from {from} to {to}")]
    InvalidStatusTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AllocationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTotalAmount(_) | Self::EmptyResidentList | Self::DuplicateResident(_) => {
                ErrorKind::InvalidInput
            }
            Self::MissingSplitAmount { .. }
            | Self::InvalidUnitSize { .. }
            | Self::InvalidCustomAmount { .. } => ErrorKind::InvalidStrategyParameters,
            Self::UnsupportedStrategy(_) => ErrorKind::UnsupportedStrategy,
            Self::BillNotFound(_)
            | Self::AssignmentNotFound { .. }
            | Self::InvalidStatusTransition { .. } => ErrorKind::Ledger,
            Self::AmountOverflow | Self::CsvError(_) | Self::JsonError(_) | Self::IoError(_) => {
                ErrorKind::Internal
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AllocationError>;
