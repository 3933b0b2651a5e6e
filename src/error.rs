//! Custom error types for the budget ledger
//!
//! This module defines the error hierarchy for the library using thiserror.
//! Errors fall into three groups: validation errors the caller can correct,
//! not-found errors for identifiers that are absent, and opaque errors
//! surfaced by the storage layer.

use thiserror::Error;

/// The main error type for budget ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A money amount could not be parsed from text
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A zero amount was given where a non-zero one is required
    #[error("Amount must not be zero")]
    AmountNotValid,

    /// An amount beyond what the ledger can sum exactly
    #[error("Amount {0} exceeds the supported maximum")]
    AmountOutOfRange(String),

    /// A name is empty or blank
    #[error("Name must not be empty")]
    NameNotValid,

    /// A budget would end up without any slice
    #[error("A budget needs at least one slice")]
    NoSlices,

    /// A scheduled slice was created without entries
    #[error("A scheduled slice needs at least one scheduled amount")]
    NoSchedule,

    /// A month outside 1..=12
    #[error("Month {0} is not valid, expected 1-12")]
    MonthNotValid(u32),

    /// Two scheduled amounts target the same month
    #[error("A scheduled amount already exists for month {0}")]
    ScheduleAlreadyExists(u32),

    /// Two slices of the same budget share a name
    #[error("Duplicate slice name: {0}")]
    DuplicateSliceName(String),

    /// A slice with that name is already part of the budget
    #[error("Slice already exists: {0}")]
    SliceAlreadyExists(String),

    /// A budget with that name is already part of the yearly overview
    #[error("Budget already exists: {0}")]
    BudgetAlreadyExists(String),

    /// A budget does not belong to the overview's year
    #[error("Budget year {found} does not match overview year {expected}")]
    WrongYear { expected: i32, found: i32 },

    /// A transaction does not belong to the overview's year
    #[error("Transaction year {found} does not match overview year {expected}")]
    TransactionYearMismatch { expected: i32, found: i32 },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Failures reported by the storage collaborator
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for slices
    pub fn slice_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Slice",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a caller-correctable validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::AmountNotValid
                | Self::AmountOutOfRange(_)
                | Self::NameNotValid
                | Self::NoSlices
                | Self::NoSchedule
                | Self::MonthNotValid(_)
                | Self::ScheduleAlreadyExists(_)
                | Self::DuplicateSliceName(_)
                | Self::SliceAlreadyExists(_)
                | Self::BudgetAlreadyExists(_)
                | Self::WrongYear { .. }
                | Self::TransactionYearMismatch { .. }
        )
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for budget ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
