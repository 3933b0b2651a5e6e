//! Core data models for the budget ledger
//!
//! This module contains the entities of the ledger: money values, budgets
//! and their slices, and transactions booked against them.

pub mod budget;
pub mod ids;
pub mod money;
pub mod slice;
pub mod transaction;

pub use budget::{Budget, BudgetKind, DEFAULT_SLICE_NAME};
pub use ids::{BudgetId, SliceId, TransactionId};
pub use money::{MoneyValue, MAX_UNITS};
pub use slice::{
    check_month, BudgetSlice, ScheduleDraft, ScheduledAmount, SliceConfiguration, MONTHS,
};
pub use transaction::{Transaction, TransactionAmount};
