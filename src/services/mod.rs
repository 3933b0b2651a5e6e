//! Service layer for the budget ledger
//!
//! Services sit between callers and the storage layer, validating changes
//! before they are stored and applying them in memory afterwards.

pub mod overview;

pub use overview::OverviewService;
