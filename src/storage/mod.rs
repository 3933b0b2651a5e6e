//! Persistence layer for the budget ledger
//!
//! [`LedgerStore`] is the one seam between the overview service and
//! wherever the data lives. [`MemoryStore`] keeps it in process memory;
//! [`JsonStore`] adds atomic JSON files on top.

pub mod file_io;
mod json;
mod memory;

pub use file_io::{read_json, write_json_atomic};
pub use json::JsonStore;
pub use memory::MemoryStore;

use std::collections::HashSet;

use crate::error::LedgerResult;
use crate::models::{Budget, BudgetId, BudgetSlice, SliceId, Transaction, TransactionId};

/// Where budgets and transactions are kept
///
/// Every mutation either fully succeeds or leaves the store unchanged.
pub trait LedgerStore {
    /// All budgets of `year`
    fn fetch_budgets(&self, year: i32) -> LedgerResult<Vec<Budget>>;

    /// All transactions dated in `year`
    fn fetch_transactions(&self, year: i32) -> LedgerResult<Vec<Transaction>>;

    fn fetch_budget(&self, budget_id: BudgetId) -> LedgerResult<Budget>;

    fn add_budget(&self, budget: &Budget) -> LedgerResult<()>;

    fn add_slice(&self, slice: &BudgetSlice, budget_id: BudgetId) -> LedgerResult<()>;

    fn add_transaction(&self, transaction: &Transaction) -> LedgerResult<()>;

    /// Delete budgets and their transactions, returning the IDs that existed
    fn delete_budgets(&self, ids: &HashSet<BudgetId>) -> LedgerResult<HashSet<BudgetId>>;

    fn delete_slices(&self, ids: &HashSet<SliceId>, budget_id: BudgetId) -> LedgerResult<()>;

    fn delete_transactions(&self, ids: &HashSet<TransactionId>) -> LedgerResult<()>;

    fn update_budget(
        &self,
        name: &str,
        icon: Option<&str>,
        budget_id: BudgetId,
    ) -> LedgerResult<()>;
}
