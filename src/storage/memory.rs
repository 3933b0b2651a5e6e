//! In-memory ledger store
//!
//! Holds every year's budgets and transactions behind a `RwLock`. Each
//! mutation is applied to a copy that only replaces the live data once the
//! change and the optional commit hook (the disk write of
//! [`super::JsonStore`]) both succeeded.

use std::collections::HashSet;
use std::fmt;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Budget, BudgetId, BudgetSlice, SliceId, Transaction, TransactionId};

use super::LedgerStore;

/// Everything a store persists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LedgerData {
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl LedgerData {
    fn budget_mut(&mut self, budget_id: BudgetId) -> LedgerResult<&mut Budget> {
        self.budgets
            .iter_mut()
            .find(|b| b.id == budget_id)
            .ok_or_else(|| LedgerError::budget_not_found(budget_id.to_string()))
    }

    fn add_budget(&mut self, budget: &Budget) -> LedgerResult<()> {
        if self.budgets.iter().any(|b| b.id == budget.id) {
            return Err(LedgerError::Storage(format!("Budget {} is already stored", budget.id)));
        }
        self.budgets.push(budget.clone());
        Ok(())
    }

    fn add_slice(&mut self, slice: &BudgetSlice, budget_id: BudgetId) -> LedgerResult<()> {
        self.budget_mut(budget_id)?.append(slice.clone())
    }

    fn add_transaction(&mut self, transaction: &Transaction) -> LedgerResult<()> {
        if self.transactions.iter().any(|t| t.id == transaction.id) {
            return Err(LedgerError::Storage(format!(
                "Transaction {} is already stored",
                transaction.id
            )));
        }
        self.transactions.push(transaction.clone());
        Ok(())
    }

    fn delete_budgets(&mut self, ids: &HashSet<BudgetId>) -> HashSet<BudgetId> {
        let deleted: HashSet<BudgetId> = self
            .budgets
            .iter()
            .filter(|b| ids.contains(&b.id))
            .map(|b| b.id)
            .collect();

        self.budgets.retain(|b| !deleted.contains(&b.id));
        self.transactions
            .retain(|t| !deleted.iter().any(|id| t.references_budget(*id)));
        deleted
    }

    fn delete_slices(&mut self, ids: &HashSet<SliceId>, budget_id: BudgetId) -> LedgerResult<()> {
        self.budget_mut(budget_id)?.delete_slices(ids).map(|_| ())
    }

    fn delete_transactions(&mut self, ids: &HashSet<TransactionId>) {
        self.transactions.retain(|t| !ids.contains(&t.id));
    }

    fn update_budget(
        &mut self,
        name: &str,
        icon: Option<&str>,
        budget_id: BudgetId,
    ) -> LedgerResult<()> {
        self.budget_mut(budget_id)?.update(name, icon)
    }
}

/// Called with the current and the updated data before a mutation is made visible
pub(crate) type CommitHook =
    Box<dyn Fn(&LedgerData, &LedgerData) -> LedgerResult<()> + Send + Sync>;

/// Store that keeps everything in process memory
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<LedgerData>,
    on_commit: Option<CommitHook>,
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("data", &self.data)
            .field("on_commit", &self.on_commit.is_some())
            .finish()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store and run `on_commit` before every mutation lands
    pub(crate) fn with_commit_hook(data: LedgerData, on_commit: CommitHook) -> Self {
        Self {
            data: RwLock::new(data),
            on_commit: Some(on_commit),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&LedgerData) -> T) -> LedgerResult<T> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(f(&data))
    }

    /// Apply `change` to a copy and swap it in once the commit hook accepts it
    fn apply<T>(&self, change: impl FnOnce(&mut LedgerData) -> LedgerResult<T>) -> LedgerResult<T> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut draft = data.clone();
        let output = change(&mut draft)?;
        if let Some(on_commit) = &self.on_commit {
            on_commit(&data, &draft)?;
        }
        *data = draft;
        Ok(output)
    }

    /// Number of stored budgets across all years
    pub fn budget_count(&self) -> LedgerResult<usize> {
        self.read(|d| d.budgets.len())
    }

    /// Number of stored transactions across all years
    pub fn transaction_count(&self) -> LedgerResult<usize> {
        self.read(|d| d.transactions.len())
    }
}

impl LedgerStore for MemoryStore {
    fn fetch_budgets(&self, year: i32) -> LedgerResult<Vec<Budget>> {
        self.read(|d| d.budgets.iter().filter(|b| b.year == year).cloned().collect())
    }

    fn fetch_transactions(&self, year: i32) -> LedgerResult<Vec<Transaction>> {
        self.read(|d| {
            d.transactions
                .iter()
                .filter(|t| t.year() == year)
                .cloned()
                .collect()
        })
    }

    fn fetch_budget(&self, budget_id: BudgetId) -> LedgerResult<Budget> {
        self.read(|d| d.budgets.iter().find(|b| b.id == budget_id).cloned())?
            .ok_or_else(|| LedgerError::budget_not_found(budget_id.to_string()))
    }

    fn add_budget(&self, budget: &Budget) -> LedgerResult<()> {
        self.apply(|d| d.add_budget(budget))
    }

    fn add_slice(&self, slice: &BudgetSlice, budget_id: BudgetId) -> LedgerResult<()> {
        self.apply(|d| d.add_slice(slice, budget_id))
    }

    fn add_transaction(&self, transaction: &Transaction) -> LedgerResult<()> {
        self.apply(|d| d.add_transaction(transaction))
    }

    fn delete_budgets(&self, ids: &HashSet<BudgetId>) -> LedgerResult<HashSet<BudgetId>> {
        self.apply(|d| Ok(d.delete_budgets(ids)))
    }

    fn delete_slices(&self, ids: &HashSet<SliceId>, budget_id: BudgetId) -> LedgerResult<()> {
        self.apply(|d| d.delete_slices(ids, budget_id))
    }

    fn delete_transactions(&self, ids: &HashSet<TransactionId>) -> LedgerResult<()> {
        self.apply(|d| {
            d.delete_transactions(ids);
            Ok(())
        })
    }

    fn update_budget(
        &self,
        name: &str,
        icon: Option<&str>,
        budget_id: BudgetId,
    ) -> LedgerResult<()> {
        self.apply(|d| d.update_budget(name, icon, budget_id))
    }
}
