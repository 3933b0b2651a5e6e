//! Overview service
//!
//! Every change to a [`YearlyOverview`] follows the same order: validate
//! against the current in-memory state, hand the change to the store, and
//! only then apply it in memory. A failure at any step returns the error
//! and leaves the overview exactly as it was.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Budget, BudgetId, BudgetSlice, MoneyValue, SliceId, Transaction, TransactionId};
use crate::overview::YearlyOverview;
use crate::storage::LedgerStore;
use crate::validators::YearlyOverviewValidator;

/// Service for loading and changing a yearly overview
pub struct OverviewService<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: LedgerStore + ?Sized> OverviewService<'a, S> {
    /// Create a new overview service
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Build the overview of `year` from the store
    ///
    /// Rows the store returns for another year are skipped with a warning.
    pub fn load(
        &self,
        name: &str,
        year: i32,
        opening_balance: MoneyValue,
    ) -> LedgerResult<YearlyOverview> {
        debug!(year, "fetching budgets and transactions");
        let (budgets, stray_budgets): (Vec<Budget>, Vec<Budget>) = self
            .store
            .fetch_budgets(year)?
            .into_iter()
            .partition(|b| b.year == year);
        let (transactions, stray_transactions): (Vec<Transaction>, Vec<Transaction>) = self
            .store
            .fetch_transactions(year)?
            .into_iter()
            .partition(|t| t.year() == year);

        if !stray_budgets.is_empty() || !stray_transactions.is_empty() {
            warn!(
                year,
                budgets = stray_budgets.len(),
                transactions = stray_transactions.len(),
                "store returned rows from another year; skipping them"
            );
        }

        let overview =
            YearlyOverview::with_entries(name, year, opening_balance, budgets, transactions)?;
        info!(
            year,
            budgets = overview.budgets().len(),
            transactions = overview.transactions().len(),
            "loaded yearly overview"
        );
        Ok(overview)
    }

    /// Add a budget to the year
    pub fn add_budget(
        &self,
        overview: &mut YearlyOverview,
        budget: Budget,
    ) -> LedgerResult<BudgetId> {
        YearlyOverviewValidator::will_add_budget(&budget, overview.budgets(), overview.year)?;

        debug!(budget = %budget.id, name = %budget.name, "storing budget");
        self.store.add_budget(&budget).map_err(|e| {
            warn!(budget = %budget.id, error = %e, "store rejected budget");
            e
        })?;

        let id = budget.id;
        info!(budget = %id, name = %budget.name, "added budget");
        overview.push_budget(budget);
        Ok(id)
    }

    /// Delete budgets and the transactions booked against them
    ///
    /// IDs unknown to the overview are skipped; if none are known the call
    /// fails with a not-found error. Returns the IDs the store deleted.
    pub fn delete_budgets(
        &self,
        overview: &mut YearlyOverview,
        ids: &HashSet<BudgetId>,
    ) -> LedgerResult<HashSet<BudgetId>> {
        let known: HashSet<BudgetId> = ids
            .iter()
            .copied()
            .filter(|id| overview.budget(*id).is_some())
            .collect();

        if known.is_empty() {
            return match ids.iter().next() {
                Some(id) => Err(LedgerError::budget_not_found(id.to_string())),
                None => Ok(HashSet::new()),
            };
        }

        debug!(count = known.len(), "deleting budgets");
        let deleted = self.store.delete_budgets(&known).map_err(|e| {
            warn!(error = %e, "store failed to delete budgets");
            e
        })?;

        overview.remove_budgets(&deleted);
        info!(count = deleted.len(), "deleted budgets");
        Ok(deleted)
    }

    /// Rename a budget and optionally change its icon
    pub fn update_budget(
        &self,
        overview: &mut YearlyOverview,
        budget_id: BudgetId,
        name: &str,
        icon: Option<&str>,
    ) -> LedgerResult<()> {
        YearlyOverviewValidator::will_update_name(name, budget_id, overview.budgets())?;
        overview.require_budget(budget_id)?.clone().update(name, icon)?;

        debug!(budget = %budget_id, name, "updating budget");
        self.store.update_budget(name, icon, budget_id).map_err(|e| {
            warn!(budget = %budget_id, error = %e, "store failed to update budget");
            e
        })?;

        overview.rename_budget(budget_id, name, icon)?;
        info!(budget = %budget_id, name, "updated budget");
        Ok(())
    }

    /// Append a slice to a budget
    pub fn add_slice(
        &self,
        overview: &mut YearlyOverview,
        budget_id: BudgetId,
        slice: BudgetSlice,
    ) -> LedgerResult<SliceId> {
        YearlyOverviewValidator::will_add_slice(&slice, budget_id, overview.budgets())?;

        debug!(budget = %budget_id, slice = %slice.id, "storing slice");
        self.store.add_slice(&slice, budget_id).map_err(|e| {
            warn!(budget = %budget_id, error = %e, "store rejected slice");
            e
        })?;

        let id = slice.id;
        overview.push_slice(budget_id, slice)?;
        info!(budget = %budget_id, slice = %id, "added slice");
        Ok(id)
    }

    /// Delete slices from a budget, returning the removed slices
    ///
    /// The budget must keep at least one slice; otherwise nothing changes.
    pub fn delete_slices(
        &self,
        overview: &mut YearlyOverview,
        budget_id: BudgetId,
        ids: &HashSet<SliceId>,
    ) -> LedgerResult<Vec<BudgetSlice>> {
        let removed = overview
            .require_budget(budget_id)?
            .clone()
            .delete_slices(ids)?;
        if removed.is_empty() {
            return Ok(removed);
        }

        debug!(budget = %budget_id, count = removed.len(), "deleting slices");
        self.store.delete_slices(ids, budget_id).map_err(|e| {
            warn!(budget = %budget_id, error = %e, "store failed to delete slices");
            e
        })?;

        let removed = overview.remove_slices(budget_id, ids)?;
        info!(budget = %budget_id, count = removed.len(), "deleted slices");
        Ok(removed)
    }

    /// Delete slices by their position in the budget's slice list
    ///
    /// Positions past the end are skipped.
    pub fn delete_slices_at(
        &self,
        overview: &mut YearlyOverview,
        budget_id: BudgetId,
        positions: &[usize],
    ) -> LedgerResult<Vec<BudgetSlice>> {
        let ids: HashSet<SliceId> = overview
            .require_budget(budget_id)?
            .slice_ids_at(positions)
            .into_iter()
            .collect();
        self.delete_slices(overview, budget_id, &ids)
    }

    /// Book transactions in the year
    ///
    /// Either every transaction is stored and added, or none is: when the
    /// store fails part-way, the ones it already accepted are deleted again.
    pub fn add_transactions(
        &self,
        overview: &mut YearlyOverview,
        transactions: Vec<Transaction>,
    ) -> LedgerResult<()> {
        YearlyOverviewValidator::will_add_transactions(&transactions, overview.year)?;
        YearlyOverviewValidator::will_attach_transactions(&transactions, overview.budgets())?;

        let mut stored: HashSet<TransactionId> = HashSet::with_capacity(transactions.len());
        for transaction in &transactions {
            debug!(transaction = %transaction.id, "storing transaction");
            if let Err(e) = self.store.add_transaction(transaction) {
                warn!(transaction = %transaction.id, error = %e, "store rejected transaction");
                if !stored.is_empty() {
                    if let Err(rollback) = self.store.delete_transactions(&stored) {
                        warn!(
                            count = stored.len(),
                            error = %rollback,
                            "failed to roll back stored transactions"
                        );
                    }
                }
                return Err(e);
            }
            stored.insert(transaction.id);
        }

        info!(count = transactions.len(), "added transactions");
        overview.push_transactions(transactions);
        Ok(())
    }

    /// Delete transactions, returning how many were removed
    ///
    /// IDs unknown to the overview are skipped; if none are known the call
    /// fails with a not-found error.
    pub fn delete_transactions(
        &self,
        overview: &mut YearlyOverview,
        ids: &HashSet<TransactionId>,
    ) -> LedgerResult<usize> {
        let known: HashSet<TransactionId> = ids
            .iter()
            .copied()
            .filter(|id| overview.transaction(*id).is_some())
            .collect();

        if known.is_empty() {
            return match ids.iter().next() {
                Some(id) => Err(LedgerError::transaction_not_found(id.to_string())),
                None => Ok(0),
            };
        }

        debug!(count = known.len(), "deleting transactions");
        self.store.delete_transactions(&known).map_err(|e| {
            warn!(error = %e, "store failed to delete transactions");
            e
        })?;

        overview.remove_transactions(&known);
        info!(count = known.len(), "deleted transactions");
        Ok(known.len())
    }
}
