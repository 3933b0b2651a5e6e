//! Cross-entity checks against the budgets and transactions of one year

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Budget, BudgetId, BudgetSlice, Transaction};

/// Checks run before a yearly overview accepts a change
pub struct YearlyOverviewValidator;

impl YearlyOverviewValidator {
    /// A new budget must match the year and not reuse a sibling's name
    pub fn will_add_budget(budget: &Budget, existing: &[Budget], year: i32) -> LedgerResult<()> {
        if budget.year != year {
            return Err(LedgerError::WrongYear {
                expected: year,
                found: budget.year,
            });
        }
        if let Some(other) = existing.iter().find(|b| b.year != year) {
            return Err(LedgerError::WrongYear {
                expected: year,
                found: other.year,
            });
        }
        if existing.iter().any(|b| b.name == budget.name) {
            return Err(LedgerError::BudgetAlreadyExists(budget.name.clone()));
        }
        Ok(())
    }

    /// Renaming keeps names unique; an unchanged name always passes
    pub fn will_update_name(
        name: &str,
        budget_id: BudgetId,
        budgets: &[Budget],
    ) -> LedgerResult<()> {
        let budget = budgets
            .iter()
            .find(|b| b.id == budget_id)
            .ok_or_else(|| LedgerError::budget_not_found(budget_id.to_string()))?;

        let name = name.trim();
        if budget.name == name {
            return Ok(());
        }
        if name.is_empty() {
            return Err(LedgerError::NameNotValid);
        }
        if budgets.iter().any(|b| b.id != budget_id && b.name == name) {
            return Err(LedgerError::BudgetAlreadyExists(name.to_string()));
        }
        Ok(())
    }

    /// Every transaction must be dated in `year`
    pub fn will_add_transactions(transactions: &[Transaction], year: i32) -> LedgerResult<()> {
        match transactions.iter().find(|t| t.year() != year) {
            Some(t) => Err(LedgerError::TransactionYearMismatch {
                expected: year,
                found: t.year(),
            }),
            None => Ok(()),
        }
    }

    /// Every amount must point at a known budget and one of its slices
    pub fn will_attach_transactions(
        transactions: &[Transaction],
        budgets: &[Budget],
    ) -> LedgerResult<()> {
        for transaction in transactions {
            for entry in transaction.amounts() {
                let budget = budgets
                    .iter()
                    .find(|b| b.id == entry.budget_id)
                    .ok_or_else(|| LedgerError::budget_not_found(entry.budget_id.to_string()))?;

                if !budget.contains_slice(entry.slice_id) {
                    return Err(LedgerError::slice_not_found(format!(
                        "{} in budget '{}'",
                        entry.slice_id, budget.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// The target budget must exist and not have a slice of that name yet
    pub fn will_add_slice(
        slice: &BudgetSlice,
        budget_id: BudgetId,
        budgets: &[Budget],
    ) -> LedgerResult<()> {
        let budget = budgets
            .iter()
            .find(|b| b.id == budget_id)
            .ok_or_else(|| LedgerError::budget_not_found(budget_id.to_string()))?;

        if budget.slice_named(&slice.name).is_some() {
            return Err(LedgerError::SliceAlreadyExists(slice.name.clone()));
        }
        Ok(())
    }
}
