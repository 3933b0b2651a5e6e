//! The in-memory aggregate of one year's budgets and transactions

use std::collections::HashSet;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    check_month, Budget, BudgetId, BudgetSlice, MoneyValue, SliceId, Transaction, TransactionId,
};
use crate::validators::YearlyOverviewValidator;

use super::as_of::AsOf;
use super::budget_overview::{budget_overviews, BudgetMonthlyOverview, BudgetOverview};
use super::prospect::{monthly_prospects, MonthlyOverview, MonthlyProspect, YearlyProspect};

/// A named ledger year
///
/// Every budget and transaction held here belongs to `year`, and budget
/// names are unique. Reads are free; changes go through
/// [`crate::services::OverviewService`] so the store always sees them first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearlyOverview {
    pub name: String,
    pub year: i32,
    pub opening_balance: MoneyValue,
    budgets: Vec<Budget>,
    transactions: Vec<Transaction>,
}

impl YearlyOverview {
    /// Create an empty year
    pub fn new(name: impl Into<String>, year: i32, opening_balance: MoneyValue) -> Self {
        Self {
            name: name.into(),
            year,
            opening_balance,
            budgets: Vec::new(),
            transactions: Vec::new(),
        }
    }

    /// Assemble a year from stored budgets and transactions
    ///
    /// Budgets are checked one by one so a duplicate name or a row from
    /// another year is reported instead of silently kept.
    pub fn with_entries(
        name: impl Into<String>,
        year: i32,
        opening_balance: MoneyValue,
        budgets: Vec<Budget>,
        transactions: Vec<Transaction>,
    ) -> LedgerResult<Self> {
        let mut overview = Self::new(name, year, opening_balance);
        for budget in budgets {
            YearlyOverviewValidator::will_add_budget(&budget, &overview.budgets, year)?;
            overview.budgets.push(budget);
        }
        YearlyOverviewValidator::will_add_transactions(&transactions, year)?;
        overview.transactions = transactions;
        Ok(overview)
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn budget(&self, id: BudgetId) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.id == id)
    }

    pub fn budget_named(&self, name: &str) -> Option<&Budget> {
        let name = name.trim();
        self.budgets.iter().find(|b| b.name == name)
    }

    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Find a budget or report it missing
    pub fn require_budget(&self, id: BudgetId) -> LedgerResult<&Budget> {
        self.budget(id)
            .ok_or_else(|| LedgerError::budget_not_found(id.to_string()))
    }

    /// Transactions touching `budget_id`, oldest first
    pub fn transactions_for_budget(&self, budget_id: BudgetId) -> Vec<&Transaction> {
        let mut found: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.references_budget(budget_id))
            .collect();
        found.sort_by_key(|t| t.date);
        found
    }

    /// Transactions dated in `month`, oldest first
    pub fn transactions_in_month(&self, month: u32) -> Vec<&Transaction> {
        let mut found: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.is_in_month(month))
            .collect();
        found.sort_by_key(|t| t.date);
        found
    }

    pub fn budget_monthly_overview(
        &self,
        budget_id: BudgetId,
        month: u32,
    ) -> LedgerResult<BudgetMonthlyOverview> {
        check_month(month)?;
        let budget = self.require_budget(budget_id)?;
        Ok(BudgetMonthlyOverview::new(budget, &self.transactions, month))
    }

    pub fn budget_overview(&self, budget_id: BudgetId, month: u32) -> LedgerResult<BudgetOverview> {
        check_month(month)?;
        let budget = self.require_budget(budget_id)?;
        Ok(BudgetOverview::new(budget, &self.transactions, month))
    }

    /// Every budget's overview for `month`, heaviest activity first
    pub fn budget_overviews(&self, month: u32) -> LedgerResult<Vec<BudgetOverview>> {
        check_month(month)?;
        Ok(budget_overviews(&self.budgets, &self.transactions, month))
    }

    /// All twelve monthly prospects, evaluated at `as_of`
    pub fn monthly_prospects(&self, as_of: AsOf) -> Vec<MonthlyProspect> {
        monthly_prospects(
            &self.budgets,
            &self.transactions,
            self.year,
            self.opening_balance,
            as_of,
        )
    }

    pub fn monthly_overview(&self, month: u32, as_of: AsOf) -> LedgerResult<MonthlyOverview> {
        check_month(month)?;
        let prospect = self
            .monthly_prospects(as_of)
            .into_iter()
            .find(|p| p.month == month)
            .ok_or(LedgerError::MonthNotValid(month))?;
        Ok(MonthlyOverview::new(
            prospect,
            budget_overviews(&self.budgets, &self.transactions, month),
        ))
    }

    pub fn prospect(&self) -> YearlyProspect {
        YearlyProspect::new(
            &self.budgets,
            &self.transactions,
            self.year,
            self.opening_balance,
        )
    }

    // Mutators below assume the change was validated and already stored.

    fn budget_mut(&mut self, budget_id: BudgetId) -> LedgerResult<&mut Budget> {
        self.budgets
            .iter_mut()
            .find(|b| b.id == budget_id)
            .ok_or_else(|| LedgerError::budget_not_found(budget_id.to_string()))
    }

    pub(crate) fn push_budget(&mut self, budget: Budget) {
        self.budgets.push(budget);
    }

    /// Drop budgets and every transaction that referenced them
    pub(crate) fn remove_budgets(&mut self, ids: &HashSet<BudgetId>) {
        self.budgets.retain(|b| !ids.contains(&b.id));
        self.transactions
            .retain(|t| !ids.iter().any(|id| t.references_budget(*id)));
    }

    pub(crate) fn rename_budget(
        &mut self,
        budget_id: BudgetId,
        name: &str,
        icon: Option<&str>,
    ) -> LedgerResult<()> {
        self.budget_mut(budget_id)?.update(name, icon)
    }

    pub(crate) fn push_slice(
        &mut self,
        budget_id: BudgetId,
        slice: BudgetSlice,
    ) -> LedgerResult<()> {
        self.budget_mut(budget_id)?.append(slice)
    }

    pub(crate) fn remove_slices(
        &mut self,
        budget_id: BudgetId,
        ids: &HashSet<SliceId>,
    ) -> LedgerResult<Vec<BudgetSlice>> {
        self.budget_mut(budget_id)?.delete_slices(ids)
    }

    pub(crate) fn push_transactions(&mut self, transactions: Vec<Transaction>) {
        self.transactions.extend(transactions);
    }

    pub(crate) fn remove_transactions(&mut self, ids: &HashSet<TransactionId>) {
        self.transactions.retain(|t| !ids.contains(&t.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetKind;
    use crate::overview::MonthState;
    use chrono::NaiveDate;

    fn money(value: i64) -> MoneyValue {
        MoneyValue::from(value)
    }

    fn spend(budget: &Budget, month: u32, day: u32, amount: i64) -> Transaction {
        Transaction::expense(
            None,
            NaiveDate::from_ymd_opt(budget.year, month, day).unwrap(),
            money(amount),
            budget.id,
            budget.slices()[0].id,
        )
        .unwrap()
    }

    fn fixture() -> YearlyOverview {
        let food = Budget::with_monthly_amount(2024, "Food", "🍎", BudgetKind::Expense, money(100))
            .unwrap();
        let home = Budget::with_monthly_amount(2024, "Home", "", BudgetKind::Expense, money(500))
            .unwrap();
        let txns = vec![
            spend(&food, 2, 10, 50),
            spend(&food, 1, 5, 50),
            spend(&home, 1, 1, 500),
        ];
        YearlyOverview::with_entries("Personal", 2024, money(1000), vec![food, home], txns).unwrap()
    }

    #[test]
    fn test_with_entries_rejects_bad_rows() {
        let food = Budget::with_monthly_amount(2024, "Food", "", BudgetKind::Expense, money(1))
            .unwrap();
        let again = Budget::with_monthly_amount(2024, "Food", "", BudgetKind::Expense, money(2))
            .unwrap();
        let old = Budget::with_monthly_amount(2023, "Old", "", BudgetKind::Expense, money(2))
            .unwrap();

        assert!(matches!(
            YearlyOverview::with_entries("P", 2024, money(0), vec![food.clone(), again], vec![]),
            Err(LedgerError::BudgetAlreadyExists(_))
        ));
        assert!(matches!(
            YearlyOverview::with_entries("P", 2024, money(0), vec![old], vec![]),
            Err(LedgerError::WrongYear { .. })
        ));

        let last_year =
            Budget::with_monthly_amount(2023, "X", "", BudgetKind::Expense, money(1)).unwrap();
        let stray = spend(&last_year, 1, 1, 1);
        assert!(matches!(
            YearlyOverview::with_entries("P", 2024, money(0), vec![food], vec![stray]),
            Err(LedgerError::TransactionYearMismatch { .. })
        ));
    }

    #[test]
    fn test_queries() {
        let overview = fixture();
        let food = overview.budget_named(" Food ").unwrap();

        let history = overview.transactions_for_budget(food.id);
        assert_eq!(history.len(), 2);
        assert!(history[0].date < history[1].date);
        assert_eq!(overview.transactions_in_month(1).len(), 2);

        let feb = overview.budget_monthly_overview(food.id, 2).unwrap();
        assert_eq!(feb.starting_amount, money(150));
        assert_eq!(feb.remaining_amount, money(100));

        assert!(overview.budget_monthly_overview(food.id, 13).is_err());
        assert!(overview
            .budget_monthly_overview(BudgetId::new(), 1)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_monthly_overview() {
        let overview = fixture();
        let as_of = AsOf::new(2024, 2).unwrap();
        let jan = overview.monthly_overview(1, as_of).unwrap();

        assert_eq!(jan.prospect.state(), MonthState::Closed);
        assert_eq!(jan.prospect.starting_balance, money(1000));
        assert_eq!(jan.prospect.forecasted_end_of_month_balance, money(400));
        assert_eq!(jan.prospect.balance.amount(), money(450));
        assert_eq!(jan.budgets[0].name, "Home");
        assert_eq!(jan.expenses_in_month, money(550));

        assert_eq!(overview.monthly_prospects(as_of).len(), 12);
        assert!(overview.monthly_overview(0, as_of).is_err());
    }

    #[test]
    fn test_remove_budget_drops_its_transactions() {
        let mut overview = fixture();
        let food_id = overview.budget_named("Food").unwrap().id;

        overview.remove_budgets(&HashSet::from([food_id]));
        assert!(overview.budget(food_id).is_none());
        assert_eq!(overview.transactions().len(), 1);
        assert_eq!(overview.prospect().actual_expenses, money(500));
    }

    #[test]
    fn test_slice_mutators() {
        let mut overview = fixture();
        let food_id = overview.budget_named("Food").unwrap().id;
        let extra = BudgetSlice::monthly("Snacks", money(20)).unwrap();
        let extra_id = extra.id;

        overview.push_slice(food_id, extra).unwrap();
        assert_eq!(overview.budget(food_id).unwrap().amount(), money(1440));

        let removed = overview
            .remove_slices(food_id, &HashSet::from([extra_id]))
            .unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(overview.budget(food_id).unwrap().slices().len(), 1);
    }
}
