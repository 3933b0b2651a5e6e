//! Per-budget, per-month overviews
//!
//! Both read models compare what a budget has accrued by a month against
//! what its transactions used. Consumption is read through the budget kind:
//! spending of 50 uses 50 of an expense budget, receiving 50 uses 50 of an
//! income budget.

use rust_decimal::Decimal;
use std::cmp::Ordering;

use crate::models::{Budget, BudgetId, BudgetKind, MoneyValue, Transaction};

/// Signed totals of a budget's transactions before and inside `month`
fn budget_totals(
    budget: &Budget,
    transactions: &[Transaction],
    month: u32,
) -> (MoneyValue, MoneyValue) {
    let mut before = MoneyValue::zero();
    let mut in_month = MoneyValue::zero();

    for transaction in transactions.iter().filter(|t| t.year() == budget.year) {
        let amount = transaction.amount_for_budget(budget.id);
        match transaction.month().cmp(&month) {
            Ordering::Less => before += amount,
            Ordering::Equal => in_month += amount,
            Ordering::Greater => {}
        }
    }

    (before, in_month)
}

/// How much of a budget is left at the start and end of a month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetMonthlyOverview {
    pub budget_id: BudgetId,
    pub month: u32,
    /// Accrued allotment minus what earlier months used
    pub starting_amount: MoneyValue,
    /// Starting amount minus what this month used
    pub remaining_amount: MoneyValue,
    /// `remaining / starting` clamped to 0..=1; zero when nothing is available
    pub remaining_amount_percentage: Decimal,
}

impl BudgetMonthlyOverview {
    pub fn new(budget: &Budget, transactions: &[Transaction], month: u32) -> Self {
        let (before, in_month) = budget_totals(budget, transactions, month);

        let starting_amount = budget.availability_up_to(month) - budget.kind.consumption(before);
        let remaining_amount = starting_amount - budget.kind.consumption(in_month);

        let remaining_amount_percentage = if starting_amount.is_positive() {
            remaining_amount
                .ratio(starting_amount)
                .unwrap_or(Decimal::ZERO)
                .clamp(Decimal::ZERO, Decimal::ONE)
        } else {
            Decimal::ZERO
        };

        Self {
            budget_id: budget.id,
            month,
            starting_amount,
            remaining_amount,
            remaining_amount_percentage,
        }
    }
}

/// A budget's month measured against its accrual-adjusted threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetOverview {
    pub budget_id: BudgetId,
    pub name: String,
    pub icon: String,
    pub kind: BudgetKind,
    pub month: u32,
    /// Allotment accrued from January through this month
    pub availability: MoneyValue,
    /// Signed total of the budget's transactions before this month
    pub transactions_up_to_month: MoneyValue,
    /// Signed total of the budget's transactions in this month
    pub transactions_in_month: MoneyValue,
    pub threshold_amount: MoneyValue,
    pub remaining_amount: MoneyValue,
    /// This month's usage as a positive amount
    pub amount_in_month: MoneyValue,
    /// `amount_in_month / threshold`; one ("fully used") without a positive threshold
    pub amount_percentage: Decimal,
}

impl BudgetOverview {
    pub fn new(budget: &Budget, transactions: &[Transaction], month: u32) -> Self {
        let (up_to, in_month) = budget_totals(budget, transactions, month);
        let availability = budget.availability_up_to(month);

        // Outflows are negative, so expense thresholds add them and income
        // thresholds subtract the inflows already received.
        let (threshold_amount, remaining_amount) = match budget.kind {
            BudgetKind::Expense => {
                let threshold = availability + up_to;
                (threshold, threshold + in_month)
            }
            BudgetKind::Income => {
                let threshold = availability - up_to;
                (threshold, threshold - in_month)
            }
        };

        let amount_in_month = budget.kind.consumption(in_month);
        let amount_percentage = if threshold_amount.is_positive() {
            amount_in_month
                .ratio(threshold_amount)
                .unwrap_or(Decimal::ONE)
                .max(Decimal::ZERO)
        } else {
            Decimal::ONE
        };

        Self {
            budget_id: budget.id,
            name: budget.name.clone(),
            icon: budget.icon.clone(),
            kind: budget.kind,
            month,
            availability,
            transactions_up_to_month: up_to,
            transactions_in_month: in_month,
            threshold_amount,
            remaining_amount,
            amount_in_month,
            amount_percentage,
        }
    }

    /// Check if this month used more than the threshold allows
    pub fn is_overspent(&self) -> bool {
        self.remaining_amount.is_negative()
    }
}

/// Overviews of every budget for `month`, heaviest activity first
pub fn budget_overviews(
    budgets: &[Budget],
    transactions: &[Transaction],
    month: u32,
) -> Vec<BudgetOverview> {
    let mut overviews: Vec<BudgetOverview> = budgets
        .iter()
        .map(|budget| BudgetOverview::new(budget, transactions, month))
        .collect();

    overviews.sort_by(|a, b| {
        b.transactions_in_month
            .abs()
            .cmp(&a.transactions_in_month.abs())
            .then_with(|| a.name.cmp(&b.name))
    });
    overviews
}
