//! Month-by-month and whole-year balance projections

use crate::models::{Budget, BudgetKind, MoneyValue, Transaction, MONTHS};

use super::as_of::{AsOf, MonthState};
use super::budget_overview::BudgetOverview;

/// The balance of a month, depending on whether it has happened yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceState {
    /// Final balance of a past month
    Closed(MoneyValue),
    /// Running balance of the month in progress
    Current(MoneyValue),
    /// A month that has not started
    Future { trending: MoneyValue },
}

impl BalanceState {
    pub fn amount(&self) -> MoneyValue {
        match self {
            Self::Closed(amount) | Self::Current(amount) => *amount,
            Self::Future { trending } => *trending,
        }
    }

    pub fn state(&self) -> MonthState {
        match self {
            Self::Closed(_) => MonthState::Closed,
            Self::Current(_) => MonthState::Current,
            Self::Future { .. } => MonthState::Future,
        }
    }
}

/// Planned and actual balances of one month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyProspect {
    pub year: i32,
    pub month: u32,
    /// Where the plan says the month starts
    pub starting_balance: MoneyValue,
    /// Where the plan says the month ends
    pub forecasted_end_of_month_balance: MoneyValue,
    /// Opening balance plus every transaction before this month
    pub actual_starting_balance: MoneyValue,
    /// Signed total of this month's transactions
    pub actual_in_month: MoneyValue,
    pub balance: BalanceState,
}

impl MonthlyProspect {
    pub fn state(&self) -> MonthState {
        self.balance.state()
    }

    /// Difference between the plan and what actually happened
    pub fn deviation(&self) -> MoneyValue {
        self.balance.amount() - self.forecasted_end_of_month_balance
    }
}

/// Twelve prospects for `year`, January first
///
/// The planned side rolls forward: each month starts where the previous
/// month's forecast ended. The actual side rolls forward from the same
/// opening balance using booked transactions.
pub fn monthly_prospects(
    budgets: &[Budget],
    transactions: &[Transaction],
    year: i32,
    opening_balance: MoneyValue,
    as_of: AsOf,
) -> Vec<MonthlyProspect> {
    let mut starting_balance = opening_balance;
    let mut actual_starting_balance = opening_balance;

    MONTHS
        .map(|month| {
            let planned: MoneyValue = budgets
                .iter()
                .map(|b| b.kind.signed(b.availability_for(month)))
                .sum();
            let actual_in_month: MoneyValue = transactions
                .iter()
                .filter(|t| t.year() == year && t.month() == month)
                .map(Transaction::amount)
                .sum();

            let forecasted_end_of_month_balance = starting_balance + planned;
            let actual_end = actual_starting_balance + actual_in_month;
            let balance = match as_of.classify(year, month) {
                MonthState::Closed => BalanceState::Closed(actual_end),
                MonthState::Current => BalanceState::Current(actual_end),
                MonthState::Future => BalanceState::Future {
                    trending: MoneyValue::zero(),
                },
            };

            let prospect = MonthlyProspect {
                year,
                month,
                starting_balance,
                forecasted_end_of_month_balance,
                actual_starting_balance,
                actual_in_month,
                balance,
            };

            starting_balance = forecasted_end_of_month_balance;
            actual_starting_balance = actual_end;
            prospect
        })
        .collect()
}

/// One month of the ledger: its prospect plus every budget's overview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyOverview {
    pub prospect: MonthlyProspect,
    /// Sorted by activity in the month, heaviest first
    pub budgets: Vec<BudgetOverview>,
    pub expenses_in_month: MoneyValue,
    pub income_in_month: MoneyValue,
}

impl MonthlyOverview {
    pub fn new(prospect: MonthlyProspect, budgets: Vec<BudgetOverview>) -> Self {
        let total_for = |kind: BudgetKind| -> MoneyValue {
            budgets
                .iter()
                .filter(|o| o.kind == kind)
                .map(|o| o.amount_in_month)
                .sum()
        };
        let expenses_in_month = total_for(BudgetKind::Expense);
        let income_in_month = total_for(BudgetKind::Income);

        Self {
            prospect,
            budgets,
            expenses_in_month,
            income_in_month,
        }
    }

    pub fn month(&self) -> u32 {
        self.prospect.month
    }
}

/// Summary of the whole year against its plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearlyProspect {
    pub year: i32,
    pub opening_balance: MoneyValue,
    pub planned_expenses: MoneyValue,
    pub planned_income: MoneyValue,
    pub forecasted_year_end_balance: MoneyValue,
    pub actual_expenses: MoneyValue,
    pub actual_income: MoneyValue,
    pub actual_balance: MoneyValue,
}

impl YearlyProspect {
    pub fn new(
        budgets: &[Budget],
        transactions: &[Transaction],
        year: i32,
        opening_balance: MoneyValue,
    ) -> Self {
        let planned_for = |kind: BudgetKind| -> MoneyValue {
            budgets
                .iter()
                .filter(|b| b.kind == kind)
                .map(Budget::amount)
                .sum()
        };
        let planned_expenses = planned_for(BudgetKind::Expense);
        let planned_income = planned_for(BudgetKind::Income);

        let mut actual_expenses = MoneyValue::zero();
        let mut actual_income = MoneyValue::zero();
        for entry in transactions
            .iter()
            .filter(|t| t.year() == year)
            .flat_map(|t| t.amounts())
        {
            if entry.amount.is_negative() {
                actual_expenses += entry.amount.abs();
            } else {
                actual_income += entry.amount;
            }
        }

        Self {
            year,
            opening_balance,
            planned_expenses,
            planned_income,
            forecasted_year_end_balance: opening_balance + planned_income - planned_expenses,
            actual_expenses,
            actual_income,
            actual_balance: opening_balance + actual_income - actual_expenses,
        }
    }
}
