//! Transaction register formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::Transaction;
use crate::overview::YearlyOverview;

use super::format::{money, truncate};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Budget / Slice")]
    target: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format transactions as a register, one row per amount entry
///
/// Budget and slice names are looked up in `overview`; entries pointing at
/// something it no longer holds show as `?`.
pub fn format_transaction_register(
    transactions: &[&Transaction],
    overview: &YearlyOverview,
    symbol: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let mut rows = Vec::new();
    for txn in transactions {
        for (position, entry) in txn.amounts().iter().enumerate() {
            let budget = overview.budget(entry.budget_id);
            let budget_name = budget.map(|b| b.name.as_str()).unwrap_or("?");
            let slice_name = budget
                .and_then(|b| b.slice(entry.slice_id))
                .map(|s| s.name.as_str())
                .unwrap_or("?");

            let first = position == 0;
            rows.push(TransactionRow {
                id: if first { txn.id.short() } else { String::new() },
                date: if first { txn.date.format("%Y-%m-%d").to_string() } else { String::new() },
                description: if first {
                    truncate(txn.description.as_deref().unwrap_or(""), 24)
                } else {
                    String::new()
                },
                target: format!("{} / {}", budget_name, slice_name),
                amount: money(entry.amount, symbol),
            });
        }
    }

    Table::new(rows)
        .with(Style::psql())
        .modify(Columns::new(4..), Alignment::right())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, BudgetKind, MoneyValue, TransactionAmount};
    use chrono::NaiveDate;

    #[test]
    fn test_register_lists_every_entry() {
        let food = Budget::with_monthly_amount(
            2024,
            "Food",
            "",
            BudgetKind::Expense,
            MoneyValue::from(100),
        )
        .unwrap();
        let home = Budget::with_monthly_amount(
            2024,
            "Home",
            "",
            BudgetKind::Expense,
            MoneyValue::from(100),
        )
        .unwrap();
        let split = Transaction::new(
            Some("Market".into()),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            vec![
                TransactionAmount::new(MoneyValue::from(-30), food.id, food.slices()[0].id),
                TransactionAmount::new(MoneyValue::from(-12), home.id, home.slices()[0].id),
            ],
        )
        .unwrap();
        let overview = YearlyOverview::with_entries(
            "Personal",
            2024,
            MoneyValue::zero(),
            vec![food],
            vec![split.clone()],
        )
        .unwrap();

        let output = format_transaction_register(&[&split], &overview, "$");
        assert!(output.contains("Market"));
        assert!(output.contains("Food / Default"));
        assert!(output.contains("? / ?"));
        assert!(output.contains("-$12.00"));
        assert!(output.contains(&split.id.short()));
    }

    #[test]
    fn test_empty_register() {
        let overview = YearlyOverview::new("Personal", 2024, MoneyValue::zero());
        assert_eq!(
            format_transaction_register(&[], &overview, "$"),
            "No transactions found."
        );
    }
}
