//! Monthly and yearly overview formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::overview::{BalanceState, MonthlyOverview, MonthlyProspect, YearlyProspect};

use super::format::{format_bar, format_header, format_percentage, money, month_name, separator};

#[derive(Tabled)]
struct BudgetOverviewRow {
    #[tabled(rename = "Budget")]
    name: String,
    #[tabled(rename = "Threshold")]
    threshold: String,
    #[tabled(rename = "This month")]
    in_month: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
}

#[derive(Tabled)]
struct ProspectRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Planned start")]
    starting: String,
    #[tabled(rename = "Planned end")]
    forecast: String,
    #[tabled(rename = "Actual")]
    actual: String,
    #[tabled(rename = "State")]
    state: String,
}

fn balance_text(balance: &BalanceState, symbol: &str) -> String {
    match balance {
        BalanceState::Closed(amount) | BalanceState::Current(amount) => money(*amount, symbol),
        BalanceState::Future { .. } => "-".to_string(),
    }
}

/// Format one month: the balance line followed by every budget
pub fn format_monthly_overview(overview: &MonthlyOverview, year: i32, symbol: &str) -> String {
    let prospect = &overview.prospect;
    let mut output = String::new();

    output.push_str(&format_header(&format!("{} {}", month_name(prospect.month), year), 60));
    output.push('\n');
    output.push_str(&separator(60));
    output.push('\n');
    output.push_str(&format!(
        "Planned: {} -> {}   Actual: {} ({})\n",
        money(prospect.starting_balance, symbol),
        money(prospect.forecasted_end_of_month_balance, symbol),
        balance_text(&prospect.balance, symbol),
        prospect.state(),
    ));
    output.push_str(&format!(
        "Spent: {}   Received: {}\n\n",
        money(overview.expenses_in_month, symbol),
        money(overview.income_in_month, symbol),
    ));

    if overview.budgets.is_empty() {
        output.push_str("No budgets found.\n");
        return output;
    }

    let rows: Vec<BudgetOverviewRow> = overview
        .budgets
        .iter()
        .map(|b| BudgetOverviewRow {
            name: if b.icon.is_empty() {
                b.name.clone()
            } else {
                format!("{} {}", b.icon, b.name)
            },
            threshold: money(b.threshold_amount, symbol),
            in_month: money(b.amount_in_month, symbol),
            remaining: money(b.remaining_amount, symbol),
            used: format!(
                "{} {:>5}",
                format_bar(b.amount_percentage, 10),
                format_percentage(b.amount_percentage)
            ),
        })
        .collect();

    output.push_str(
        &Table::new(rows)
            .with(Style::psql())
            .modify(Columns::new(1..4), Alignment::right())
            .to_string(),
    );
    output.push('\n');
    output
}

/// Format all months of a year side by side with the plan
pub fn format_prospects(prospects: &[MonthlyProspect], symbol: &str) -> String {
    let rows: Vec<ProspectRow> = prospects
        .iter()
        .map(|p| ProspectRow {
            month: month_name(p.month).to_string(),
            starting: money(p.starting_balance, symbol),
            forecast: money(p.forecasted_end_of_month_balance, symbol),
            actual: balance_text(&p.balance, symbol),
            state: p.state().to_string(),
        })
        .collect();

    Table::new(rows)
        .with(Style::psql())
        .modify(Columns::new(1..4), Alignment::right())
        .to_string()
}

/// Format the whole-year summary
pub fn format_yearly_prospect(prospect: &YearlyProspect, name: &str, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} {}\n", name, prospect.year));
    output.push_str(&separator(40));
    output.push('\n');

    let lines = [
        ("Opening balance", prospect.opening_balance),
        ("Planned income", prospect.planned_income),
        ("Planned expenses", prospect.planned_expenses),
        ("Forecast year end", prospect.forecasted_year_end_balance),
        ("Income so far", prospect.actual_income),
        ("Expenses so far", prospect.actual_expenses),
        ("Balance", prospect.actual_balance),
    ];
    for (label, amount) in lines {
        output.push_str(&format!("{:<20} {:>16}\n", label, money(amount, symbol)));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, BudgetKind, MoneyValue, Transaction};
    use crate::overview::{AsOf, YearlyOverview};
    use chrono::NaiveDate;

    fn overview() -> YearlyOverview {
        let rent = Budget::with_monthly_amount(
            2024,
            "Rent",
            "🏠",
            BudgetKind::Expense,
            MoneyValue::from(800),
        )
        .unwrap();
        let txn = Transaction::expense(
            Some("March rent".into()),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            MoneyValue::from(800),
            rent.id,
            rent.slices()[0].id,
        )
        .unwrap();
        let opening = MoneyValue::from(5000);
        YearlyOverview::with_entries("Personal", 2024, opening, vec![rent], vec![txn]).unwrap()
    }

    #[test]
    fn test_format_monthly_overview() {
        let overview = overview();
        let as_of = AsOf::new(2024, 3).unwrap();
        let month = overview.monthly_overview(3, as_of).unwrap();
        let output = format_monthly_overview(&month, 2024, "$");

        assert!(output.contains("March 2024"));
        assert!(output.contains("Spent: $800.00"));
        assert!(output.contains("🏠 Rent"));
        assert!(output.contains("$2400.00"));
        assert!(output.contains("current"));
    }

    #[test]
    fn test_format_prospects_hides_future_balances() {
        let overview = overview();
        let as_of = AsOf::new(2024, 3).unwrap();
        let output = format_prospects(&overview.monthly_prospects(as_of), "$");

        assert!(output.contains("January"));
        assert!(output.contains("$4200.00"));
        assert!(output.contains("future"));
    }

    #[test]
    fn test_format_yearly_prospect() {
        let overview = overview();
        let output = format_yearly_prospect(&overview.prospect(), &overview.name, "$");

        assert!(output.contains("Personal 2024"));
        assert!(output.contains("$9600.00"));
        assert!(output.contains("-$4600.00"));
    }
}
