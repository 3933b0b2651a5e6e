//! Budget display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::{Budget, SliceConfiguration};
use crate::overview::BudgetMonthlyOverview;

use super::format::{format_bar, format_percentage, money, month_name, separator};

/// Budget name prefixed with its icon, if it has one
pub fn budget_label(budget: &Budget) -> String {
    if budget.icon.is_empty() {
        budget.name.clone()
    } else {
        format!("{} {}", budget.icon, budget.name)
    }
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Budget")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Slices")]
    slices: usize,
    #[tabled(rename = "Yearly")]
    amount: String,
}

/// Format the budgets of a year as a table
pub fn format_budget_list(budgets: &[Budget], symbol: &str) -> String {
    if budgets.is_empty() {
        return "No budgets found.".to_string();
    }

    let rows: Vec<BudgetRow> = budgets
        .iter()
        .enumerate()
        .map(|(index, budget)| BudgetRow {
            index,
            name: budget_label(budget),
            kind: budget.kind.to_string(),
            slices: budget.slices().len(),
            amount: money(budget.amount(), symbol),
        })
        .collect();

    Table::new(rows)
        .with(Style::psql())
        .modify(Columns::new(3..), Alignment::right())
        .to_string()
}

/// Format one budget with its slices and, if given, how a month stands
pub fn format_budget_details(
    budget: &Budget,
    month: Option<&BudgetMonthlyOverview>,
    symbol: &str,
) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} ({}, {})\n", budget_label(budget), budget.kind, budget.year));
    output.push_str(&separator(40));
    output.push('\n');

    for (index, slice) in budget.slices().iter().enumerate() {
        match &slice.configuration {
            SliceConfiguration::Monthly { amount } => {
                output.push_str(&format!(
                    "  [{}] {:<20} {} / month\n",
                    index,
                    slice.name,
                    money(*amount, symbol)
                ));
            }
            SliceConfiguration::Scheduled { schedules } => {
                output.push_str(&format!("  [{}] {:<20} scheduled\n", index, slice.name));
                for entry in schedules {
                    output.push_str(&format!(
                        "        {:<12} {}\n",
                        month_name(entry.month),
                        money(entry.amount, symbol)
                    ));
                }
            }
        }
    }

    output.push_str(&format!("  Yearly total: {}\n", money(budget.amount(), symbol)));

    if let Some(overview) = month {
        output.push_str(&format!(
            "\n{}: starting {}, remaining {}\n  {} {}\n",
            month_name(overview.month),
            money(overview.starting_amount, symbol),
            money(overview.remaining_amount, symbol),
            format_bar(overview.remaining_amount_percentage, 20),
            format_percentage(overview.remaining_amount_percentage),
        ));
    }

    output
}
