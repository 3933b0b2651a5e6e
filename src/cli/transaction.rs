//! Transaction CLI commands

use std::collections::HashSet;

use chrono::{Datelike, Local, NaiveDate};
use clap::Subcommand;

use crate::display::format_transaction_register;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{BudgetKind, Transaction, TransactionId};
use crate::overview::{AsOf, YearlyOverview};

use super::{find_budget, CommandContext};

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Book money against a budget
    Add {
        /// Budget name
        budget: String,
        /// Amount, without sign
        amount: String,
        /// Slice name (defaults to the budget's first slice)
        #[arg(short, long)]
        slice: Option<String>,
        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'D', long)]
        description: Option<String>,
        /// Book a refund on an expense, or a correction on an income
        #[arg(short, long)]
        reverse: bool,
    },

    /// List transactions
    List {
        #[arg(short, long)]
        year: Option<i32>,
        /// Only this month
        #[arg(short, long)]
        month: Option<u32>,
        /// Only this budget
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Delete transactions by ID or ID prefix
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(short, long)]
        year: Option<i32>,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    ctx: &CommandContext<'_>,
    cmd: TransactionCommands,
) -> LedgerResult<()> {
    match cmd {
        TransactionCommands::Add {
            budget,
            amount,
            slice,
            date,
            description,
            reverse,
        } => {
            let date = match date {
                Some(text) => parse_date(&text)?,
                None => default_date(ctx.as_of),
            };
            let amount = ctx.settings.parse_money(&amount)?;

            let mut overview = ctx.load(Some(date.year()))?;
            let target = find_budget(&overview, &budget)?;
            let slice_id = match &slice {
                Some(name) => {
                    target
                        .slice_named(name)
                        .ok_or_else(|| LedgerError::slice_not_found(name.as_str()))?
                        .id
                }
                None => target
                    .slices()
                    .first()
                    .map(|s| s.id)
                    .ok_or(LedgerError::NoSlices)?,
            };

            let inflow = matches!(target.kind, BudgetKind::Income) != reverse;
            let transaction = if inflow {
                Transaction::income(description, date, amount, target.id, slice_id)?
            } else {
                Transaction::expense(description, date, amount, target.id, slice_id)?
            };

            let id = transaction.id;
            let signed = transaction.amount();
            ctx.service().add_transactions(&mut overview, vec![transaction])?;
            println!(
                "Added transaction {}: {} on {}",
                id.short(),
                ctx.settings.format_money(signed),
                date
            );
        }

        TransactionCommands::List {
            year,
            month,
            budget,
        } => {
            let overview = ctx.load(year)?;
            let mut transactions: Vec<&Transaction> = match &budget {
                Some(name) => {
                    let id = find_budget(&overview, name)?.id;
                    overview.transactions_for_budget(id)
                }
                None => {
                    let mut all: Vec<&Transaction> = overview.transactions().iter().collect();
                    all.sort_by_key(|t| t.date);
                    all
                }
            };
            if let Some(month) = month {
                let month = ctx.month(Some(month))?;
                transactions.retain(|t| t.is_in_month(month));
            }

            println!(
                "{}",
                format_transaction_register(&transactions, &overview, ctx.symbol())
            );
        }

        TransactionCommands::Delete { ids, year } => {
            let mut overview = ctx.load(year)?;
            let resolved: HashSet<TransactionId> = ids
                .iter()
                .map(|prefix| resolve_transaction(&overview, prefix))
                .collect::<LedgerResult<_>>()?;
            let count = ctx.service().delete_transactions(&mut overview, &resolved)?;
            println!("Deleted {} transaction(s)", count);
        }
    }

    Ok(())
}

fn parse_date(text: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| {
        LedgerError::Config(format!("Invalid date format: {}. Use YYYY-MM-DD", text))
    })
}

/// Today if it falls in the "now" month, else the first of that month
fn default_date(as_of: AsOf) -> NaiveDate {
    let today = Local::now().date_naive();
    if AsOf::from_date(today) == as_of {
        return today;
    }
    NaiveDate::from_ymd_opt(as_of.year, as_of.month, 1).unwrap_or(today)
}

/// Find the single transaction whose ID starts with `prefix`
fn resolve_transaction(overview: &YearlyOverview, prefix: &str) -> LedgerResult<TransactionId> {
    let prefix = prefix.trim().to_lowercase();
    let matches: Vec<TransactionId> = overview
        .transactions()
        .iter()
        .map(|t| t.id)
        .filter(|id| {
            id.to_string().starts_with(&prefix) || id.as_uuid().to_string().starts_with(&prefix)
        })
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(LedgerError::transaction_not_found(prefix)),
        _ => Err(LedgerError::Config(format!(
            "'{}' matches {} transactions, use a longer prefix",
            prefix,
            matches.len()
        ))),
    }
}
