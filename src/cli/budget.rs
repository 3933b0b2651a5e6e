//! Budget CLI commands

use std::collections::HashSet;

use clap::Subcommand;

use crate::display::{format_budget_details, format_budget_list};
use crate::error::LedgerResult;
use crate::models::{Budget, BudgetId, BudgetKind, DEFAULT_SLICE_NAME};

use super::{find_budget, AllotmentArgs, CommandContext};

/// Budget subcommands
#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Create a budget with one slice
    Add {
        /// Budget name
        name: String,
        #[command(flatten)]
        allotment: AllotmentArgs,
        /// Budget kind: expense or income
        #[arg(short, long, default_value = "expense")]
        kind: BudgetKind,
        /// Icon shown next to the name
        #[arg(short, long, default_value = "")]
        icon: String,
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// List the budgets of a year
    List {
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Show a budget's slices and how a month stands
    Show {
        name: String,
        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Rename a budget or change its icon
    Rename {
        name: String,
        new_name: String,
        #[arg(short, long)]
        icon: Option<String>,
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Delete budgets and their transactions
    Delete {
        #[arg(required = true)]
        names: Vec<String>,
        #[arg(short, long)]
        year: Option<i32>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(ctx: &CommandContext<'_>, cmd: BudgetCommands) -> LedgerResult<()> {
    match cmd {
        BudgetCommands::Add {
            name,
            allotment,
            kind,
            icon,
            year,
        } => {
            let mut overview = ctx.load(year)?;
            let slice = allotment.build_slice(DEFAULT_SLICE_NAME, ctx.settings)?;
            let budget = Budget::new(overview.year, name, icon, kind, vec![slice])?;
            let id = ctx.service().add_budget(&mut overview, budget)?;

            if let Some(budget) = overview.budget(id) {
                println!(
                    "Created {} budget '{}' for {}: {} per year",
                    budget.kind,
                    budget.name,
                    budget.year,
                    ctx.settings.format_money(budget.amount())
                );
            }
        }

        BudgetCommands::List { year } => {
            let overview = ctx.load(year)?;
            println!("{}", format_budget_list(overview.budgets(), ctx.symbol()));
        }

        BudgetCommands::Show { name, month, year } => {
            let overview = ctx.load(year)?;
            let month = ctx.month(month)?;
            let budget = find_budget(&overview, &name)?;
            let month_overview = overview.budget_monthly_overview(budget.id, month)?;
            print!(
                "{}",
                format_budget_details(budget, Some(&month_overview), ctx.symbol())
            );
        }

        BudgetCommands::Rename {
            name,
            new_name,
            icon,
            year,
        } => {
            let mut overview = ctx.load(year)?;
            let id = find_budget(&overview, &name)?.id;
            ctx.service()
                .update_budget(&mut overview, id, &new_name, icon.as_deref())?;
            println!("Renamed '{}' to '{}'", name, new_name.trim());
        }

        BudgetCommands::Delete { names, year } => {
            let mut overview = ctx.load(year)?;
            let ids: HashSet<BudgetId> = names
                .iter()
                .map(|name| find_budget(&overview, name).map(|b| b.id))
                .collect::<LedgerResult<_>>()?;
            let deleted = ctx.service().delete_budgets(&mut overview, &ids)?;
            println!("Deleted {} budget(s)", deleted.len());
        }
    }

    Ok(())
}
