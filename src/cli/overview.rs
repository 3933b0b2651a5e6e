//! Overview CLI commands

use clap::Subcommand;

use crate::display::format::{format_bar, format_percentage, money, month_name};
use crate::display::{format_monthly_overview, format_prospects, format_yearly_prospect};
use crate::error::LedgerResult;

use super::{find_budget, CommandContext};

/// Overview subcommands
#[derive(Subcommand, Debug)]
pub enum OverviewCommands {
    /// Balance and budgets of one month
    Month {
        #[arg(short, long)]
        month: Option<u32>,
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Plan and actuals of the whole year
    Year {
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// How one budget stands in a month
    Budget {
        name: String,
        #[arg(short, long)]
        month: Option<u32>,
        #[arg(short, long)]
        year: Option<i32>,
    },
}

/// Handle an overview command
pub fn handle_overview_command(
    ctx: &CommandContext<'_>,
    cmd: OverviewCommands,
) -> LedgerResult<()> {
    match cmd {
        OverviewCommands::Month { month, year } => {
            let overview = ctx.load(year)?;
            let month = ctx.month(month)?;
            let monthly = overview.monthly_overview(month, ctx.as_of)?;
            print!("{}", format_monthly_overview(&monthly, overview.year, ctx.symbol()));
        }

        OverviewCommands::Year { year } => {
            let overview = ctx.load(year)?;
            print!(
                "{}",
                format_yearly_prospect(&overview.prospect(), &overview.name, ctx.symbol())
            );
            println!();
            println!(
                "{}",
                format_prospects(&overview.monthly_prospects(ctx.as_of), ctx.symbol())
            );
        }

        OverviewCommands::Budget { name, month, year } => {
            let overview = ctx.load(year)?;
            let month = ctx.month(month)?;
            let id = find_budget(&overview, &name)?.id;
            let budget = overview.budget_overview(id, month)?;
            let symbol = ctx.symbol();

            println!("{} {}, {} {}", budget.icon, budget.name, month_name(month), overview.year);
            println!("  Available up to month: {}", money(budget.availability, symbol));
            println!("  Booked before month:   {}", money(budget.transactions_up_to_month, symbol));
            println!("  Threshold:             {}", money(budget.threshold_amount, symbol));
            println!("  Booked in month:       {}", money(budget.transactions_in_month, symbol));
            println!("  Remaining:             {}", money(budget.remaining_amount, symbol));
            println!(
                "  {} {}{}",
                format_bar(budget.amount_percentage, 20),
                format_percentage(budget.amount_percentage),
                if budget.is_overspent() { "  OVERSPENT" } else { "" }
            );
        }
    }

    Ok(())
}
