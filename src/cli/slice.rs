//! Slice CLI commands

use clap::Subcommand;

use crate::error::LedgerResult;

use super::{find_budget, AllotmentArgs, CommandContext};

/// Slice subcommands
#[derive(Subcommand, Debug)]
pub enum SliceCommands {
    /// Add a slice to a budget
    Add {
        /// Budget name
        budget: String,
        /// Slice name
        name: String,
        #[command(flatten)]
        allotment: AllotmentArgs,
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Delete slices by position, as shown by `budget show`
    Delete {
        /// Budget name
        budget: String,
        #[arg(required = true)]
        positions: Vec<usize>,
        #[arg(short, long)]
        year: Option<i32>,
    },
}

/// Handle a slice command
pub fn handle_slice_command(ctx: &CommandContext<'_>, cmd: SliceCommands) -> LedgerResult<()> {
    match cmd {
        SliceCommands::Add {
            budget,
            name,
            allotment,
            year,
        } => {
            let mut overview = ctx.load(year)?;
            let budget_id = find_budget(&overview, &budget)?.id;
            let slice = allotment.build_slice(&name, ctx.settings)?;
            let amount = slice.amount();

            ctx.service().add_slice(&mut overview, budget_id, slice)?;
            println!(
                "Added slice '{}' to '{}': {} per year",
                name.trim(),
                budget,
                ctx.settings.format_money(amount)
            );
        }

        SliceCommands::Delete {
            budget,
            positions,
            year,
        } => {
            let mut overview = ctx.load(year)?;
            let budget_id = find_budget(&overview, &budget)?.id;
            let removed = ctx
                .service()
                .delete_slices_at(&mut overview, budget_id, &positions)?;

            if removed.is_empty() {
                println!("No slices at those positions");
            }
            for slice in removed {
                println!("Deleted slice '{}'", slice.name);
            }
        }
    }

    Ok(())
}
