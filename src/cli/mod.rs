//! CLI command handlers
//!
//! This module bridges clap argument parsing with the overview service.
//! Every handler loads the overview of the requested year, applies one
//! change or prints one view, and returns.

pub mod budget;
pub mod overview;
pub mod slice;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use overview::{handle_overview_command, OverviewCommands};
pub use slice::{handle_slice_command, SliceCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use clap::Args;

use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{check_month, Budget, BudgetSlice, ScheduleDraft, ScheduledAmount};
use crate::overview::{AsOf, YearlyOverview};
use crate::services::OverviewService;
use crate::storage::LedgerStore;

/// What every handler needs: the store, the settings and "now"
pub struct CommandContext<'a> {
    pub store: &'a dyn LedgerStore,
    pub settings: &'a Settings,
    pub as_of: AsOf,
}

impl<'a> CommandContext<'a> {
    pub fn new(store: &'a dyn LedgerStore, settings: &'a Settings, as_of: AsOf) -> Self {
        Self {
            store,
            settings,
            as_of,
        }
    }

    pub fn service(&self) -> OverviewService<'a, dyn LedgerStore + 'a> {
        OverviewService::new(self.store)
    }

    /// The given year, or the current one
    pub fn year(&self, year: Option<i32>) -> i32 {
        year.unwrap_or(self.as_of.year)
    }

    /// The given month, or the current one
    pub fn month(&self, month: Option<u32>) -> LedgerResult<u32> {
        let month = month.unwrap_or(self.as_of.month);
        check_month(month)?;
        Ok(month)
    }

    /// Load the overview of a year with its configured opening balance
    pub fn load(&self, year: Option<i32>) -> LedgerResult<YearlyOverview> {
        let year = self.year(year);
        self.service().load(
            &self.settings.overview_name,
            year,
            self.settings.opening_balance(year),
        )
    }

    pub fn symbol(&self) -> &str {
        &self.settings.currency_symbol
    }
}

/// Look a budget up by name
pub(crate) fn find_budget<'o>(
    overview: &'o YearlyOverview,
    name: &str,
) -> LedgerResult<&'o Budget> {
    overview
        .budget_named(name)
        .ok_or_else(|| LedgerError::budget_not_found(name))
}

/// How a new slice earns its money
#[derive(Args, Debug, Clone, Default)]
pub struct AllotmentArgs {
    /// Amount available every month
    #[arg(short, long, conflicts_with = "schedule")]
    pub monthly: Option<String>,

    /// Amount available in one month, as MONTH=AMOUNT (repeatable)
    #[arg(short, long, value_name = "MONTH=AMOUNT")]
    pub schedule: Vec<String>,
}

impl AllotmentArgs {
    /// Build a slice called `name` from the arguments
    pub fn build_slice(&self, name: &str, settings: &Settings) -> LedgerResult<BudgetSlice> {
        if let Some(amount) = &self.monthly {
            return BudgetSlice::monthly(name, settings.parse_money(amount)?);
        }

        let mut draft = ScheduleDraft::new();
        for entry in &self.schedule {
            draft.add(parse_schedule_entry(entry, settings)?)?;
        }
        draft.build(name)
    }
}

/// Parse `MONTH=AMOUNT`, e.g. `3=600` or `12=1.250,00`
fn parse_schedule_entry(text: &str, settings: &Settings) -> LedgerResult<ScheduledAmount> {
    let (month, amount) = text
        .split_once('=')
        .ok_or_else(|| LedgerError::Config(format!("Expected MONTH=AMOUNT, got '{}'", text)))?;

    let month: u32 = month
        .trim()
        .parse()
        .map_err(|_| LedgerError::Config(format!("Invalid month in '{}'", text)))?;
    check_month(month)?;

    Ok(ScheduledAmount::new(settings.parse_money(amount)?, month))
}
