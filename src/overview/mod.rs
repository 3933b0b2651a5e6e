//! Read models over a year of budgets and transactions
//!
//! Everything here is computed on demand from the budgets and transactions
//! held by a [`YearlyOverview`]. Nothing is cached and nothing logs; the
//! only notion of "now" is the [`AsOf`] passed in by the caller.

mod as_of;
mod budget_overview;
mod prospect;
mod yearly;

pub use as_of::{AsOf, MonthState};
pub use budget_overview::{budget_overviews, BudgetMonthlyOverview, BudgetOverview};
pub use prospect::{
    monthly_prospects, BalanceState, MonthlyOverview, MonthlyProspect, YearlyProspect,
};
pub use yearly::YearlyOverview;
