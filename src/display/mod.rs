//! Display formatting for terminal output
//!
//! Tables and detail views of budgets, transactions and overviews. Amounts
//! are shown with the currency symbol passed in by the caller.

pub mod budget;
pub mod format;
pub mod overview;
pub mod transaction;

pub use budget::{format_budget_details, format_budget_list};
pub use overview::{format_monthly_overview, format_prospects, format_yearly_prospect};
pub use transaction::format_transaction_register;
