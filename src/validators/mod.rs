//! Stateless validators shared by the models and the yearly overview
//!
//! Budget-level checks live in [`BudgetValidator`]; checks that need the
//! whole list of a year's budgets live in [`YearlyOverviewValidator`].

mod budget;
mod yearly;

pub use budget::BudgetValidator;
pub use yearly::YearlyOverviewValidator;
