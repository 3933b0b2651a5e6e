//! Name and slice-list checks for a single budget

use std::collections::HashSet;

use crate::error::{LedgerError, LedgerResult};
use crate::models::BudgetSlice;

/// Checks a budget's own name and slices
///
/// Used by [`crate::models::Budget`] on every mutation and by any draft
/// that wants to preflight a budget before building it.
pub struct BudgetValidator;

impl BudgetValidator {
    /// The name must not be empty or blank
    pub fn can_use_name(name: &str) -> LedgerResult<()> {
        if name.trim().is_empty() {
            return Err(LedgerError::NameNotValid);
        }
        Ok(())
    }

    /// The slice list must be non-empty and free of duplicate names
    pub fn can_use_slices(slices: &[BudgetSlice]) -> LedgerResult<()> {
        if slices.is_empty() {
            return Err(LedgerError::NoSlices);
        }

        let mut seen = HashSet::with_capacity(slices.len());
        for slice in slices {
            if !seen.insert(slice.name.as_str()) {
                return Err(LedgerError::DuplicateSliceName(slice.name.clone()));
            }
        }
        Ok(())
    }
}
