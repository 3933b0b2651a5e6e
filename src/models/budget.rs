//! Budget model
//!
//! A budget is a named, year-scoped collection of slices. The slice list is
//! never empty and never holds two slices with the same name; every mutation
//! re-checks that and leaves the budget untouched when the check fails.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::ids::{BudgetId, SliceId};
use super::money::MoneyValue;
use super::slice::BudgetSlice;
use crate::error::{LedgerError, LedgerResult};
use crate::validators::BudgetValidator;

/// Name of the slice created by [`Budget::with_monthly_amount`]
pub const DEFAULT_SLICE_NAME: &str = "Default";

/// Whether a budget plans spending or earnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetKind {
    #[default]
    Expense,
    Income,
}

impl BudgetKind {
    /// Contribution of a planned amount to the running balance
    ///
    /// Expense allowances lower the balance, income allowances raise it.
    pub fn signed(&self, amount: MoneyValue) -> MoneyValue {
        match self {
            Self::Expense => -amount,
            Self::Income => amount,
        }
    }

    /// How much of the allowance a signed transaction total uses up
    ///
    /// Outflows are stored negative, so an expense of 50 is `-50` and
    /// consumes 50 of an expense budget; an inflow of 50 consumes 50 of an
    /// income budget.
    pub fn consumption(&self, signed_total: MoneyValue) -> MoneyValue {
        match self {
            Self::Expense => -signed_total,
            Self::Income => signed_total,
        }
    }
}

impl fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "Expense"),
            Self::Income => write!(f, "Income"),
        }
    }
}

impl FromStr for BudgetKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "expenses" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(LedgerError::Config(format!(
                "Unknown budget kind '{}', expected 'expense' or 'income'",
                other
            ))),
        }
    }
}

/// A named, year-scoped collection of slices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub year: i32,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub kind: BudgetKind,
    slices: Vec<BudgetSlice>,
}

impl Budget {
    /// Create a budget from an initial slice list
    pub fn new(
        year: i32,
        name: impl Into<String>,
        icon: impl Into<String>,
        kind: BudgetKind,
        slices: Vec<BudgetSlice>,
    ) -> LedgerResult<Self> {
        let name = name.into().trim().to_string();
        BudgetValidator::can_use_name(&name)?;
        BudgetValidator::can_use_slices(&slices)?;

        Ok(Self {
            id: BudgetId::new(),
            year,
            name,
            icon: icon.into(),
            kind,
            slices,
        })
    }

    /// Create a budget with a single default slice earning `monthly_amount`
    pub fn with_monthly_amount(
        year: i32,
        name: impl Into<String>,
        icon: impl Into<String>,
        kind: BudgetKind,
        monthly_amount: MoneyValue,
    ) -> LedgerResult<Self> {
        let slice = BudgetSlice::monthly(DEFAULT_SLICE_NAME, monthly_amount)?;
        Self::new(year, name, icon, kind, vec![slice])
    }

    pub fn slices(&self) -> &[BudgetSlice] {
        &self.slices
    }

    pub fn slice(&self, id: SliceId) -> Option<&BudgetSlice> {
        self.slices.iter().find(|s| s.id == id)
    }

    pub fn slice_named(&self, name: &str) -> Option<&BudgetSlice> {
        let name = name.trim();
        self.slices.iter().find(|s| s.name == name)
    }

    pub fn contains_slice(&self, id: SliceId) -> bool {
        self.slices.iter().any(|s| s.id == id)
    }

    /// Append a slice at the end of the list
    pub fn append(&mut self, slice: BudgetSlice) -> LedgerResult<()> {
        if self.slices.iter().any(|s| s.name == slice.name) {
            return Err(LedgerError::SliceAlreadyExists(slice.name));
        }
        self.slices.push(slice);
        Ok(())
    }

    /// Delete the slices with the given IDs
    ///
    /// IDs that do not belong to this budget are ignored. Nothing is removed
    /// if the budget would be left without slices.
    pub fn delete_slices(&mut self, ids: &HashSet<SliceId>) -> LedgerResult<Vec<BudgetSlice>> {
        let (removed, kept): (Vec<BudgetSlice>, Vec<BudgetSlice>) = self
            .slices
            .iter()
            .cloned()
            .partition(|s| ids.contains(&s.id));

        BudgetValidator::can_use_slices(&kept)?;
        self.slices = kept;
        Ok(removed)
    }

    /// Rename the budget and optionally change its icon
    ///
    /// Uniqueness among sibling budgets is checked by the yearly overview.
    pub fn update(&mut self, name: &str, icon: Option<&str>) -> LedgerResult<()> {
        let name = name.trim();
        BudgetValidator::can_use_name(name)?;
        self.name = name.to_string();
        if let Some(icon) = icon {
            self.icon = icon.to_string();
        }
        Ok(())
    }

    /// Annual total of all slices
    pub fn amount(&self) -> MoneyValue {
        self.slices.iter().map(|s| s.amount()).sum()
    }

    /// Allotment accrued from January through `month`, inclusive
    pub fn availability_up_to(&self, month: u32) -> MoneyValue {
        self.slices.iter().map(|s| s.availability_up_to(month)).sum()
    }

    /// Allotment accrued in `month` alone
    pub fn availability_for(&self, month: u32) -> MoneyValue {
        self.slices.iter().map(|s| s.availability_for(month)).sum()
    }

    /// IDs of the slices at the given positions, skipping positions out of range
    pub fn slice_ids_at(&self, indices: &[usize]) -> Vec<SliceId> {
        self.slices_at(indices).into_iter().map(|s| s.id).collect()
    }

    /// Slices at the given positions, skipping positions out of range
    pub fn slices_at(&self, indices: &[usize]) -> Vec<&BudgetSlice> {
        indices.iter().filter_map(|&i| self.slices.get(i)).collect()
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({}, {})", self.icon, self.name, self.kind, self.amount())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::slice::ScheduledAmount;

    fn money(value: i64) -> MoneyValue {
        MoneyValue::from(value)
    }

    fn monthly(name: &str, amount: i64) -> BudgetSlice {
        BudgetSlice::monthly(name, money(amount)).unwrap()
    }

    fn test_budget() -> Budget {
        Budget::new(
            2024,
            "Home",
            "house",
            BudgetKind::Expense,
            vec![monthly("Rent", 100), monthly("Power", 50)],
        )
        .unwrap()
    }

    #[test]
    fn test_new_budget() {
        let budget = test_budget();
        assert_eq!(budget.year, 2024);
        assert_eq!(budget.slices().len(), 2);
        assert_eq!(budget.amount(), money(1800));
    }

    #[test]
    fn test_new_budget_validation() {
        assert!(matches!(
            Budget::new(2024, " ", "", BudgetKind::Expense, vec![monthly("Rent", 1)]),
            Err(LedgerError::NameNotValid)
        ));
        assert!(matches!(
            Budget::new(2024, "Home", "", BudgetKind::Expense, vec![]),
            Err(LedgerError::NoSlices)
        ));
    }

    #[test]
    fn test_duplicate_slice_name_rejected() {
        let result = Budget::new(
            2024,
            "Home",
            "",
            BudgetKind::Expense,
            vec![monthly("Rent", 100), monthly("Rent", 50)],
        );
        assert!(matches!(result, Err(LedgerError::DuplicateSliceName(name)) if name == "Rent"));
    }

    #[test]
    fn test_with_monthly_amount() {
        let budget =
            Budget::with_monthly_amount(2024, "Food", "", BudgetKind::Expense, money(300)).unwrap();
        assert_eq!(budget.slices().len(), 1);
        assert_eq!(budget.slices()[0].name, DEFAULT_SLICE_NAME);
        assert_eq!(budget.amount(), money(3600));
    }

    #[test]
    fn test_append_slice() {
        let mut budget = test_budget();
        budget.append(monthly("Water", 20)).unwrap();
        assert_eq!(budget.slices().last().unwrap().name, "Water");

        let before = budget.clone();
        let result = budget.append(monthly("Rent", 5));
        assert!(matches!(result, Err(LedgerError::SliceAlreadyExists(name)) if name == "Rent"));
        assert_eq!(budget, before);
    }

    #[test]
    fn test_append_then_delete_restores_slices() {
        let mut budget = test_budget();
        let original = budget.slices().to_vec();

        let extra = monthly("Internet", 40);
        let extra_id = extra.id;
        budget.append(extra).unwrap();
        let removed = budget.delete_slices(&HashSet::from([extra_id])).unwrap();

        assert_eq!(removed.len(), 1);
        assert_eq!(budget.slices(), original.as_slice());
    }

    #[test]
    fn test_delete_all_slices_is_rejected_atomically() {
        let mut budget = test_budget();
        let before = budget.clone();
        let all: HashSet<SliceId> = budget.slices().iter().map(|s| s.id).collect();

        assert!(matches!(budget.delete_slices(&all), Err(LedgerError::NoSlices)));
        assert_eq!(budget, before);
    }

    #[test]
    fn test_delete_ignores_unknown_ids() {
        let mut budget = test_budget();
        let removed = budget
            .delete_slices(&HashSet::from([SliceId::new()]))
            .unwrap();
        assert!(removed.is_empty());
        assert_eq!(budget.slices().len(), 2);
    }

    #[test]
    fn test_update() {
        let mut budget = test_budget();
        budget.update("Household", Some("sofa")).unwrap();
        assert_eq!(budget.name, "Household");
        assert_eq!(budget.icon, "sofa");

        budget.update("Flat", None).unwrap();
        assert_eq!(budget.icon, "sofa");

        assert!(matches!(budget.update("", None), Err(LedgerError::NameNotValid)));
        assert_eq!(budget.name, "Flat");
    }

    #[test]
    fn test_availability() {
        let mut budget = test_budget();
        let repairs = vec![ScheduledAmount::new(money(500), 6)];
        budget
            .append(BudgetSlice::scheduled("Repairs", repairs).unwrap())
            .unwrap();

        assert_eq!(budget.availability_up_to(1), money(150));
        assert_eq!(budget.availability_up_to(5), money(750));
        assert_eq!(budget.availability_up_to(6), money(1400));
        assert_eq!(budget.availability_for(6), money(650));
        assert_eq!(budget.availability_for(7), money(150));
    }

    #[test]
    fn test_availability_is_monotonic() {
        let budget = test_budget();
        for month in 1..12 {
            assert!(budget.availability_up_to(month + 1) >= budget.availability_up_to(month));
        }
    }

    #[test]
    fn test_positional_lookup_skips_out_of_range() {
        let budget = test_budget();
        let ids = budget.slice_ids_at(&[1, 7]);
        assert_eq!(ids, vec![budget.slices()[1].id]);
        assert_eq!(budget.slices_at(&[0, 2]).len(), 1);
    }

    #[test]
    fn test_kind_signs() {
        assert_eq!(BudgetKind::Expense.signed(money(10)), money(-10));
        assert_eq!(BudgetKind::Income.signed(money(10)), money(10));
        assert_eq!(BudgetKind::Expense.consumption(money(-10)), money(10));
        assert_eq!(BudgetKind::Income.consumption(money(10)), money(10));
        assert_eq!("income".parse::<BudgetKind>().unwrap(), BudgetKind::Income);
        assert!("savings".parse::<BudgetKind>().is_err());
    }
}
