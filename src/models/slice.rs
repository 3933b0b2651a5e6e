//! Budget slice model
//!
//! A slice is a named allotment inside a budget: either a flat amount that
//! recurs every month or a handful of amounts pinned to specific months.
//! Slices are built once with a validated configuration and are replaced
//! rather than edited once attached to a budget.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::SliceId;
use super::money::MoneyValue;
use crate::error::{LedgerError, LedgerResult};

/// Months are numbered 1 (January) through 12 (December)
pub const MONTHS: std::ops::RangeInclusive<u32> = 1..=12;

/// Check that a month number is within 1..=12
pub fn check_month(month: u32) -> LedgerResult<()> {
    if MONTHS.contains(&month) {
        Ok(())
    } else {
        Err(LedgerError::MonthNotValid(month))
    }
}

/// Reject amounts past [`MAX_UNITS`](super::money::MAX_UNITS)
///
/// With every entry bounded, a slice's yearly total is at most twelve
/// times the limit and cannot overflow.
pub(crate) fn checked_amount(amount: MoneyValue) -> LedgerResult<()> {
    if amount.is_within_limit() {
        Ok(())
    } else {
        Err(LedgerError::AmountOutOfRange(amount.to_string()))
    }
}

/// An amount scheduled for one month of the year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAmount {
    pub amount: MoneyValue,
    pub month: u32,
}

impl ScheduledAmount {
    pub fn new(amount: MoneyValue, month: u32) -> Self {
        Self { amount, month }
    }
}

/// How a slice earns its allotment over the year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SliceConfiguration {
    /// The same amount every month
    Monthly { amount: MoneyValue },

    /// One-off amounts in specific months, at most one per month
    Scheduled { schedules: Vec<ScheduledAmount> },
}

/// A named allotment within a budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSlice {
    pub id: SliceId,
    pub name: String,
    pub configuration: SliceConfiguration,
}

impl BudgetSlice {
    /// Create a slice that earns `amount` every month
    pub fn monthly(name: impl Into<String>, amount: MoneyValue) -> LedgerResult<Self> {
        let name = checked_name(name.into())?;
        if amount.is_zero() {
            return Err(LedgerError::AmountNotValid);
        }
        checked_amount(amount)?;

        Ok(Self {
            id: SliceId::new(),
            name,
            configuration: SliceConfiguration::Monthly { amount },
        })
    }

    /// Create a slice from amounts scheduled in specific months
    pub fn scheduled(
        name: impl Into<String>,
        schedules: Vec<ScheduledAmount>,
    ) -> LedgerResult<Self> {
        let name = checked_name(name.into())?;
        if schedules.is_empty() {
            return Err(LedgerError::NoSchedule);
        }

        let mut accepted: Vec<ScheduledAmount> = Vec::with_capacity(schedules.len());
        for entry in schedules {
            Self::will_add_schedule(&entry, &accepted)?;
            checked_amount(entry.amount)?;
            accepted.push(entry);
        }
        accepted.sort_by_key(|entry| entry.month);

        Ok(Self {
            id: SliceId::new(),
            name,
            configuration: SliceConfiguration::Scheduled {
                schedules: accepted,
            },
        })
    }

    /// Check that `entry` can join `existing` without breaking the schedule
    ///
    /// Fails with `MonthNotValid` for a month outside 1..=12 and with
    /// `ScheduleAlreadyExists` when the month is already taken.
    pub fn will_add_schedule(
        entry: &ScheduledAmount,
        existing: &[ScheduledAmount],
    ) -> LedgerResult<()> {
        check_month(entry.month)?;
        if existing.iter().any(|e| e.month == entry.month) {
            return Err(LedgerError::ScheduleAlreadyExists(entry.month));
        }
        Ok(())
    }

    /// The annual amount of this slice
    pub fn amount(&self) -> MoneyValue {
        match &self.configuration {
            SliceConfiguration::Monthly { amount } => *amount * 12u32,
            SliceConfiguration::Scheduled { schedules } => {
                schedules.iter().map(|entry| entry.amount).sum()
            }
        }
    }

    /// The recurring amount, if this is a monthly slice
    pub fn monthly_amount(&self) -> Option<MoneyValue> {
        match &self.configuration {
            SliceConfiguration::Monthly { amount } => Some(*amount),
            SliceConfiguration::Scheduled { .. } => None,
        }
    }

    /// The scheduled amounts, empty for a monthly slice
    pub fn schedules(&self) -> &[ScheduledAmount] {
        match &self.configuration {
            SliceConfiguration::Monthly { .. } => &[],
            SliceConfiguration::Scheduled { schedules } => schedules,
        }
    }

    pub fn is_monthly(&self) -> bool {
        matches!(self.configuration, SliceConfiguration::Monthly { .. })
    }

    /// Allotment earned from January through `month`, inclusive
    pub fn availability_up_to(&self, month: u32) -> MoneyValue {
        let month = month.min(12);
        match &self.configuration {
            SliceConfiguration::Monthly { amount } => *amount * month,
            SliceConfiguration::Scheduled { schedules } => schedules
                .iter()
                .filter(|entry| entry.month <= month)
                .map(|entry| entry.amount)
                .sum(),
        }
    }

    /// Allotment earned in `month` alone
    pub fn availability_for(&self, month: u32) -> MoneyValue {
        if !MONTHS.contains(&month) {
            return MoneyValue::zero();
        }
        match &self.configuration {
            SliceConfiguration::Monthly { amount } => *amount,
            SliceConfiguration::Scheduled { schedules } => schedules
                .iter()
                .find(|entry| entry.month == month)
                .map(|entry| entry.amount)
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for BudgetSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.configuration {
            SliceConfiguration::Monthly { amount } => {
                write!(f, "{} ({} monthly)", self.name, amount)
            }
            SliceConfiguration::Scheduled { schedules } => {
                write!(f, "{} ({} scheduled", self.name, self.amount())?;
                let months: Vec<String> = schedules.iter().map(|e| e.month.to_string()).collect();
                write!(f, " in months {})", months.join(", "))
            }
        }
    }
}

/// Draft of a scheduled slice being assembled entry by entry
///
/// Every `add` is checked with [`BudgetSlice::will_add_schedule`] and a
/// rejected entry leaves the draft as it was.
#[derive(Debug, Clone, Default)]
pub struct ScheduleDraft {
    entries: Vec<ScheduledAmount>,
}

impl ScheduleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry to the draft
    pub fn add(&mut self, entry: ScheduledAmount) -> LedgerResult<()> {
        BudgetSlice::will_add_schedule(&entry, &self.entries)?;
        self.entries.push(entry);
        self.entries.sort_by_key(|e| e.month);
        Ok(())
    }

    /// Remove the entry for `month`, returning it if present
    pub fn remove(&mut self, month: u32) -> Option<ScheduledAmount> {
        let index = self.entries.iter().position(|e| e.month == month)?;
        Some(self.entries.remove(index))
    }

    pub fn entries(&self) -> &[ScheduledAmount] {
        &self.entries
    }

    pub fn total(&self) -> MoneyValue {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Build the slice from the collected entries
    pub fn build(self, name: impl Into<String>) -> LedgerResult<BudgetSlice> {
        BudgetSlice::scheduled(name, self.entries)
    }
}

fn checked_name(name: String) -> LedgerResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::NameNotValid);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(value: i64) -> MoneyValue {
        MoneyValue::from(value)
    }

    #[test]
    fn test_monthly_amount_is_twelve_times() {
        let slice = BudgetSlice::monthly("Rent", MoneyValue::new(dec!(812.25))).unwrap();
        assert_eq!(slice.amount(), MoneyValue::new(dec!(9747.00)));
        assert_eq!(slice.monthly_amount(), Some(MoneyValue::new(dec!(812.25))));
        assert!(slice.schedules().is_empty());
    }

    #[test]
    fn test_monthly_rejects_zero_and_blank_name() {
        assert!(matches!(
            BudgetSlice::monthly("Rent", MoneyValue::zero()),
            Err(LedgerError::AmountNotValid)
        ));
        assert!(matches!(
            BudgetSlice::monthly("  ", money(10)),
            Err(LedgerError::NameNotValid)
        ));
    }

    #[test]
    fn test_rejects_amounts_whose_total_could_overflow() {
        let huge = MoneyValue::new(rust_decimal::Decimal::MAX);
        assert!(matches!(
            BudgetSlice::monthly("Huge", huge),
            Err(LedgerError::AmountOutOfRange(_))
        ));
        assert!(matches!(
            BudgetSlice::scheduled("Huge", vec![ScheduledAmount::new(huge, 3)]),
            Err(LedgerError::AmountOutOfRange(_))
        ));

        let largest = MoneyValue::from(crate::models::MAX_UNITS);
        let slice = BudgetSlice::monthly("Largest", largest).unwrap();
        assert_eq!(slice.amount(), largest * 12u32);
    }

    #[test]
    fn test_scheduled_amount_is_sum_of_entries() {
        let slice = BudgetSlice::scheduled(
            "Insurance",
            vec![
                ScheduledAmount::new(money(300), 9),
                ScheduledAmount::new(money(120), 2),
            ],
        )
        .unwrap();

        assert_eq!(slice.amount(), money(420));
        assert_eq!(slice.schedules()[0].month, 2);
        assert!(!slice.is_monthly());
    }

    #[test]
    fn test_scheduled_validation() {
        assert!(matches!(
            BudgetSlice::scheduled("Gifts", vec![]),
            Err(LedgerError::NoSchedule)
        ));
        assert!(matches!(
            BudgetSlice::scheduled("Gifts", vec![ScheduledAmount::new(money(10), 13)]),
            Err(LedgerError::MonthNotValid(13))
        ));
        assert!(matches!(
            BudgetSlice::scheduled("Gifts", vec![ScheduledAmount::new(money(10), 0)]),
            Err(LedgerError::MonthNotValid(0))
        ));
        assert!(matches!(
            BudgetSlice::scheduled(
                "Gifts",
                vec![
                    ScheduledAmount::new(money(10), 12),
                    ScheduledAmount::new(money(20), 12),
                ]
            ),
            Err(LedgerError::ScheduleAlreadyExists(12))
        ));
    }

    #[test]
    fn test_will_add_schedule() {
        let existing = vec![ScheduledAmount::new(money(50), 3)];
        let april = ScheduledAmount::new(money(5), 4);
        assert!(BudgetSlice::will_add_schedule(&april, &existing).is_ok());
        assert!(matches!(
            BudgetSlice::will_add_schedule(&ScheduledAmount::new(money(5), 3), &existing),
            Err(LedgerError::ScheduleAlreadyExists(3))
        ));
    }

    #[test]
    fn test_draft_collision_leaves_schedule_unchanged() {
        let mut draft = ScheduleDraft::new();
        draft.add(ScheduledAmount::new(money(100), 3)).unwrap();

        let result = draft.add(ScheduledAmount::new(money(40), 3));
        assert!(matches!(result, Err(LedgerError::ScheduleAlreadyExists(3))));
        assert_eq!(draft.entries(), &[ScheduledAmount::new(money(100), 3)]);
        assert_eq!(draft.total(), money(100));
    }

    #[test]
    fn test_draft_build_and_remove() {
        let mut draft = ScheduleDraft::new();
        draft.add(ScheduledAmount::new(money(10), 6)).unwrap();
        draft.add(ScheduledAmount::new(money(20), 1)).unwrap();
        assert_eq!(draft.remove(6), Some(ScheduledAmount::new(money(10), 6)));
        assert_eq!(draft.remove(6), None);

        let slice = draft.build("Fees").unwrap();
        assert_eq!(slice.amount(), money(20));
        assert!(ScheduleDraft::new().build("Empty").is_err());
    }

    #[test]
    fn test_availability() {
        let monthly = BudgetSlice::monthly("Food", money(100)).unwrap();
        assert_eq!(monthly.availability_up_to(3), money(300));
        assert_eq!(monthly.availability_for(3), money(100));
        assert_eq!(monthly.availability_for(13), MoneyValue::zero());

        let scheduled = BudgetSlice::scheduled(
            "Tax",
            vec![
                ScheduledAmount::new(money(200), 4),
                ScheduledAmount::new(money(50), 10),
            ],
        )
        .unwrap();
        assert_eq!(scheduled.availability_up_to(3), MoneyValue::zero());
        assert_eq!(scheduled.availability_up_to(4), money(200));
        assert_eq!(scheduled.availability_up_to(12), money(250));
        assert_eq!(scheduled.availability_for(10), money(50));
        assert_eq!(scheduled.availability_for(11), MoneyValue::zero());
    }

    #[test]
    fn test_serialization() {
        let slice = BudgetSlice::scheduled("Tax", vec![ScheduledAmount::new(money(5), 1)]).unwrap();
        let json = serde_json::to_string(&slice).unwrap();
        assert!(json.contains("\"type\":\"scheduled\""));
        let back: BudgetSlice = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slice);
    }
}
