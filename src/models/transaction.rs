//! Transaction model
//!
//! A transaction is a dated money movement split over one or more
//! (amount, budget, slice) entries. Amounts are signed: negative for money
//! leaving (spending against an expense budget), positive for money arriving.
//! Whether the referenced slices exist is checked when the transaction is
//! attached to a yearly overview, not here.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, SliceId, TransactionId};
use super::money::MoneyValue;
use super::slice::checked_amount;
use crate::error::{LedgerError, LedgerResult};

/// One portion of a transaction, booked against a budget slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAmount {
    /// Signed amount (positive for inflow, negative for outflow)
    pub amount: MoneyValue,
    pub budget_id: BudgetId,
    pub slice_id: SliceId,
}

impl TransactionAmount {
    pub fn new(amount: MoneyValue, budget_id: BudgetId, slice_id: SliceId) -> Self {
        Self {
            amount,
            budget_id,
            slice_id,
        }
    }
}

/// A dated monetary movement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub date: NaiveDate,

    amounts: Vec<TransactionAmount>,
}

impl Transaction {
    /// Create a transaction; at least one amount entry is required and none
    /// may exceed the amount limit
    pub fn new(
        description: Option<String>,
        date: NaiveDate,
        amounts: Vec<TransactionAmount>,
    ) -> LedgerResult<Self> {
        if amounts.is_empty() {
            return Err(LedgerError::AmountNotValid);
        }
        for entry in &amounts {
            checked_amount(entry.amount)?;
        }

        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id: TransactionId::new(),
            description,
            date,
            amounts,
        })
    }

    /// Money spent: `amount` is booked as an outflow against the slice
    pub fn expense(
        description: Option<String>,
        date: NaiveDate,
        amount: MoneyValue,
        budget_id: BudgetId,
        slice_id: SliceId,
    ) -> LedgerResult<Self> {
        Self::new(
            description,
            date,
            vec![TransactionAmount::new(-amount.abs(), budget_id, slice_id)],
        )
    }

    /// Money received: `amount` is booked as an inflow against the slice
    pub fn income(
        description: Option<String>,
        date: NaiveDate,
        amount: MoneyValue,
        budget_id: BudgetId,
        slice_id: SliceId,
    ) -> LedgerResult<Self> {
        Self::new(
            description,
            date,
            vec![TransactionAmount::new(amount.abs(), budget_id, slice_id)],
        )
    }

    pub fn amounts(&self) -> &[TransactionAmount] {
        &self.amounts
    }

    /// Signed sum of all entries
    pub fn amount(&self) -> MoneyValue {
        self.amounts.iter().map(|a| a.amount).sum()
    }

    /// Signed sum of the entries booked against `budget_id`
    pub fn amount_for_budget(&self, budget_id: BudgetId) -> MoneyValue {
        self.amounts
            .iter()
            .filter(|a| a.budget_id == budget_id)
            .map(|a| a.amount)
            .sum()
    }

    pub fn references_budget(&self, budget_id: BudgetId) -> bool {
        self.amounts.iter().any(|a| a.budget_id == budget_id)
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn is_in_month(&self, month: u32) -> bool {
        self.month() == month
    }

    /// Check if this is an inflow (positive total)
    pub fn is_inflow(&self) -> bool {
        self.amount().is_positive()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.amount())?;
        if let Some(description) = &self.description {
            write!(f, " - {}", description)?;
        }
        Ok(())
    }
}
