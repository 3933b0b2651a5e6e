//! The explicit "now" that overview computations are evaluated against

use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;
use std::fmt;

use crate::error::LedgerResult;
use crate::models::check_month;

/// Where a month sits relative to the evaluation date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthState {
    /// Entirely in the past; its balance is final
    Closed,
    /// The month containing the evaluation date; its balance is provisional
    Current,
    /// Not started yet
    Future,
}

impl fmt::Display for MonthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Current => write!(f, "current"),
            Self::Future => write!(f, "future"),
        }
    }
}

/// Year and month that overviews treat as "now"
///
/// Overviews never read the clock themselves; callers pass one of these so
/// the same inputs always classify months the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AsOf {
    pub year: i32,
    pub month: u32,
}

impl AsOf {
    pub fn new(year: i32, month: u32) -> LedgerResult<Self> {
        check_month(month)?;
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Read the local clock once
    pub fn today() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    /// Classify `month` of `year` as closed, current or future
    pub fn classify(&self, year: i32, month: u32) -> MonthState {
        match (year, month).cmp(&(self.year, self.month)) {
            Ordering::Less => MonthState::Closed,
            Ordering::Equal => MonthState::Current,
            Ordering::Greater => MonthState::Future,
        }
    }
}

impl fmt::Display for AsOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
