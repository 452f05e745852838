//! Billing periods and due-date arithmetic
//!
//! Recurring quotas are billed per calendar month; extraordinary projects
//! are billed per installment position. [`PeriodRef`] names either kind so
//! payment records can be matched against the quota they settle.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors related to billing periods
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Invalid due day: {0} (expected 1-31)")]
    InvalidDueDay(u32),

    #[error("Invalid installment index: {0} (installments are numbered from 1)")]
    InvalidInstallmentIndex(u32),

    #[error("Date out of range: {0}")]
    OutOfRange(String),
}

#[derive(Serialize, Deserialize)]
struct BillingMonthRepr {
    year: i32,
    month: u32,
}

/// A calendar month that quotas are billed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "BillingMonthRepr", into = "BillingMonthRepr")]
pub struct BillingMonth {
    year: i32,
    month: u32,
}

impl BillingMonth {
    /// Creates a billing month, validating the month number and year range
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(PeriodError::OutOfRange(format!("{}-{:02}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// Returns the month containing the given date
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns all twelve months of a year, January first
    pub fn months_of_year(year: i32) -> Result<Vec<Self>, PeriodError> {
        (1..=12).map(|month| Self::new(year, month)).collect()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns the following month
    pub fn next(&self) -> Result<Self, PeriodError> {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// First day of the month
    pub fn first_day(&self) -> Result<NaiveDate, PeriodError> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .ok_or_else(|| PeriodError::OutOfRange(self.to_string()))
    }

    /// Last day of the month
    pub fn last_day(&self) -> Result<NaiveDate, PeriodError> {
        self.first_day()?
            .checked_add_months(Months::new(1))
            .and_then(|date| date.pred_opt())
            .ok_or_else(|| PeriodError::OutOfRange(self.to_string()))
    }

    /// Due date for the month's quota
    ///
    /// A due day past the end of the month falls on the month's last day,
    /// so a due day of 31 means "end of month" in February.
    pub fn due_date(&self, due_day: u32) -> Result<NaiveDate, PeriodError> {
        if !(1..=31).contains(&due_day) {
            return Err(PeriodError::InvalidDueDay(due_day));
        }
        let last_day = self.last_day()?;
        let day = due_day.min(last_day.day());
        NaiveDate::from_ymd_opt(self.year, self.month, day)
            .ok_or_else(|| PeriodError::OutOfRange(self.to_string()))
    }
}

impl TryFrom<BillingMonthRepr> for BillingMonth {
    type Error = PeriodError;

    fn try_from(repr: BillingMonthRepr) -> Result<Self, Self::Error> {
        Self::new(repr.year, repr.month)
    }
}

impl From<BillingMonth> for BillingMonthRepr {
    fn from(month: BillingMonth) -> Self {
        Self {
            year: month.year,
            month: month.month,
        }
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// The period a quota or payment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodRef {
    /// A recurring monthly quota
    Month(BillingMonth),
    /// The n-th installment (1-based) of a multi-period charge
    Installment(u32),
}

impl fmt::Display for PeriodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodRef::Month(month) => write!(f, "{}", month),
            PeriodRef::Installment(index) => write!(f, "installment {}", index),
        }
    }
}

/// Due date of the `index`-th installment of a schedule starting on `start`
///
/// Installments fall one calendar month apart; days past the end of a
/// shorter month clamp to its last day.
pub fn installment_due_date(start: NaiveDate, index: u32) -> Result<NaiveDate, PeriodError> {
    if index == 0 {
        return Err(PeriodError::InvalidInstallmentIndex(index));
    }
    start
        .checked_add_months(Months::new(index - 1))
        .ok_or_else(|| PeriodError::OutOfRange(format!("{} + {} months", start, index - 1)))
}
