//! Calendar month selectors.
//!
//! Reports, budgets and the dashboard are all scoped to a calendar month,
//! addressed as a `YYYY-MM` pair. `Month` owns the parsing and the half-open
//! date range `[month_start, next_month_start)` every aggregation query
//! filters on.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{LedgerError, ResultLedger};

/// A calendar month (`year` + 1-based `month`).
///
/// # Examples
///
/// ```rust
/// use ledger::Month;
///
/// let month: Month = "2026-02".parse().unwrap();
/// assert_eq!(month.to_string(), "2026-02");
/// assert_eq!(month.end_exclusive(), month.next().start());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> ResultLedger<Self> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::Validation(format!(
                "month must be in 1..=12, got {month}"
            )));
        }
        // Reject years chrono cannot represent as dates.
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(LedgerError::Validation(format!("invalid year {year}")));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// First day of the month.
    #[must_use]
    pub fn start(self) -> NaiveDate {
        // Validated in `new`, so the unwrap cannot fire.
        #[allow(clippy::unwrap_used)]
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }

    /// First day of the following month (exclusive upper bound).
    #[must_use]
    pub fn end_exclusive(self) -> NaiveDate {
        self.next().start()
    }

    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// `true` when `date` falls inside `[start, end_exclusive)`.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start() && date < self.end_exclusive()
    }

    /// All twelve months of `year`, January first.
    pub fn months_of(year: i32) -> ResultLedger<Vec<Month>> {
        (1..=12).map(|month| Month::new(year, month)).collect()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = LedgerError;

    /// Parses a `YYYY-MM` selector.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::Validation(format!("month must be YYYY-MM, got '{s}'"));

        let (year_str, month_str) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year_str.parse().map_err(|_| invalid())?;
        let month: u32 = month_str.parse().map_err(|_| invalid())?;

        Month::new(year, month).map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats() {
        let month: Month = "2026-08".parse().unwrap();
        assert_eq!(month.year(), 2026);
        assert_eq!(month.month(), 8);
        assert_eq!(month.to_string(), "2026-08");
    }

    #[test]
    fn rejects_malformed_selectors() {
        assert!("2026".parse::<Month>().is_err());
        assert!("2026-00".parse::<Month>().is_err());
        assert!("2026-13".parse::<Month>().is_err());
        assert!("20a6-05".parse::<Month>().is_err());
        assert!("".parse::<Month>().is_err());
    }

    #[test]
    fn half_open_range_covers_the_month() {
        let month = Month::new(2026, 2).unwrap();
        assert_eq!(month.start(), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(
            month.end_exclusive(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
        assert!(month.contains(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()));
        assert!(!month.contains(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let month = Month::new(2026, 12).unwrap();
        assert_eq!(month.next(), Month::new(2027, 1).unwrap());
        assert_eq!(
            month.end_exclusive(),
            NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()
        );
    }

    #[test]
    fn months_of_year_in_order() {
        let months = Month::months_of(2026).unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], Month::new(2026, 1).unwrap());
        assert_eq!(months[11], Month::new(2026, 12).unwrap());
    }
}
