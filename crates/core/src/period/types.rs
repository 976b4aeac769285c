//! Calendar month periods.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vatdesk_shared::types::Nip;

/// Errors building or parsing a period.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Month outside 1..=12.
    #[error("Invalid month {0}, expected 1-12")]
    InvalidMonth(u32),

    /// Year outside the supported calendar range.
    #[error("Invalid year {0}")]
    InvalidYear(i32),

    /// Text is not `YYYY-MM`.
    #[error("Invalid period '{0}', expected YYYY-MM")]
    Malformed(String),
}

/// First supported year.
pub const MIN_YEAR: i32 = 1;
/// Last supported year; periods are written as four-digit years.
pub const MAX_YEAR: i32 = 9999;

/// One calendar month between `0001-01` and `9999-12`.
///
/// Ordered by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "YearMonthParts")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct YearMonthParts {
    year: i32,
    month: u32,
}

impl TryFrom<YearMonthParts> for YearMonth {
    type Error = PeriodError;

    fn try_from(parts: YearMonthParts) -> Result<Self, Self::Error> {
        Self::new(parts.year, parts.month)
    }
}

impl YearMonth {
    /// Earliest representable period.
    pub const MIN: Self = Self {
        year: MIN_YEAR,
        month: 1,
    };
    /// Latest representable period.
    pub const MAX: Self = Self {
        year: MAX_YEAR,
        month: 12,
    };

    /// Creates a period, validating the month and the year range.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(PeriodError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    /// The period containing `date`, clamped to `MIN..=MAX`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        if date.year() < MIN_YEAR {
            Self::MIN
        } else if date.year() > MAX_YEAR {
            Self::MAX
        } else {
            Self {
                year: date.year(),
                month: date.month(),
            }
        }
    }

    /// The month before the one containing `now`.
    ///
    /// This is the period a declaration generated "now" normally covers.
    #[must_use]
    pub fn preceding(now: DateTime<Utc>) -> Self {
        Self::from_date(now.date_naive()).previous()
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month, 1-12.
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// The previous calendar month, crossing year boundaries.
    ///
    /// Saturates at `YearMonth::MIN`.
    #[must_use]
    pub const fn previous(&self) -> Self {
        if self.year == MIN_YEAR && self.month == 1 {
            *self
        } else if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The next calendar month, crossing year boundaries.
    ///
    /// Saturates at `YearMonth::MAX`.
    #[must_use]
    pub const fn next(&self) -> Self {
        if self.year == MAX_YEAR && self.month == 12 {
            *self
        } else if self.month == 12 {
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

    /// First day of the month.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        // Years 1..=9999 are always valid chrono dates.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// First day of the following month (exclusive upper bound).
    #[must_use]
    pub fn end_exclusive(&self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Returns true if `date` falls within this month.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for YearMonth {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PeriodError::Malformed(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(malformed)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(malformed());
        }
        let year = year.parse::<i32>().map_err(|_| malformed())?;
        let month = month.parse::<u32>().map_err(|_| malformed())?;
        Self::new(year, month)
    }
}

/// Identifies one declaration period of one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    /// Tenant (the filing company's NIP).
    pub tenant: Nip,
    /// Declared month.
    pub period: YearMonth,
}

impl PeriodKey {
    /// Creates a new key.
    #[must_use]
    pub const fn new(tenant: Nip, period: YearMonth) -> Self {
        Self { tenant, period }
    }

    /// The same tenant's previous month.
    #[must_use]
    pub fn previous(&self) -> Self {
        Self {
            tenant: self.tenant.clone(),
            period: self.period.previous(),
        }
    }
}
