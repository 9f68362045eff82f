use super::allowance::AllowanceError;
use chrono::{Datelike, Local, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// UK Tax Year (runs 6 April to 5 April)
/// The year value represents the start year (e.g., 2024 = 2024/25 tax year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct TaxYear(pub i32);

impl TaxYear {
    pub const MIN: TaxYear = TaxYear(1);
    pub const MAX: TaxYear = TaxYear(9998);

    /// Tax year by starting year, rejecting years outside `MIN..=MAX`
    pub fn new(year: i32) -> Result<Self, AllowanceError> {
        let tax_year = TaxYear(year);
        if tax_year.is_in_range() {
            Ok(tax_year)
        } else {
            Err(AllowanceError::TaxYearOutOfRange(year))
        }
    }

    pub fn is_in_range(&self) -> bool {
        (Self::MIN..=Self::MAX).contains(self)
    }

    /// Create a tax year from a date
    pub fn from_date(date: NaiveDate) -> Self {
        let year = date.year();
        // One comparison against 6 April, not separate month and day checks
        if date >= april(year, 6) {
            TaxYear(year)
        } else {
            TaxYear(year - 1)
        }
    }

    /// Tax year containing today's local date
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Start date of the tax year (6 April)
    pub fn start_date(&self) -> NaiveDate {
        april(self.0, 6)
    }

    /// End date of the tax year (5 April of the following year)
    pub fn end_date(&self) -> NaiveDate {
        april(self.0 + 1, 5)
    }

    /// Inclusive date range of the tax year
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        (self.start_date(), self.end_date())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    /// Display as "2024/25" format
    pub fn display(&self) -> String {
        format!("{}/{:02}", self.0, (self.0 + 1).rem_euclid(100))
    }
}

// Years beyond chrono's calendar clamp to its bounds; `TaxYear::new` keeps
// them out of every calculation.
fn april(year: i32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 4, day).unwrap_or(if year < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

impl<'de> Deserialize<'de> for TaxYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let year = i32::deserialize(deserializer)?;
        TaxYear::new(year).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
