use crate::errors::LedgerError;
use crate::models::Day;
use chrono::{Datelike, Days, Duration, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical week identifier: the Monday of the week, rendered `YYYY-MM-DD`.
///
/// Keys come from the local calendar with no timezone normalization, so a
/// device that crosses timezones near midnight may land in a neighbouring
/// week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey(NaiveDate);

impl WeekKey {
    /// The week that contains `date`. Sunday belongs to the week it ends.
    ///
    /// Fails for the partial weeks at either end of chrono's date range,
    /// where the Monday or the Sunday is not representable.
    pub fn containing(date: NaiveDate) -> Result<Self, LedgerError> {
        week_start(date)
            .filter(|monday| monday.checked_add_days(Days::new(6)).is_some())
            .map(Self)
            .ok_or_else(|| LedgerError::InvalidWeekKey(date.to_string()))
    }

    pub fn current() -> Result<Self, LedgerError> {
        Self::containing(today())
    }

    /// Strict parse: the date must already be a Monday.
    pub fn parse(value: &str) -> Result<Self, LedgerError> {
        let date = parse_date(value)?;
        if date.weekday() != Weekday::Mon {
            return Err(LedgerError::InvalidWeekKey(value.to_string()));
        }
        Self::containing(date).map_err(|_| LedgerError::InvalidWeekKey(value.to_string()))
    }

    /// Lenient parse: any date is moved back to its Monday.
    pub fn parse_any(value: &str) -> Result<Self, LedgerError> {
        let date = parse_date(value)?;
        Self::containing(date).map_err(|_| LedgerError::InvalidWeekKey(value.to_string()))
    }

    pub fn monday(self) -> NaiveDate {
        self.0
    }

    /// Keys always have a representable Sunday, so this cannot overflow.
    pub fn date_of(self, day: Day) -> NaiveDate {
        self.0 + Duration::days(day.days_from_monday())
    }

    /// Moves by whole weeks. A key that would leave chrono's date range stays put.
    pub fn shift(self, delta_weeks: i64) -> Self {
        Duration::try_weeks(delta_weeks)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .and_then(|date| Self::containing(date).ok())
            .unwrap_or(self)
    }

    pub fn previous(self) -> Self {
        self.shift(-1)
    }

    pub fn next(self) -> Self {
        self.shift(1)
    }

    pub fn is_current(self) -> bool {
        self.is_current_at(today())
    }

    pub fn is_current_at(self, today: NaiveDate) -> bool {
        Self::containing(today).is_ok_and(|key| key == self)
    }

    /// "Week of May 6"
    pub fn display_label(self) -> String {
        format!("Week of {}", self.0.format("%b %-d"))
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for WeekKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WeekKey {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WeekKey> for String {
    fn from(key: WeekKey) -> Self {
        key.to_string()
    }
}

/// Monday on or before `date`, if chrono can represent it.
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_date(value: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| LedgerError::InvalidWeekKey(value.to_string()))
}
