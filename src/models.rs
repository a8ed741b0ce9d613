use crate::catalog::FactorKind;
use crate::errors::LedgerError;
use crate::scoring::WeekStatus;
use crate::week::WeekKey;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The seven fixed day names, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn from_weekday(weekday: Weekday) -> Self {
        Self::ALL[weekday.num_days_from_monday() as usize]
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::from_weekday(date.weekday())
    }

    pub fn days_from_monday(self) -> i64 {
        self as i64
    }

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Day {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.name() == s)
            .ok_or_else(|| LedgerError::InvalidDay(s.to_string()))
    }
}

/// Organizational grouping of factors. Scoring never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "positives")]
    Positive,
    #[serde(rename = "negatives")]
    Negative,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Positive, Category::Negative];

    pub fn key(self) -> &'static str {
        match self {
            Category::Positive => "positives",
            Category::Negative => "negatives",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A stored factor value: a boolean for check factors, a count otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactorValue {
    Check(bool),
    Count(u32),
}

impl FactorValue {
    pub fn is_truthy(self) -> bool {
        match self {
            FactorValue::Check(checked) => checked,
            FactorValue::Count(count) => count > 0,
        }
    }

    /// Numeric reading of the value; a checked box counts as one.
    pub fn as_count(self) -> u32 {
        match self {
            FactorValue::Check(checked) => u32::from(checked),
            FactorValue::Count(count) => count,
        }
    }
}

/// Raw input from the presentation layer before it is coerced to the
/// factor's kind.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FactorInput {
    Flag(bool),
    Number(f64),
}

impl From<bool> for FactorInput {
    fn from(value: bool) -> Self {
        FactorInput::Flag(value)
    }
}

impl From<f64> for FactorInput {
    fn from(value: f64) -> Self {
        FactorInput::Number(value)
    }
}

impl From<u32> for FactorInput {
    fn from(value: u32) -> Self {
        FactorInput::Number(f64::from(value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(default)]
    pub positives: BTreeMap<String, FactorValue>,
    #[serde(default)]
    pub negatives: BTreeMap<String, FactorValue>,
}

impl DayRecord {
    pub fn entries(&self, category: Category) -> &BTreeMap<String, FactorValue> {
        match category {
            Category::Positive => &self.positives,
            Category::Negative => &self.negatives,
        }
    }

    pub fn entries_mut(&mut self, category: Category) -> &mut BTreeMap<String, FactorValue> {
        match category {
            Category::Positive => &mut self.positives,
            Category::Negative => &mut self.negatives,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positives.is_empty() && self.negatives.is_empty()
    }
}

/// Days of one week that have been written to. Untouched days are absent.
pub type WeekRecord = BTreeMap<Day, DayRecord>;

/// Full ledger contents, the shape handed to persistence.
pub type LedgerSnapshot = BTreeMap<WeekKey, WeekRecord>;

#[derive(Debug, Deserialize)]
pub struct SetValueRequest {
    pub value: FactorInput,
}

#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    pub delta: i64,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub name: Option<String>,
    pub needs_name: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FactorInfo {
    pub id: String,
    pub label: String,
    pub category: Category,
    pub kind: FactorKind,
    pub points: i64,
    pub unit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FactorEntry {
    pub id: String,
    pub label: String,
    pub value: FactorValue,
    pub contribution: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayView {
    pub week: String,
    pub day: Day,
    pub date: String,
    pub score: i64,
    pub score_label: String,
    pub status: WeekStatus,
    pub positives: Vec<FactorEntry>,
    pub negatives: Vec<FactorEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayScorePoint {
    pub day: Day,
    pub date: String,
    pub score: i64,
    pub status: WeekStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeekView {
    pub week: String,
    pub label: String,
    pub is_current: bool,
    pub tracked: bool,
    pub previous: String,
    pub next: String,
    pub days: Vec<DayScorePoint>,
    pub score: i64,
    pub score_label: String,
    pub status: WeekStatus,
    pub headline: String,
    pub cumulative_score: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryWeek {
    pub week: String,
    pub label: String,
    pub score: i64,
    pub status: WeekStatus,
    pub days: Vec<DayScorePoint>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub cumulative_score: i64,
    pub cumulative_label: String,
    pub weeks: Vec<HistoryWeek>,
}
