//! Score aggregation over ledger contents.
//!
//! Every score is recomputed from the raw entries on each call; nothing here
//! caches or persists totals.

use crate::catalog::{Factor, FactorKind, list_factors};
use crate::models::{Category, Day, DayRecord, FactorValue, LedgerSnapshot};
use crate::week::WeekKey;
use serde::{Deserialize, Serialize};

/// Points one factor contributes for a stored value.
pub fn contribution(factor: &Factor, value: FactorValue) -> i64 {
    let magnitude = match factor.kind {
        FactorKind::Check => i64::from(value.is_truthy()),
        FactorKind::Count => i64::from(value.as_count()),
    };
    magnitude * factor.points
}

/// Ids absent from the catalog are skipped.
pub fn record_score(record: &DayRecord) -> i64 {
    Category::ALL
        .into_iter()
        .flat_map(|category| {
            let entries = record.entries(category);
            list_factors(category).iter().filter_map(move |factor| {
                entries
                    .get(factor.id)
                    .map(|value| contribution(factor, *value))
            })
        })
        .sum()
}

pub fn day_score(weeks: &LedgerSnapshot, week: WeekKey, day: Day) -> i64 {
    weeks
        .get(&week)
        .and_then(|days| days.get(&day))
        .map(record_score)
        .unwrap_or(0)
}

pub fn week_score(weeks: &LedgerSnapshot, week: WeekKey) -> i64 {
    Day::ALL
        .into_iter()
        .map(|day| day_score(weeks, week, day))
        .sum()
}

/// Sum over the weeks currently present. A removed week no longer counts.
pub fn cumulative_score(weeks: &LedgerSnapshot) -> i64 {
    weeks.keys().map(|week| week_score(weeks, *week)).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStatus {
    Negative,
    Neutral,
    Positive,
}

impl WeekStatus {
    pub fn classify(score: i64) -> Self {
        if score < 0 {
            WeekStatus::Negative
        } else if score == 0 {
            WeekStatus::Neutral
        } else {
            WeekStatus::Positive
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            WeekStatus::Negative => "Tougher next week ahead",
            WeekStatus::Neutral => "Treading water",
            WeekStatus::Positive => "Ready to attack training!",
        }
    }
}

/// "+3", "0", "-2"
pub fn format_signed(score: i64) -> String {
    if score > 0 {
        format!("+{score}")
    } else {
        score.to_string()
    }
}
