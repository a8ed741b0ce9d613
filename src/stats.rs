use crate::catalog::list_factors;
use crate::errors::LedgerError;
use crate::ledger::Ledger;
use crate::models::{
    Category, Day, DayScorePoint, DayView, FactorEntry, HistoryResponse, HistoryWeek, WeekView,
};
use crate::scoring::{WeekStatus, contribution, format_signed};
use crate::week::{WeekKey, today};
use chrono::NaiveDate;

pub fn build_week_view(ledger: &Ledger, week: WeekKey) -> WeekView {
    build_week_view_at(today(), ledger, week)
}

pub fn build_week_view_at(today: NaiveDate, ledger: &Ledger, week: WeekKey) -> WeekView {
    let score = ledger.week_score(week);
    let status = WeekStatus::classify(score);

    WeekView {
        week: week.to_string(),
        label: week.display_label(),
        is_current: week.is_current_at(today),
        tracked: ledger.snapshot().contains_key(&week),
        previous: week.previous().to_string(),
        next: week.next().to_string(),
        days: day_points(ledger, week),
        score,
        score_label: format_signed(score),
        status,
        headline: status.headline().to_string(),
        cumulative_score: ledger.cumulative_score(),
    }
}

pub fn build_day_view(ledger: &Ledger, week: WeekKey, day: Day) -> DayView {
    let score = ledger.day_score(week, day);
    DayView {
        week: week.to_string(),
        day,
        date: week.date_of(day).to_string(),
        score,
        score_label: format_signed(score),
        status: WeekStatus::classify(score),
        positives: factor_entries(ledger, week, day, Category::Positive),
        negatives: factor_entries(ledger, week, day, Category::Negative),
    }
}

/// The day the athlete is living through, the default selection when the
/// tracker opens.
pub fn build_today_view(ledger: &Ledger) -> Result<DayView, LedgerError> {
    build_today_view_at(today(), ledger)
}

pub fn build_today_view_at(today: NaiveDate, ledger: &Ledger) -> Result<DayView, LedgerError> {
    let week = WeekKey::containing(today)?;
    Ok(build_day_view(ledger, week, Day::of(today)))
}

/// Every tracked week, most recent first, with the all-time total.
pub fn build_history(ledger: &Ledger) -> HistoryResponse {
    let weeks = ledger
        .list_week_keys()
        .into_iter()
        .map(|week| {
            let score = ledger.week_score(week);
            HistoryWeek {
                week: week.to_string(),
                label: week.display_label(),
                score,
                status: WeekStatus::classify(score),
                days: day_points(ledger, week),
            }
        })
        .collect();

    let cumulative_score = ledger.cumulative_score();
    HistoryResponse {
        cumulative_score,
        cumulative_label: format_signed(cumulative_score),
        weeks,
    }
}

fn day_points(ledger: &Ledger, week: WeekKey) -> Vec<DayScorePoint> {
    Day::ALL
        .into_iter()
        .map(|day| {
            let score = ledger.day_score(week, day);
            DayScorePoint {
                day,
                date: week.date_of(day).to_string(),
                score,
                status: WeekStatus::classify(score),
            }
        })
        .collect()
}

fn factor_entries(ledger: &Ledger, week: WeekKey, day: Day, category: Category) -> Vec<FactorEntry> {
    list_factors(category)
        .iter()
        .map(|factor| {
            let value = ledger.get_value(week, day, category, factor.id);
            FactorEntry {
                id: factor.id.to_string(),
                label: factor.label.to_string(),
                value,
                contribution: contribution(factor, value),
            }
        })
        .collect()
}
