use crate::catalog::{Factor, FactorKind, find_factor};
use crate::errors::LedgerError;
use crate::models::{Category, Day, DayRecord, FactorInput, FactorValue, LedgerSnapshot};
use crate::scoring;
use crate::week::WeekKey;
use tracing::{debug, info};

/// Receives the full ledger after every mutation.
///
/// Implementations must return promptly; the ledger does not wait for the
/// snapshot to become durable.
pub trait SnapshotSink: Send + Sync {
    fn save(&self, snapshot: &LedgerSnapshot);
}

impl<F> SnapshotSink for F
where
    F: Fn(&LedgerSnapshot) + Send + Sync,
{
    fn save(&self, snapshot: &LedgerSnapshot) {
        self(snapshot)
    }
}

/// Weekly recovery entries for one athlete.
pub struct Ledger {
    weeks: LedgerSnapshot,
    sink: Box<dyn SnapshotSink>,
}

impl Ledger {
    pub fn new(sink: impl SnapshotSink + 'static) -> Self {
        Self::with_snapshot(LedgerSnapshot::new(), sink)
    }

    pub fn with_snapshot(weeks: LedgerSnapshot, sink: impl SnapshotSink + 'static) -> Self {
        Self {
            weeks,
            sink: Box::new(sink),
        }
    }

    /// A ledger whose mutations are not persisted anywhere.
    pub fn in_memory() -> Self {
        Self::new(|_: &LedgerSnapshot| {})
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.weeks
    }

    pub fn day_record(&self, week: WeekKey, day: Day) -> Option<&DayRecord> {
        self.weeks.get(&week).and_then(|days| days.get(&day))
    }

    /// Stored value, or the zero of the factor's kind when nothing was written.
    ///
    /// Ids outside the catalog read as a zero count.
    pub fn get_value(&self, week: WeekKey, day: Day, category: Category, factor_id: &str) -> FactorValue {
        let stored = self
            .day_record(week, day)
            .and_then(|record| record.entries(category).get(factor_id))
            .copied();
        match (stored, find_factor(category, factor_id)) {
            (Some(value), _) => value,
            (None, Some(factor)) => zero_of(factor.kind),
            (None, None) => FactorValue::Count(0),
        }
    }

    pub fn set_value(
        &mut self,
        week: WeekKey,
        day: Day,
        category: Category,
        factor_id: &str,
        input: impl Into<FactorInput>,
    ) -> Result<FactorValue, LedgerError> {
        let factor = lookup(category, factor_id)?;
        let value = coerce(factor.kind, input.into());
        self.store(week, day, factor, value);
        Ok(value)
    }

    /// Steps a count factor up or down, never below zero.
    pub fn adjust_count(
        &mut self,
        week: WeekKey,
        day: Day,
        category: Category,
        factor_id: &str,
        delta: i64,
    ) -> Result<FactorValue, LedgerError> {
        let factor = lookup(category, factor_id)?;
        if factor.kind != FactorKind::Count {
            return Err(LedgerError::KindMismatch {
                id: factor_id.to_string(),
            });
        }
        let current = i64::from(self.get_value(week, day, category, factor_id).as_count());
        let next = current.saturating_add(delta).clamp(0, i64::from(u32::MAX));
        let value = FactorValue::Count(next as u32);
        self.store(week, day, factor, value);
        Ok(value)
    }

    /// Empties a day of a tracked week. Untracked weeks are left alone.
    pub fn reset_day(&mut self, week: WeekKey, day: Day) {
        let Some(days) = self.weeks.get_mut(&week) else {
            return;
        };
        days.insert(day, DayRecord::default());
        debug!(%week, %day, "reset day");
        self.flush();
    }

    /// Removes a week entirely. Returns whether it was present.
    pub fn reset_week(&mut self, week: WeekKey) -> bool {
        if self.weeks.remove(&week).is_none() {
            return false;
        }
        info!(%week, "reset week");
        self.flush();
        true
    }

    /// Tracked weeks, most recent first.
    pub fn list_week_keys(&self) -> Vec<WeekKey> {
        self.weeks.keys().rev().copied().collect()
    }

    pub fn day_score(&self, week: WeekKey, day: Day) -> i64 {
        scoring::day_score(&self.weeks, week, day)
    }

    pub fn week_score(&self, week: WeekKey) -> i64 {
        scoring::week_score(&self.weeks, week)
    }

    pub fn cumulative_score(&self) -> i64 {
        scoring::cumulative_score(&self.weeks)
    }

    fn store(&mut self, week: WeekKey, day: Day, factor: &Factor, value: FactorValue) {
        self.weeks
            .entry(week)
            .or_default()
            .entry(day)
            .or_default()
            .entries_mut(factor.category)
            .insert(factor.id.to_string(), value);
        debug!(%week, %day, factor = factor.id, ?value, "set factor");
        self.flush();
    }

    fn flush(&self) {
        self.sink.save(&self.weeks);
    }
}

fn lookup(category: Category, factor_id: &str) -> Result<&'static Factor, LedgerError> {
    find_factor(category, factor_id).ok_or_else(|| LedgerError::UnknownFactor {
        category,
        id: factor_id.to_string(),
    })
}

fn zero_of(kind: FactorKind) -> FactorValue {
    match kind {
        FactorKind::Check => FactorValue::Check(false),
        FactorKind::Count => FactorValue::Count(0),
    }
}

fn coerce(kind: FactorKind, input: FactorInput) -> FactorValue {
    match (kind, input) {
        (FactorKind::Check, FactorInput::Flag(checked)) => FactorValue::Check(checked),
        (FactorKind::Check, FactorInput::Number(n)) => FactorValue::Check(n != 0.0 && !n.is_nan()),
        (FactorKind::Count, FactorInput::Flag(checked)) => FactorValue::Count(u32::from(checked)),
        (FactorKind::Count, FactorInput::Number(n)) => {
            // `as` saturates and maps NaN to zero.
            FactorValue::Count(n.floor().max(0.0) as u32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn week(key: &str) -> WeekKey {
        WeekKey::parse(key).unwrap()
    }

    fn recording_ledger() -> (Ledger, Arc<Mutex<Vec<LedgerSnapshot>>>) {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&saved);
        let ledger = Ledger::new(move |snapshot: &LedgerSnapshot| {
            sink.lock().unwrap().push(snapshot.clone());
        });
        (ledger, saved)
    }

    #[test]
    fn unset_values_default_to_zero() {
        let ledger = Ledger::in_memory();
        let key = week("2024-05-06");
        assert_eq!(
            ledger.get_value(key, Day::Monday, Category::Positive, "shake30"),
            FactorValue::Check(false)
        );
        assert_eq!(
            ledger.get_value(key, Day::Monday, Category::Negative, "practiceHours"),
            FactorValue::Count(0)
        );
        assert_eq!(
            ledger.get_value(key, Day::Monday, Category::Negative, "notAFactor"),
            FactorValue::Count(0)
        );
    }

    #[test]
    fn counts_are_floored_and_clamped() {
        let mut ledger = Ledger::in_memory();
        let key = week("2024-05-06");
        let set = |ledger: &mut Ledger, n: f64| {
            ledger
                .set_value(key, Day::Monday, Category::Negative, "lateBedtime", n)
                .unwrap()
        };
        assert_eq!(set(&mut ledger, 2.9), FactorValue::Count(2));
        assert_eq!(set(&mut ledger, -4.0), FactorValue::Count(0));
        assert_eq!(set(&mut ledger, f64::NAN), FactorValue::Count(0));
    }

    #[test]
    fn checks_are_coerced_to_booleans() {
        let mut ledger = Ledger::in_memory();
        let key = week("2024-05-06");
        let value = ledger
            .set_value(key, Day::Monday, Category::Positive, "meal90", 1.0)
            .unwrap();
        assert_eq!(value, FactorValue::Check(true));
        let value = ledger
            .set_value(key, Day::Monday, Category::Positive, "meal90", 0.0)
            .unwrap();
        assert_eq!(value, FactorValue::Check(false));
    }

    #[test]
    fn unknown_factor_is_rejected_without_creating_the_week() {
        let (mut ledger, saved) = recording_ledger();
        let key = week("2024-05-06");
        let err = ledger
            .set_value(key, Day::Monday, Category::Negative, "shake30", true)
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::UnknownFactor { category: Category::Negative, ref id } if id == "shake30"
        ));
        assert!(ledger.list_week_keys().is_empty());
        assert!(saved.lock().unwrap().is_empty());
    }

    #[test]
    fn every_mutation_saves_a_snapshot() {
        let (mut ledger, saved) = recording_ledger();
        let key = week("2024-05-06");
        ledger
            .set_value(key, Day::Monday, Category::Positive, "shake30", true)
            .unwrap();
        ledger.reset_day(key, Day::Monday);
        ledger.reset_week(key);
        ledger.reset_week(key);

        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[0][&key][&Day::Monday].positives["shake30"], FactorValue::Check(true));
        assert!(saved[1][&key][&Day::Monday].is_empty());
        assert!(saved[2].is_empty());
    }

    #[test]
    fn adjust_steps_counts_and_stops_at_zero() {
        let mut ledger = Ledger::in_memory();
        let key = week("2024-05-06");
        let adjust = |ledger: &mut Ledger, delta| {
            ledger
                .adjust_count(key, Day::Saturday, Category::Negative, "saturdayDrinks", delta)
                .unwrap()
        };
        assert_eq!(adjust(&mut ledger, 1), FactorValue::Count(1));
        assert_eq!(adjust(&mut ledger, 1), FactorValue::Count(2));
        assert_eq!(adjust(&mut ledger, -5), FactorValue::Count(0));
        assert!(matches!(
            ledger.adjust_count(key, Day::Saturday, Category::Positive, "shake30", 1),
            Err(LedgerError::KindMismatch { .. })
        ));
    }

    #[test]
    fn reset_day_clears_scores_but_keeps_the_week() {
        let mut ledger = Ledger::in_memory();
        let key = week("2024-05-06");
        ledger
            .set_value(key, Day::Tuesday, Category::Positive, "sleep9plus", 2u32)
            .unwrap();
        ledger
            .set_value(key, Day::Wednesday, Category::Positive, "sleep9plus", 1u32)
            .unwrap();
        ledger.reset_day(key, Day::Tuesday);

        assert_eq!(ledger.day_score(key, Day::Tuesday), 0);
        assert_eq!(
            ledger.get_value(key, Day::Tuesday, Category::Positive, "sleep9plus"),
            FactorValue::Count(0)
        );
        assert_eq!(ledger.week_score(key), 1);
        assert_eq!(ledger.list_week_keys(), vec![key]);
    }

    #[test]
    fn reset_day_on_untracked_week_is_a_no_op() {
        let (mut ledger, saved) = recording_ledger();
        ledger.reset_day(week("2024-05-06"), Day::Friday);
        assert!(ledger.list_week_keys().is_empty());
        assert!(saved.lock().unwrap().is_empty());
    }

    #[test]
    fn week_keys_list_most_recent_first() {
        let mut ledger = Ledger::in_memory();
        for key in ["2024-04-29", "2024-05-13", "2024-05-06"] {
            ledger
                .set_value(week(key), Day::Monday, Category::Positive, "supplements", true)
                .unwrap();
        }
        let keys: Vec<String> = ledger.list_week_keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, ["2024-05-13", "2024-05-06", "2024-04-29"]);
    }

    #[test]
    fn reset_week_is_idempotent() {
        let mut ledger = Ledger::in_memory();
        let key = week("2024-05-06");
        ledger
            .set_value(key, Day::Monday, Category::Positive, "supplements", true)
            .unwrap();
        assert!(ledger.reset_week(key));
        assert!(!ledger.reset_week(key));
        assert!(!ledger.list_week_keys().contains(&key));
        assert_eq!(ledger.week_score(key), 0);
    }
}
