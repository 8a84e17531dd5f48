//! On-diet streak aggregation.
//!
//! The metrics endpoint folds one user's meal history into a [`MetricsSummary`].
//! The streak is the longest run of consecutive on-diet meals in the history's
//! scan order; gaps between dates never break a run, only an off-diet meal does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Anything the streak fold can scan: a diet flag plus the date it is ordered by.
pub trait DietEntry {
    fn is_on_diet(&self) -> bool;
    fn date(&self) -> DateTime<Utc>;
}

/// A single user's meals, guaranteed to be ordered newest first.
///
/// The only constructor sorts, so the aggregator never depends on whatever
/// order the store happened to return rows in.
#[derive(Debug, Clone)]
pub struct MealHistory<T> {
    entries: Vec<T>,
}

impl<T: DietEntry> MealHistory<T> {
    /// Stable sort by date, descending. Meals sharing a date keep their input order.
    pub fn newest_first(mut entries: Vec<T>) -> Self {
        entries.sort_by(|a, b| b.date().cmp(&a.date()));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Longest run of consecutive on-diet meals, scanning newest to oldest.
    pub fn best_on_diet_sequence(&self) -> u64 {
        best_on_diet_sequence(self.entries.iter().map(DietEntry::is_on_diet))
    }
}

/// Longest run of `true` values in scan order. Empty input yields 0.
pub fn best_on_diet_sequence<I>(flags: I) -> u64
where
    I: IntoIterator<Item = bool>,
{
    let (best, _) = flags.into_iter().fold((0u64, 0u64), |(best, current), on_diet| {
        let current = if on_diet { current + 1 } else { 0 };
        (best.max(current), current)
    });
    best
}

/// Response body for `GET /meals/metrics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub total_meals: u64,
    pub total_meals_on_diet: u64,
    pub total_meals_off_diet: u64,
    pub best_on_diet_sequence: u64,
}

impl MetricsSummary {
    /// Combine a history with the store's on/off diet counts.
    ///
    /// The counts come from separate count queries and are reported as given;
    /// `total_meals` is the length of the history snapshot.
    pub fn summarize<T: DietEntry>(history: &MealHistory<T>, on_diet: u64, off_diet: u64) -> Self {
        Self {
            total_meals: history.len() as u64,
            total_meals_on_diet: on_diet,
            total_meals_off_diet: off_diet,
            best_on_diet_sequence: history.best_on_diet_sequence(),
        }
    }

    /// Summary computed entirely from the history, without separate counts.
    pub fn from_history<T: DietEntry>(history: &MealHistory<T>) -> Self {
        let on_diet = history.entries().iter().filter(|m| m.is_on_diet()).count() as u64;
        let off_diet = history.len() as u64 - on_diet;
        Self::summarize(history, on_diet, off_diet)
    }
}
