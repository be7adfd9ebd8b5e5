//! Frequency-based predictions from task completion history.
//!
//! Works over completion records supplied by the caller; nothing here reads
//! storage. Only records inside the lookback window (default 30 days before
//! `today`, inclusive) count.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;

/// Default lookback window for predictions (days).
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// A completed task occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub task_name: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub date: NaiveDate,
}

impl CompletionRecord {
    pub fn duration_hours(&self) -> f64 {
        f64::from(self.end_time.minutes().saturating_sub(self.start_time.minutes())) / 60.0
    }
}

pub struct TimePredictor {
    today: NaiveDate,
    lookback_days: i64,
}

impl TimePredictor {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }

    pub fn with_lookback(mut self, days: i64) -> Self {
        self.lookback_days = days;
        self
    }

    fn in_window<'a>(
        &self,
        records: &'a [CompletionRecord],
        task_name: &'a str,
    ) -> impl Iterator<Item = &'a CompletionRecord> + 'a {
        let cutoff = self.today - Duration::days(self.lookback_days);
        let today = self.today;
        records
            .iter()
            .filter(move |r| r.task_name == task_name && r.date >= cutoff && r.date <= today)
    }

    /// Most frequent start time for `task_name`. Ties go to the first seen.
    pub fn predict_start_time(
        &self,
        records: &[CompletionRecord],
        task_name: &str,
    ) -> Option<ClockTime> {
        most_common(self.in_window(records, task_name).map(|r| r.start_time))
            .map(|(time, _)| time)
    }

    /// Mean duration in hours for `task_name`.
    pub fn average_duration_hours(
        &self,
        records: &[CompletionRecord],
        task_name: &str,
    ) -> Option<f64> {
        let durations: Vec<f64> = self
            .in_window(records, task_name)
            .map(CompletionRecord::duration_hours)
            .collect();
        if durations.is_empty() {
            return None;
        }
        Some(durations.iter().sum::<f64>() / durations.len() as f64)
    }

    /// Most frequently completed task names with their counts, over all history.
    pub fn recommended_tasks(
        &self,
        records: &[CompletionRecord],
        limit: usize,
    ) -> Vec<(String, usize)> {
        ranked(records.iter().map(|r| r.task_name.clone()))
            .into_iter()
            .take(limit)
            .collect()
    }
}

/// Count occurrences, ordered by count desc then first appearance.
fn ranked<T, I>(items: I) -> Vec<(T, usize)>
where
    T: Eq + std::hash::Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (seen, item) in items.into_iter().enumerate() {
        counts.entry(item).or_insert((0, seen)).0 += 1;
    }

    let mut ranked: Vec<(T, usize, usize)> = counts
        .into_iter()
        .map(|(item, (count, first))| (item, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().map(|(item, count, _)| (item, count)).collect()
}

fn most_common<T, I>(items: I) -> Option<(T, usize)>
where
    T: Eq + std::hash::Hash + Clone,
    I: IntoIterator<Item = T>,
{
    ranked(items).into_iter().next()
}
