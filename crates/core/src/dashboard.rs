//! Dashboard aggregation.
//!
//! The repository layer answers each sub-metric with SQL; when a query fails
//! the API recomputes that metric from the in-process fallback records using
//! the scans below, so both paths share the same definitions.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::NaiveDate;
use serde::Serialize;

/// Length of the trend arrays.
pub const TREND_DAYS: usize = 7;

/// How many substations the "most visited" list keeps.
pub const TOP_SUBSTATIONS: usize = 5;

/// One entry of the most-visited substations ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubstationVisits {
    pub name: String,
    pub count: i64,
}

/// Full dashboard payload.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_staff_online_today: i64,
    pub active_faults: i64,
    pub server_room_entries_today: i64,
    pub field_activities_today: i64,
    pub faults_trend: Vec<i64>,
    pub attendance_trend: Vec<i64>,
    pub most_visited_substations: Vec<SubstationVisits>,
    pub dates: Vec<NaiveDate>,
}

/// Rank substation names by number of occurrences.
///
/// Empty names are ignored. Ties keep first-encountered order (stable sort
/// descending by count).
pub fn rank_substations<'a, I>(names: I, limit: usize) -> Vec<SubstationVisits>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, i64> = HashMap::new();

    for name in names {
        if name.is_empty() {
            continue;
        }
        let count = counts.entry(name).or_insert_with(|| {
            order.push(name);
            0
        });
        *count += 1;
    }

    let mut ranked: Vec<SubstationVisits> = order
        .into_iter()
        .map(|name| SubstationVisits {
            name: name.to_string(),
            count: counts[name],
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

/// Count items whose date is `day`.
pub fn count_on<T>(items: &[T], day: NaiveDate, date_of: impl Fn(&T) -> NaiveDate) -> i64 {
    items.iter().filter(|item| date_of(item) == day).count() as i64
}

/// Count distinct keys among items dated `day`.
pub fn distinct_on<T, K>(
    items: &[T],
    day: NaiveDate,
    date_of: impl Fn(&T) -> NaiveDate,
    key_of: impl Fn(&T) -> K,
) -> i64
where
    K: Eq + Hash,
{
    items
        .iter()
        .filter(|item| date_of(item) == day)
        .map(key_of)
        .collect::<HashSet<K>>()
        .len() as i64
}

/// Per-day item counts across `window`.
pub fn trend<T>(window: &[NaiveDate], items: &[T], date_of: impl Fn(&T) -> NaiveDate) -> Vec<i64> {
    window
        .iter()
        .map(|day| count_on(items, *day, &date_of))
        .collect()
}

/// Per-day distinct-key counts across `window`.
pub fn distinct_trend<T, K>(
    window: &[NaiveDate],
    items: &[T],
    date_of: impl Fn(&T) -> NaiveDate,
    key_of: impl Fn(&T) -> K,
) -> Vec<i64>
where
    K: Eq + Hash,
{
    window
        .iter()
        .map(|day| distinct_on(items, *day, &date_of, &key_of))
        .collect()
}

/// Spread sparse `(date, count)` rows from a GROUP BY over `window`,
/// filling days without rows with zero.
pub fn fill_window(window: &[NaiveDate], rows: &[(NaiveDate, i64)]) -> Vec<i64> {
    let by_day: HashMap<NaiveDate, i64> = rows.iter().copied().collect();
    window
        .iter()
        .map(|day| by_day.get(day).copied().unwrap_or(0))
        .collect()
}
