//! Statistic computations over a [`FilteredTripSet`].
//!
//! Each category is independent and read-only over the set. Empty sets yield
//! [`StatisticsError::EmptyInput`]. The start hour breaks ties by lowest
//! hour; every other "most frequent" value breaks ties by first appearance
//! in file order.

use tracing::warn;

use super::observer::{StatsObserver, timed};
use super::tally::Tally;
use super::types::*;
use crate::catalog::month_label;
use crate::trips::{FilteredTripSet, TripRecord};

fn ensure_non_empty(set: &FilteredTripSet, category: StatCategory) -> Result<(), StatisticsError> {
    if set.is_empty() {
        Err(StatisticsError::EmptyInput(category))
    } else {
        Ok(())
    }
}

fn winner<K: Clone>(top: Option<(&K, u64)>, category: StatCategory) -> Result<Count<K>, StatisticsError> {
    top.map(|(value, count)| Count::new(value.clone(), count))
        .ok_or(StatisticsError::EmptyInput(category))
}

fn to_counts(tally: &Tally<String>) -> Vec<Count<String>> {
    tally
        .ranked()
        .into_iter()
        .map(|(value, count)| Count::new(value, count))
        .collect()
}

/// Popular hour, day and month, plus duration totals.
///
/// The popular day is reported only when the filter does not fix the day
/// (mode none or month); the popular month only when it does not fix the
/// month (mode none or day).
pub fn time_stats(
    set: &FilteredTripSet,
    observer: &mut dyn StatsObserver,
) -> Result<TimeStats, StatisticsError> {
    const CAT: StatCategory = StatCategory::Time;
    ensure_non_empty(set, CAT)?;
    let mode = set.filter().mode();

    let popular_hour = timed(observer, CAT, "start_hour", || {
        let hours: Tally<u32> = set.iter().map(|t| t.start_hour).collect();
        winner(hours.most_common_lowest(), CAT)
    })?;

    let popular_day = if mode.uses_day() {
        None
    } else {
        Some(timed(observer, CAT, "day_of_week", || {
            let days: Tally<_> = set.iter().map(|t| t.day_of_week).collect();
            winner(days.most_common(), CAT)
        })?)
    };

    let popular_month = if mode.uses_month() {
        None
    } else {
        Some(timed(observer, CAT, "month", || {
            let months: Tally<u32> = set.iter().map(|t| t.month).collect();
            winner(months.most_common(), CAT)
        })?)
    };

    let popular_month_name = popular_month.as_ref().map(|m| month_label(m.value));

    let (total_duration, trip_count) = timed(observer, CAT, "trip_duration", || {
        let total: f64 = set.iter().map(|t| t.trip_duration).sum();
        (total, set.len())
    });

    Ok(TimeStats {
        popular_hour,
        popular_day,
        popular_month,
        popular_month_name,
        total_duration,
        mean_duration: total_duration / trip_count as f64,
        trip_count,
    })
}

/// Popular start station, end station and start→end pair.
pub fn station_stats(
    set: &FilteredTripSet,
    observer: &mut dyn StatsObserver,
) -> Result<StationStats, StatisticsError> {
    const CAT: StatCategory = StatCategory::Station;
    ensure_non_empty(set, CAT)?;

    let popular_start_station = timed(observer, CAT, "start_station", || {
        most_common_label(set, |t| t.start_station.as_deref())
    });
    let popular_end_station = timed(observer, CAT, "end_station", || {
        most_common_label(set, |t| t.end_station.as_deref())
    });
    let popular_trip = timed(observer, CAT, "trip", || {
        most_common_label(set, |t| t.trip.as_deref())
    });
    if popular_trip.is_none() {
        warn!(
            city = set.filter().city().slug(),
            trips = set.len(),
            "no trip in the set records both stations"
        );
    }

    Ok(StationStats {
        popular_start_station,
        popular_end_station,
        popular_trip,
    })
}

/// Blank labels are left out of the tally.
fn most_common_label(
    set: &FilteredTripSet,
    label: impl Fn(&TripRecord) -> Option<&str>,
) -> Option<Count<String>> {
    let tally: Tally<&str> = set.iter().filter_map(|t| label(t)).collect();
    tally
        .most_common()
        .map(|(value, count)| Count::new((*value).to_string(), count))
}

/// User-type breakdown, and for cities with demographics the gender
/// breakdown and birth-year extremes.
pub fn user_stats(
    set: &FilteredTripSet,
    observer: &mut dyn StatsObserver,
) -> Result<UserStats, StatisticsError> {
    const CAT: StatCategory = StatCategory::User;
    ensure_non_empty(set, CAT)?;

    let user_types = timed(observer, CAT, "user_type", || {
        let tally: Tally<String> = set.iter().filter_map(|t| t.user_type.clone()).collect();
        to_counts(&tally)
    });

    if !set.filter().city().has_demographics() {
        return Ok(UserStats {
            user_types,
            genders: None,
            birth_years: None,
        });
    }

    let genders = timed(observer, CAT, "gender", || {
        let tally: Tally<String> = set.iter().filter_map(|t| t.gender.clone()).collect();
        to_counts(&tally)
    });

    let years: Tally<i32> = set.iter().filter_map(|t| t.birth_year).collect();
    let birth_years = if years.is_empty() {
        warn!(
            city = set.filter().city().slug(),
            trips = set.len(),
            "no birth years recorded in filtered trips"
        );
        None
    } else {
        let earliest = timed(observer, CAT, "earliest_birth_year", || {
            years.min_key().map(|&y| Count::new(y, years.count(&y)))
        });
        let latest = timed(observer, CAT, "latest_birth_year", || {
            years.max_key().map(|&y| Count::new(y, years.count(&y)))
        });
        let most_common = timed(observer, CAT, "common_birth_year", || {
            years.most_common().map(|(&y, n)| Count::new(y, n))
        });
        match (earliest, latest, most_common) {
            (Some(earliest), Some(latest), Some(most_common)) => Some(BirthYearStats {
                earliest,
                latest,
                most_common,
            }),
            _ => None,
        }
    };

    Ok(UserStats {
        user_types,
        genders: Some(genders),
        birth_years,
    })
}

/// All three categories. Fails on the first category that fails, which for
/// an empty set is the time category.
pub fn compute_report(
    set: &FilteredTripSet,
    observer: &mut dyn StatsObserver,
) -> Result<StatisticsReport, StatisticsError> {
    Ok(StatisticsReport {
        filter: set.filter().clone(),
        time: time_stats(set, observer)?,
        station: station_stats(set, observer)?,
        user: user_stats(set, observer)?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
