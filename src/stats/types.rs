//! Result types for the statistics engine.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::DayOfWeek;
use crate::filter::Filter;

/// Which statistic family an error or timing belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatCategory {
    Time,
    Station,
    User,
}

impl std::fmt::Display for StatCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Time => write!(f, "time"),
            Self::Station => write!(f, "station"),
            Self::User => write!(f, "user"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatisticsError {
    /// Most-frequent and min/max are undefined over zero trips.
    #[error("no trips to compute {0} statistics over")]
    EmptyInput(StatCategory),
}

/// A category value and how many trips carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count<T> {
    pub value: T,
    pub count: u64,
}

impl<T> Count<T> {
    pub fn new(value: T, count: u64) -> Self {
        Self { value, count }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    pub popular_hour: Count<u32>,
    /// Reported when the filter does not fix the day (mode none or month).
    pub popular_day: Option<Count<DayOfWeek>>,
    /// Month number; reported when the filter does not fix the month
    /// (mode none or day).
    pub popular_month: Option<Count<u32>>,
    /// `popular_month` rendered as a name ("March").
    pub popular_month_name: Option<String>,
    /// Seconds.
    pub total_duration: f64,
    pub mean_duration: f64,
    pub trip_count: usize,
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Each field is `None` when no trip in the set records that station (or,
/// for the trip pair, both stations).
pub struct StationStats {
    pub popular_start_station: Option<Count<String>>,
    pub popular_end_station: Option<Count<String>>,
    pub popular_trip: Option<Count<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: Count<i32>,
    pub latest: Count<i32>,
    pub most_common: Count<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    /// Descending by count; ties in first-seen order.
    pub user_types: Vec<Count<String>>,
    /// `None` for cities without demographic columns.
    pub genders: Option<Vec<Count<String>>>,
    /// `None` without demographic columns, or when no trip in the set has a
    /// birth year.
    pub birth_years: Option<BirthYearStats>,
}

/// Every statistic for one filtered set. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub filter: Filter,
    pub time: TimeStats,
    pub station: StationStats,
    pub user: UserStats,
}
