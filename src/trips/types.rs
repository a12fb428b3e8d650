//! Trip records and the filtered set produced by the loader.

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::DayOfWeek;
use crate::filter::Filter;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Failure to produce a [`FilteredTripSet`]. No partial set is ever returned.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read trip data from {location}: {reason}")]
    SourceUnavailable { location: String, reason: String },

    #[error("malformed record at row {row}: {column} value '{value}' {reason}")]
    MalformedRecord {
        /// 1-based data row (the header is row 0).
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },
}

impl LoadError {
    pub(crate) fn unavailable(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// TripRecord
// ---------------------------------------------------------------------------

/// One trip, with its calendar fields derived once at load time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    /// 1-based position in the source file.
    pub row: usize,
    pub start_time: NaiveDateTime,
    /// Absent when the dataset has no `End Time` column.
    pub end_time: Option<NaiveDateTime>,
    /// Absent when the cell is blank.
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    /// Seconds.
    pub trip_duration: f64,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,

    // Derived.
    pub month: u32,
    pub day_of_week: DayOfWeek,
    pub start_hour: u32,
    pub end_hour: Option<u32>,
    /// `"{start_station} to {end_station}"`, only when both stations are known.
    pub trip: Option<String>,
}

/// Label joining two stations into a trip pair.
pub fn trip_label(start_station: &str, end_station: &str) -> String {
    format!("{start_station} to {end_station}")
}

// ---------------------------------------------------------------------------
// FilteredTripSet
// ---------------------------------------------------------------------------

/// Records surviving a [`Filter`], in source-file order.
#[derive(Debug, Clone)]
pub struct FilteredTripSet {
    filter: Filter,
    trips: Vec<TripRecord>,
    source_rows: usize,
}

impl FilteredTripSet {
    pub fn new(filter: Filter, trips: Vec<TripRecord>, source_rows: usize) -> Self {
        Self {
            filter,
            trips,
            source_rows,
        }
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn trips(&self) -> &[TripRecord] {
        &self.trips
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.trips.iter()
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Number of rows in the source before filtering.
    pub fn source_rows(&self) -> usize {
        self.source_rows
    }
}

impl<'a> IntoIterator for &'a FilteredTripSet {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.trips.iter()
    }
}
