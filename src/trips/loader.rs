//! CSV ingestion: parse, derive calendar fields, apply the [`Filter`].
//!
//! Columns are located by header name, so the unnamed index column that the
//! published files start with is simply ignored. Timestamps use
//! [`TIMESTAMP_FORMAT`] (`2017-01-01 09:07:57`).

use std::fs::File;
use std::io::Read;
use std::time::Instant;

use chrono::{Datelike, NaiveDateTime, Timelike};
use csv::StringRecord;
use tracing::{debug, info};

use super::types::{FilteredTripSet, LoadError, TripRecord, trip_label};
use crate::catalog::{City, DatasetCatalog, DayOfWeek};
use crate::filter::Filter;

/// `chrono` format of `Start Time` / `End Time` cells.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const COL_START_TIME: &str = "Start Time";
pub const COL_END_TIME: &str = "End Time";
pub const COL_TRIP_DURATION: &str = "Trip Duration";
pub const COL_START_STATION: &str = "Start Station";
pub const COL_END_STATION: &str = "End Station";
pub const COL_USER_TYPE: &str = "User Type";
pub const COL_GENDER: &str = "Gender";
pub const COL_BIRTH_YEAR: &str = "Birth Year";

/// Load the city named by `filter` from the catalog and apply the filter.
pub fn load(catalog: &DatasetCatalog, filter: &Filter) -> Result<FilteredTripSet, LoadError> {
    let path = catalog.source_path(filter.city());
    let location = path.display().to_string();
    debug!(city = filter.city().slug(), path = %location, "opening trip source");

    let file = File::open(&path).map_err(|e| LoadError::unavailable(&location, e))?;
    load_from_reader(file, &location, filter)
}

/// Parse CSV from any reader. `location` only labels errors and logs.
pub fn load_from_reader<R: Read>(
    reader: R,
    location: &str,
    filter: &Filter,
) -> Result<FilteredTripSet, LoadError> {
    let started = Instant::now();
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| LoadError::unavailable(location, e))?
        .clone();
    let columns = Columns::locate(&headers, filter.city(), location)?;

    let mut kept = Vec::new();
    let mut source_rows = 0usize;
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| LoadError::unavailable(location, e))?;
        let trip = columns.parse(&record, idx + 1)?;
        source_rows += 1;
        if matches_filter(&trip, filter) {
            kept.push(trip);
        }
    }

    info!(
        city = filter.city().slug(),
        mode = %filter.mode(),
        source_rows,
        kept = kept.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "loaded trips"
    );
    Ok(FilteredTripSet::new(filter.clone(), kept, source_rows))
}

/// Conjunctive month/day match; unset criteria always match.
pub fn matches_filter(trip: &TripRecord, filter: &Filter) -> bool {
    let month_ok = filter.month().is_none_or(|m| trip.month == m.number());
    let day_ok = filter.day().is_none_or(|d| trip.day_of_week == d);
    month_ok && day_ok
}

/// Parse one timestamp cell.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

struct Columns {
    start_time: usize,
    end_time: Option<usize>,
    trip_duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord, city: City, location: &str) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| {
                LoadError::unavailable(location, format!("missing required column '{name}'"))
            })
        };

        // End Time and the demographic columns are mandatory only where the
        // city publishes them.
        let (end_time, gender, birth_year) = if city.has_demographics() {
            (
                Some(require(COL_END_TIME)?),
                Some(require(COL_GENDER)?),
                Some(require(COL_BIRTH_YEAR)?),
            )
        } else {
            (find(COL_END_TIME), None, None)
        };

        Ok(Self {
            start_time: require(COL_START_TIME)?,
            end_time,
            trip_duration: require(COL_TRIP_DURATION)?,
            start_station: require(COL_START_STATION)?,
            end_station: require(COL_END_STATION)?,
            user_type: require(COL_USER_TYPE)?,
            gender,
            birth_year,
        })
    }

    fn parse(&self, record: &StringRecord, row: usize) -> Result<TripRecord, LoadError> {
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();
        let optional = |idx: Option<usize>| {
            idx.map(cell)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let start_raw = cell(self.start_time);
        let start_time = parse_timestamp(start_raw)
            .map_err(|e| malformed(row, COL_START_TIME, start_raw, e))?;
        let end_time = match self.end_time {
            Some(idx) => {
                let raw = cell(idx);
                Some(parse_timestamp(raw).map_err(|e| malformed(row, COL_END_TIME, raw, e))?)
            }
            None => None,
        };

        let duration_raw = cell(self.trip_duration);
        let trip_duration = parse_finite(duration_raw)
            .map_err(|reason| malformed(row, COL_TRIP_DURATION, duration_raw, reason))?;

        let birth_year = match optional(self.birth_year) {
            Some(raw) => Some(
                parse_finite(&raw)
                    .map(|year| year.trunc() as i32)
                    .map_err(|reason| malformed(row, COL_BIRTH_YEAR, &raw, reason))?,
            ),
            None => None,
        };

        let start_station = optional(Some(self.start_station));
        let end_station = optional(Some(self.end_station));
        let trip = match (&start_station, &end_station) {
            (Some(from), Some(to)) => Some(trip_label(from, to)),
            _ => None,
        };

        Ok(TripRecord {
            row,
            start_time,
            end_time,
            start_station,
            end_station,
            trip_duration,
            user_type: optional(Some(self.user_type)),
            gender: optional(self.gender),
            birth_year,
            month: start_time.month(),
            day_of_week: DayOfWeek::from(start_time.weekday()),
            start_hour: start_time.hour(),
            end_hour: end_time.map(|t| t.hour()),
            trip,
        })
    }
}

fn parse_finite(raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err("is not a finite number".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn malformed(row: usize, column: &'static str, value: &str, reason: impl ToString) -> LoadError {
    LoadError::MalformedRecord {
        row,
        column,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
