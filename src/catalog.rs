//! Static catalog of the cities, months and weekdays the datasets cover.
//!
//! The catalog is built once at start-up (optionally with file-name overrides
//! from [`crate::config::AppConfig`]) and only read afterwards.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

// ---------------------------------------------------------------------------
// City
// ---------------------------------------------------------------------------

/// A city with a published trip dataset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYork,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYork, City::Washington];

    /// Stable identifier, also the key used in config `[files]` tables.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Chicago => "chicago",
            Self::NewYork => "new_york",
            Self::Washington => "washington",
        }
    }

    /// Display name used in prompts and headings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Chicago => "Chicago",
            Self::NewYork => "New York",
            Self::Washington => "Washington",
        }
    }

    /// Data file name used when no override is configured.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::Chicago => "chicago.csv",
            Self::NewYork => "new_york_city.csv",
            Self::Washington => "washington.csv",
        }
    }

    /// Whether the dataset carries `Gender` and `Birth Year` columns.
    ///
    /// Washington publishes neither; its `End Time` column is also treated as
    /// optional.
    pub fn has_demographics(&self) -> bool {
        !matches!(self, Self::Washington)
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Month
// ---------------------------------------------------------------------------

/// The six months covered by the datasets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
}

impl Month {
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    /// 1-based calendar number (January = 1).
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    /// Inverse of [`Month::number`]; `None` outside 1..=6.
    pub fn from_number(number: u32) -> Option<Month> {
        number
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx as usize))
            .copied()
    }

    /// Case-insensitive lookup by name, ignoring surrounding whitespace.
    pub fn from_name(raw: &str) -> Option<Month> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(raw))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Render a derived month number as a name, falling back to the number for
/// months outside the catalog.
pub fn month_label(number: u32) -> String {
    u8::try_from(number)
        .ok()
        .and_then(|n| chrono::Month::try_from(n).ok())
        .map(|month| month.name().to_string())
        .unwrap_or_else(|| format!("month {number}"))
}

// ---------------------------------------------------------------------------
// DayOfWeek
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Case-insensitive lookup by name, ignoring surrounding whitespace.
    pub fn from_name(raw: &str) -> Option<DayOfWeek> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(raw))
    }

    /// Title-cased canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// DatasetCatalog
// ---------------------------------------------------------------------------

/// One catalog entry, as listed by `bikeshare cities`.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub city: City,
    pub file_name: String,
    pub path: PathBuf,
    pub has_demographics: bool,
}

/// Immutable mapping from [`City`] to its record source.
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    data_dir: PathBuf,
    files: HashMap<City, String>,
}

impl DatasetCatalog {
    /// Catalog rooted at `data_dir` with the default file names.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let files = City::ALL
            .iter()
            .map(|city| (*city, city.default_file_name().to_string()))
            .collect();
        Self {
            data_dir: data_dir.into(),
            files,
        }
    }

    /// Replace the file name used for one city.
    pub fn with_file(mut self, city: City, file_name: impl Into<String>) -> Self {
        self.files.insert(city, file_name.into());
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The record source for `city`.
    pub fn source_path(&self, city: City) -> PathBuf {
        let file_name = self
            .files
            .get(&city)
            .map(String::as_str)
            .unwrap_or_else(|| city.default_file_name());
        self.data_dir.join(file_name)
    }

    /// Every city in declaration order.
    pub fn cities(&self) -> &'static [City] {
        &City::ALL
    }

    pub fn months(&self) -> &'static [Month] {
        &Month::ALL
    }

    pub fn days(&self) -> &'static [DayOfWeek] {
        &DayOfWeek::ALL
    }

    /// Whether `raw` names one of the covered months.
    pub fn contains_month(&self, raw: &str) -> bool {
        Month::from_name(raw).is_some()
    }

    /// Whether `raw` names a day of the week.
    pub fn contains_day(&self, raw: &str) -> bool {
        DayOfWeek::from_name(raw).is_some()
    }

    pub fn entries(&self) -> Vec<CatalogEntry> {
        City::ALL
            .iter()
            .map(|city| CatalogEntry {
                city: *city,
                file_name: self
                    .files
                    .get(city)
                    .cloned()
                    .unwrap_or_else(|| city.default_file_name().to_string()),
                path: self.source_path(*city),
                has_demographics: city.has_demographics(),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
