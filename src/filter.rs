//! Validation and canonicalisation of raw filter input.
//!
//! Every normalizer is pure: it trims and case-folds its input, then either
//! returns the typed value or a [`ValidationError`] naming the accepted
//! values. Re-prompting is left to the caller (see [`crate::session`]).

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{City, DayOfWeek, Month};

/// Rejection of a raw input string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid city '{0}': expected one of Chicago, New York, Washington")]
    InvalidCity(String),

    #[error("invalid filter '{0}': expected one of month, day, both, none")]
    InvalidMode(String),

    #[error("invalid month '{0}': expected one of January, February, March, April, May, June")]
    InvalidMonth(String),

    #[error(
        "invalid day '{0}': expected one of Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday"
    )]
    InvalidDay(String),

    #[error("invalid answer '{0}': expected yes or no")]
    InvalidChoice(String),

    #[error("a month is required when filtering by {0}")]
    MissingMonth(FilterMode),

    #[error("a day is required when filtering by {0}")]
    MissingDay(FilterMode),
}

/// Which calendar dimensions a [`Filter`] restricts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    None,
    Month,
    Day,
    Both,
}

impl FilterMode {
    pub fn uses_month(&self) -> bool {
        matches!(self, Self::Month | Self::Both)
    }

    pub fn uses_day(&self) -> bool {
        matches!(self, Self::Day | Self::Both)
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Month => write!(f, "month"),
            Self::Day => write!(f, "day"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// Validated query criteria.
///
/// `month` is set iff the mode is `Month` or `Both`; `day` iff the mode is
/// `Day` or `Both`. The fields are private so the only way to build a
/// `Filter` is through constructors that uphold this.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Filter {
    city: City,
    mode: FilterMode,
    month: Option<Month>,
    day: Option<DayOfWeek>,
}

impl Filter {
    /// No calendar filtering.
    pub fn all(city: City) -> Self {
        Self {
            city,
            mode: FilterMode::None,
            month: None,
            day: None,
        }
    }

    pub fn by_month(city: City, month: Month) -> Self {
        Self {
            city,
            mode: FilterMode::Month,
            month: Some(month),
            day: None,
        }
    }

    pub fn by_day(city: City, day: DayOfWeek) -> Self {
        Self {
            city,
            mode: FilterMode::Day,
            month: None,
            day: Some(day),
        }
    }

    pub fn by_month_and_day(city: City, month: Month, day: DayOfWeek) -> Self {
        Self {
            city,
            mode: FilterMode::Both,
            month: Some(month),
            day: Some(day),
        }
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn month(&self) -> Option<Month> {
        self.month
    }

    pub fn day(&self) -> Option<DayOfWeek> {
        self.day
    }

    /// Human description, e.g. "all Mondays of March".
    pub fn describe(&self) -> String {
        match (self.month, self.day) {
            (Some(m), Some(d)) => format!("all {d}s of {m}"),
            (Some(m), None) => m.to_string(),
            (None, Some(d)) => format!("all {d}s"),
            (None, None) => "all months and days".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalizers
// ---------------------------------------------------------------------------

fn fold(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Match a city name ignoring case, whitespace and underscores, so
/// `" New  York "`, `"new_york"` and `"NEW YORK CITY"` all resolve.
pub fn normalize_city(raw: &str) -> Result<City, ValidationError> {
    let key: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect();
    match key.as_str() {
        "chicago" => Ok(City::Chicago),
        "newyork" | "newyorkcity" => Ok(City::NewYork),
        "washington" => Ok(City::Washington),
        _ => Err(ValidationError::InvalidCity(raw.trim().to_string())),
    }
}

pub fn normalize_mode(raw: &str) -> Result<FilterMode, ValidationError> {
    match fold(raw).as_str() {
        "month" => Ok(FilterMode::Month),
        "day" => Ok(FilterMode::Day),
        "both" => Ok(FilterMode::Both),
        "none" => Ok(FilterMode::None),
        _ => Err(ValidationError::InvalidMode(raw.trim().to_string())),
    }
}

pub fn normalize_month(raw: &str) -> Result<Month, ValidationError> {
    Month::from_name(raw).ok_or_else(|| ValidationError::InvalidMonth(raw.trim().to_string()))
}

pub fn normalize_day(raw: &str) -> Result<DayOfWeek, ValidationError> {
    DayOfWeek::from_name(raw).ok_or_else(|| ValidationError::InvalidDay(raw.trim().to_string()))
}

/// Yes/no answer for the raw-data and restart questions.
pub fn normalize_choice(raw: &str) -> Result<bool, ValidationError> {
    match fold(raw).as_str() {
        "yes" | "y" => Ok(true),
        "no" | "n" => Ok(false),
        _ => Err(ValidationError::InvalidChoice(raw.trim().to_string())),
    }
}

/// Assemble a [`Filter`], normalizing only the inputs the mode asks for.
///
/// A raw month is ignored unless `mode` is `Month` or `Both`, and a raw day
/// unless it is `Day` or `Both`.
pub fn build_filter(
    city: City,
    mode: FilterMode,
    month_raw: Option<&str>,
    day_raw: Option<&str>,
) -> Result<Filter, ValidationError> {
    let month = if mode.uses_month() {
        let raw = month_raw.ok_or(ValidationError::MissingMonth(mode))?;
        Some(normalize_month(raw)?)
    } else {
        None
    };
    let day = if mode.uses_day() {
        let raw = day_raw.ok_or(ValidationError::MissingDay(mode))?;
        Some(normalize_day(raw)?)
    } else {
        None
    };

    Ok(match (month, day) {
        (Some(m), Some(d)) => Filter::by_month_and_day(city, m, d),
        (Some(m), None) => Filter::by_month(city, m),
        (None, Some(d)) => Filter::by_day(city, d),
        (None, None) => Filter::all(city),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_ignores_case_and_whitespace() {
        assert_eq!(normalize_city("chicago"), Ok(City::Chicago));
        assert_eq!(normalize_city("  CHICAGO\t"), Ok(City::Chicago));
        assert_eq!(normalize_city("New York"), Ok(City::NewYork));
        assert_eq!(normalize_city("new_york"), Ok(City::NewYork));
        assert_eq!(normalize_city("new york city"), Ok(City::NewYork));
        assert_eq!(normalize_city("Washington "), Ok(City::Washington));
    }

    #[test]
    fn unknown_city_is_rejected_with_trimmed_input() {
        assert_eq!(
            normalize_city(" boston "),
            Err(ValidationError::InvalidCity("boston".into()))
        );
        assert!(normalize_city("").is_err());
    }

    #[test]
    fn mode_accepts_the_four_keywords() {
        assert_eq!(normalize_mode("Month"), Ok(FilterMode::Month));
        assert_eq!(normalize_mode("DAY"), Ok(FilterMode::Day));
        assert_eq!(normalize_mode(" both "), Ok(FilterMode::Both));
        assert_eq!(normalize_mode("none"), Ok(FilterMode::None));
        assert_eq!(
            normalize_mode("all"),
            Err(ValidationError::InvalidMode("all".into()))
        );
    }

    #[test]
    fn months_outside_the_dataset_are_rejected() {
        assert_eq!(normalize_month("march"), Ok(Month::March));
        assert_eq!(normalize_month("JUNE"), Ok(Month::June));
        assert_eq!(
            normalize_month("July"),
            Err(ValidationError::InvalidMonth("July".into()))
        );
        assert!(normalize_month("mar").is_err());
    }

    #[test]
    fn days_ignore_case() {
        assert_eq!(normalize_day("monday"), Ok(DayOfWeek::Monday));
        assert_eq!(normalize_day("sUnDaY"), Ok(DayOfWeek::Sunday));
        assert!(normalize_day("Mon").is_err());
        assert!(normalize_day("").is_err());
    }

    #[test]
    fn choice_accepts_yes_and_no() {
        assert_eq!(normalize_choice("YES"), Ok(true));
        assert_eq!(normalize_choice(" n"), Ok(false));
        assert_eq!(
            normalize_choice("maybe"),
            Err(ValidationError::InvalidChoice("maybe".into()))
        );
    }

    #[test]
    fn build_filter_ignores_unused_inputs() {
        let f = build_filter(City::Chicago, FilterMode::None, Some("march"), Some("monday"))
            .unwrap();
        assert_eq!(f.month(), None);
        assert_eq!(f.day(), None);

        let f = build_filter(City::Chicago, FilterMode::Day, Some("bogus"), Some("friday"))
            .unwrap();
        assert_eq!(f.month(), None);
        assert_eq!(f.day(), Some(DayOfWeek::Friday));

        let f = build_filter(City::Chicago, FilterMode::Month, Some("april"), Some("bogus"))
            .unwrap();
        assert_eq!(f.month(), Some(Month::April));
        assert_eq!(f.day(), None);
    }

    #[test]
    fn build_filter_both_sets_both_fields() {
        let f = build_filter(
            City::NewYork,
            FilterMode::Both,
            Some("January"),
            Some("tuesday"),
        )
        .unwrap();
        assert_eq!(f.mode(), FilterMode::Both);
        assert_eq!(f.month(), Some(Month::January));
        assert_eq!(f.day(), Some(DayOfWeek::Tuesday));
        assert_eq!(f.describe(), "all Tuesdays of January");
    }

    #[test]
    fn build_filter_requires_the_inputs_its_mode_uses() {
        assert_eq!(
            build_filter(City::Chicago, FilterMode::Month, None, None),
            Err(ValidationError::MissingMonth(FilterMode::Month))
        );
        assert_eq!(
            build_filter(City::Chicago, FilterMode::Both, Some("may"), None),
            Err(ValidationError::MissingDay(FilterMode::Both))
        );
        assert_eq!(
            build_filter(City::Chicago, FilterMode::Day, None, Some("someday")),
            Err(ValidationError::InvalidDay("someday".into()))
        );
    }

    #[test]
    fn validation_messages_list_accepted_values() {
        let msg = ValidationError::InvalidMonth("july".into()).to_string();
        assert!(msg.contains("January"));
        assert!(msg.contains("June"));
    }
}
