//! Text and JSON rendering of statistics and raw rows.
//!
//! The core never formats prose; everything user-facing is produced here.

use std::io::{self, Write};

use console::{Alignment, measure_text_width, pad_str, style};

use crate::catalog::CatalogEntry;
use crate::filter::Filter;
use crate::paginate::RowSlice;
use crate::stats::{
    Count, StatCategory, StationStats, StatisticsReport, TimeStats, TimingRecorder, UserStats,
};
use crate::trips::TIMESTAMP_FORMAT;

/// "Showing Chicago data for all Mondays of March".
pub fn write_filter_banner(w: &mut dyn Write, filter: &Filter) -> io::Result<()> {
    writeln!(
        w,
        "\n{}",
        style(format!(
            "Showing {} data for {}",
            filter.city(),
            filter.describe()
        ))
        .bold()
    )
}

fn write_heading(w: &mut dyn Write, text: &str) -> io::Result<()> {
    writeln!(w, "\n{}", style(text).bold().cyan())
}

fn write_popular<T: std::fmt::Display>(
    w: &mut dyn Write,
    label: &str,
    value: T,
    count: u64,
) -> io::Result<()> {
    writeln!(w, "Most popular {label}: {value}")?;
    writeln!(w, "Number of trips: {count}")
}

fn write_popular_label(
    w: &mut dyn Write,
    label: &str,
    top: Option<&Count<String>>,
) -> io::Result<()> {
    match top {
        Some(top) => write_popular(w, label, &top.value, top.count),
        None => writeln!(w, "Most popular {label}: (none recorded)"),
    }
}

fn write_elapsed(w: &mut dyn Write, timings: Option<&TimingRecorder>, cat: StatCategory) -> io::Result<()> {
    match timings {
        Some(rec) => writeln!(
            w,
            "{}",
            style(format!("Execution time: {:.3} ms", rec.category_ms(cat))).dim()
        ),
        None => Ok(()),
    }
}

fn write_breakdown(w: &mut dyn Write, rows: &[Count<String>]) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(w, "  (no values recorded)");
    }
    let width = rows
        .iter()
        .map(|r| measure_text_width(&r.value))
        .max()
        .unwrap_or(0);
    for row in rows {
        let label = pad_str(&row.value, width, Alignment::Left, None);
        writeln!(w, "  {label}  {}", row.count)?;
    }
    Ok(())
}

pub fn write_time_stats(w: &mut dyn Write, stats: &TimeStats) -> io::Result<()> {
    write_heading(w, "Calculating time statistics")?;
    write_popular(
        w,
        "start hour",
        format!("{:02}:00", stats.popular_hour.value),
        stats.popular_hour.count,
    )?;
    if let Some(day) = &stats.popular_day {
        write_popular(w, "day", day.value, day.count)?;
    }
    if let (Some(month), Some(name)) = (&stats.popular_month, &stats.popular_month_name) {
        write_popular(w, "month", name, month.count)?;
    }
    writeln!(w, "Total time of all trips: {:.0} s", stats.total_duration)?;
    writeln!(w, "Average time of all trips: {:.2} s", stats.mean_duration)?;
    writeln!(w, "Number of trips made in total: {}", stats.trip_count)
}

pub fn write_station_stats(w: &mut dyn Write, stats: &StationStats) -> io::Result<()> {
    write_heading(w, "Calculating location statistics")?;
    write_popular_label(w, "start station", stats.popular_start_station.as_ref())?;
    write_popular_label(w, "end station", stats.popular_end_station.as_ref())?;
    write_popular_label(w, "trip", stats.popular_trip.as_ref())
}

pub fn write_user_stats(w: &mut dyn Write, stats: &UserStats) -> io::Result<()> {
    write_heading(w, "Calculating user statistics")?;
    writeln!(w, "Number of different types of users:")?;
    write_breakdown(w, &stats.user_types)?;

    if let Some(genders) = &stats.genders {
        writeln!(w, "Users of different genders:")?;
        write_breakdown(w, genders)?;
    }
    if let Some(years) = &stats.birth_years {
        writeln!(w, "The earliest year of birth is: {}", years.earliest.value)?;
        writeln!(w, "Number of users with the earliest year of birth: {}", years.earliest.count)?;
        writeln!(w, "The most recent year of birth is: {}", years.latest.value)?;
        writeln!(w, "Number of users with the most recent year of birth: {}", years.latest.count)?;
        write_popular(w, "birth year", years.most_common.value, years.most_common.count)?;
    }
    Ok(())
}

/// Full human-readable report, each category followed by its timing when a
/// recorder is supplied.
pub fn write_report(
    w: &mut dyn Write,
    report: &StatisticsReport,
    timings: Option<&TimingRecorder>,
) -> io::Result<()> {
    write_time_stats(w, &report.time)?;
    write_elapsed(w, timings, StatCategory::Time)?;
    write_station_stats(w, &report.station)?;
    write_elapsed(w, timings, StatCategory::Station)?;
    write_user_stats(w, &report.user)?;
    write_elapsed(w, timings, StatCategory::User)
}

pub fn write_no_data(w: &mut dyn Write, filter: &Filter) -> io::Result<()> {
    writeln!(
        w,
        "{}",
        style(format!(
            "No trips match this filter ({} data for {}).",
            filter.city(),
            filter.describe()
        ))
        .yellow()
    )
}

pub fn write_rows(w: &mut dyn Write, slice: &RowSlice<'_>) -> io::Result<()> {
    writeln!(
        w,
        "\n{}",
        style(format!(
            "Rows {}-{} of {}",
            slice.offset + 1,
            slice.next_offset(),
            slice.total
        ))
        .bold()
    )?;
    for trip in slice.rows {
        let end = trip
            .end_time
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            w,
            "#{:<6} {} -> {}  {:>8.1} s  {} -> {}  {}{}{}",
            trip.row,
            trip.start_time.format(TIMESTAMP_FORMAT),
            end,
            trip.trip_duration,
            trip.start_station.as_deref().unwrap_or("-"),
            trip.end_station.as_deref().unwrap_or("-"),
            trip.user_type.as_deref().unwrap_or("-"),
            trip.gender
                .as_deref()
                .map(|g| format!("  {g}"))
                .unwrap_or_default(),
            trip.birth_year
                .map(|y| format!("  {y}"))
                .unwrap_or_default(),
        )?;
    }
    Ok(())
}

pub fn write_catalog(w: &mut dyn Write, entries: &[CatalogEntry]) -> io::Result<()> {
    for entry in entries {
        let status = if entry.path.exists() { "found" } else { "missing" };
        writeln!(
            w,
            "{:<11} {:<22} {:<8} demographics: {}",
            entry.city.display_name(),
            entry.file_name,
            status,
            if entry.has_demographics { "yes" } else { "no" }
        )?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON envelopes
// ---------------------------------------------------------------------------

/// `{ "report": ..., "_meta": { ... } }` for `bikeshare stats --json`.
pub fn report_json(
    report: &StatisticsReport,
    timings: &TimingRecorder,
    trip_count: usize,
    source_rows: usize,
    elapsed_ms: u64,
) -> serde_json::Value {
    serde_json::json!({
        "report": report,
        "_meta": {
            "city": report.filter.city().slug(),
            "filter": report.filter.mode().to_string(),
            "trips": trip_count,
            "source_rows": source_rows,
            "elapsed_ms": elapsed_ms,
            "timings": timings.timings(),
        }
    })
}

/// Envelope used when the filter matched nothing.
pub fn no_data_json(filter: &Filter, source_rows: usize) -> serde_json::Value {
    serde_json::json!({
        "report": null,
        "_meta": {
            "city": filter.city().slug(),
            "filter": filter,
            "trips": 0,
            "source_rows": source_rows,
        }
    })
}

pub fn rows_json(slice: &RowSlice<'_>) -> serde_json::Value {
    serde_json::json!({
        "offset": slice.offset,
        "total": slice.total,
        "next_offset": slice.has_more().then(|| slice.next_offset()),
        "rows": slice.rows,
    })
}
