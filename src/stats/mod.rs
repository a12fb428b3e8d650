//! Descriptive statistics over a filtered trip set.
//!
//! # Module structure
//!
//! - [`tally`]: insertion-ordered frequency counting
//! - [`types`]: result structs and `StatisticsError`
//! - [`engine`]: time, station and user statistics
//! - [`observer`]: timing hook (`StatsObserver`) kept out of the results

pub mod engine;
pub mod observer;
pub mod tally;
pub mod types;

pub use engine::{compute_report, station_stats, time_stats, user_stats};
pub use observer::{NoopObserver, StatTiming, StatsObserver, TimingRecorder, TracingObserver};
pub use types::{
    BirthYearStats, Count, StatCategory, StationStats, StatisticsError, StatisticsReport,
    TimeStats, UserStats,
};
