//! Timing instrumentation for statistic computations.
//!
//! Elapsed time is reported through a [`StatsObserver`] instead of being
//! stored in the results.

use std::time::{Duration, Instant};

use serde::Serialize;

use super::types::StatCategory;

pub trait StatsObserver {
    /// Called once per computed statistic.
    fn record(&mut self, category: StatCategory, stat: &'static str, elapsed: Duration);
}

/// Discards every timing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StatsObserver for NoopObserver {
    fn record(&mut self, _category: StatCategory, _stat: &'static str, _elapsed: Duration) {}
}

/// Emits each timing as a `debug!` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StatsObserver for TracingObserver {
    fn record(&mut self, category: StatCategory, stat: &'static str, elapsed: Duration) {
        tracing::debug!(
            category = %category,
            stat,
            elapsed_us = elapsed.as_micros() as u64,
            "statistic computed"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatTiming {
    pub category: StatCategory,
    pub stat: &'static str,
    pub elapsed_ms: f64,
}

/// Keeps every timing for later display (the CLI prints them after each
/// category), and forwards to tracing.
#[derive(Debug, Default, Clone)]
pub struct TimingRecorder {
    timings: Vec<StatTiming>,
}

impl TimingRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timings(&self) -> &[StatTiming] {
        &self.timings
    }

    /// Summed time for one category, in milliseconds.
    pub fn category_ms(&self, category: StatCategory) -> f64 {
        self.timings
            .iter()
            .filter(|t| t.category == category)
            .map(|t| t.elapsed_ms)
            .sum()
    }
}

impl StatsObserver for TimingRecorder {
    fn record(&mut self, category: StatCategory, stat: &'static str, elapsed: Duration) {
        TracingObserver.record(category, stat, elapsed);
        self.timings.push(StatTiming {
            category,
            stat,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        });
    }
}

/// Run `f` and report its wall time to `observer`.
pub(crate) fn timed<T>(
    observer: &mut dyn StatsObserver,
    category: StatCategory,
    stat: &'static str,
    f: impl FnOnce() -> T,
) -> T {
    let started = Instant::now();
    let out = f();
    observer.record(category, stat, started.elapsed());
    out
}
