//! Interactive exploration session.
//!
//! The session owns every bit of re-prompting: it asks through a
//! [`Prompter`], runs the raw answer through the matching normalizer and asks
//! again on rejection. Loading, statistics and paging are delegated to the
//! pure core.

use std::collections::VecDeque;
use std::io::Write;

use anyhow::{Result, bail};
use console::{Term, style};
use dialoguer::{Input, theme::ColorfulTheme};
use tracing::{debug, warn};

use crate::catalog::DatasetCatalog;
use crate::filter::{
    ValidationError, build_filter, normalize_choice, normalize_city, normalize_day,
    normalize_mode, normalize_month,
};
use crate::paginate::{PAGE_SIZE, PaginationError, page};
use crate::render;
use crate::stats::{TimingRecorder, compute_report};
use crate::trips::{self, FilteredTripSet};

pub const CITY_PROMPT: &str = "Would you like to see data for Chicago, New York or Washington?";
pub const MODE_PROMPT: &str =
    "Would you like to filter the data by month, day, both or not at all? Type \"none\" for no filter";
pub const MONTH_PROMPT: &str = "Which month? January, February, March, April, May or June";
pub const DAY_PROMPT: &str =
    "Which day? Monday, Tuesday, Wednesday, Thursday, Friday, Saturday or Sunday";
pub const RAW_PROMPT: &str = "Would you like to see raw data? Enter yes or no";
pub const MORE_RAW_PROMPT: &str = "Would you like to see the next 5 rows of raw data? Enter yes or no";
pub const RESTART_PROMPT: &str = "Would you like to restart? Enter yes or no";

/// Source of user answers.
pub trait Prompter {
    /// Ask a free-text question.
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Tell the user their last answer was rejected (or something failed).
    fn warn(&mut self, message: &str) -> Result<()>;
}

/// Terminal prompter backed by `dialoguer`.
pub struct TerminalPrompter {
    term: Term,
    theme: ColorfulTheme,
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str) -> Result<String> {
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text_on(&self.term)?;
        Ok(answer)
    }

    fn warn(&mut self, message: &str) -> Result<()> {
        self.term
            .write_line(&format!("{} {}", style("Oops!").red().bold(), message))?;
        Ok(())
    }
}

/// Replays canned answers; used by tests and scripted runs.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    prompts: Vec<String>,
    warnings: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("no scripted answer left for prompt: {prompt}"),
        }
    }

    fn warn(&mut self, message: &str) -> Result<()> {
        self.warnings.push(message.to_string());
        Ok(())
    }
}

/// One interactive run: query, report, optional paging, restart.
pub struct Session<'a, P: Prompter> {
    catalog: &'a DatasetCatalog,
    prompter: P,
    out: &'a mut dyn Write,
}

impl<'a, P: Prompter> Session<'a, P> {
    pub fn new(catalog: &'a DatasetCatalog, prompter: P, out: &'a mut dyn Write) -> Self {
        Self {
            catalog,
            prompter,
            out,
        }
    }

    pub fn into_prompter(self) -> P {
        self.prompter
    }

    /// Run queries until the user declines to restart.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.run_query()?;
            if !self.ask(RESTART_PROMPT, normalize_choice)? {
                return Ok(());
            }
        }
    }

    /// Ask until `parse` accepts the answer.
    fn ask<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, ValidationError>,
    ) -> Result<T> {
        Ok(self.ask_raw(prompt, parse)?.1)
    }

    /// Like [`Session::ask`], also returning the accepted raw answer.
    fn ask_raw<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, ValidationError>,
    ) -> Result<(String, T)> {
        loop {
            let raw = self.prompter.input(prompt)?;
            match parse(&raw) {
                Ok(value) => return Ok((raw, value)),
                Err(err) => {
                    debug!(error = %err, "rejected answer");
                    self.prompter.warn(&err.to_string())?;
                }
            }
        }
    }

    /// A single query: filter prompts, load, statistics, raw paging.
    pub fn run_query(&mut self) -> Result<()> {
        let city = self.ask(CITY_PROMPT, normalize_city)?;
        let mode = self.ask(MODE_PROMPT, normalize_mode)?;
        let month_raw = if mode.uses_month() {
            Some(self.ask_raw(MONTH_PROMPT, normalize_month)?.0)
        } else {
            None
        };
        let day_raw = if mode.uses_day() {
            Some(self.ask_raw(DAY_PROMPT, normalize_day)?.0)
        } else {
            None
        };
        let filter = build_filter(city, mode, month_raw.as_deref(), day_raw.as_deref())?;
        render::write_filter_banner(self.out, &filter)?;

        let set = match trips::load(self.catalog, &filter) {
            Ok(set) => set,
            Err(err) => {
                warn!(error = %err, "load failed");
                self.prompter.warn(&format!("Could not load trip data: {err}"))?;
                return Ok(());
            }
        };

        if set.is_empty() {
            render::write_no_data(self.out, &filter)?;
            return Ok(());
        }

        let mut timings = TimingRecorder::new();
        match compute_report(&set, &mut timings) {
            Ok(report) => render::write_report(self.out, &report, Some(&timings))?,
            Err(err) => {
                debug!(error = %err, "statistics unavailable");
                render::write_no_data(self.out, &filter)?;
                return Ok(());
            }
        }

        self.page_raw_rows(&set)
    }

    /// Show `PAGE_SIZE` rows per "yes" until the user says no or rows run out.
    fn page_raw_rows(&mut self, set: &FilteredTripSet) -> Result<()> {
        let mut offset = 0;
        let mut prompt = RAW_PROMPT;
        while self.ask(prompt, normalize_choice)? {
            match page(set, offset) {
                Ok(slice) => {
                    render::write_rows(self.out, &slice)?;
                    offset = slice.next_offset();
                }
                Err(PaginationError::ExhaustedInput { .. }) => {
                    writeln!(self.out, "\nNo more data to show")?;
                    break;
                }
            }
            prompt = MORE_RAW_PROMPT;
        }
        debug!(offset, page_size = PAGE_SIZE, "raw paging finished");
        Ok(())
    }
}
