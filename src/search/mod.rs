//! Brute-force search for programs that print a target string.
//!
//! A template marks free cells with `.`. Every placement of the required
//! characters into those cells is combined with every word over the available
//! alphabet in the remaining free cells, and each candidate is run against the
//! target with a small tick budget first and a large one after.

pub mod candidates;
pub mod workers;

pub use workers::{ThreadMode, WorkerPool, THREADS_ENV};

use crate::language::grid::{FILLER, IGNORED};
use crate::runtime::interpreter::Interpreter;
use crate::runtime::io::NullSink;
use candidates::{binomial, permutations, subsets, Words};
use log::{debug, info};
use miette::Diagnostic;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Marks the cells reserved for required characters in progress output.
const RESERVED: char = 'X';

#[derive(Debug, Error, Diagnostic)]
pub enum SearchError {
    #[error("Template has {empty} free cells but {required} characters are required")]
    #[diagnostic(
        code(search::not_enough_slots),
        help("add `.` cells to the template or drop required characters")
    )]
    NotEnoughSlots { empty: usize, required: usize },
    #[error("Failed to start worker threads: {0}")]
    #[diagnostic(code(search::thread_pool))]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub template: String,
    pub required: Vec<char>,
    pub available: Vec<char>,
    pub target: String,
    /// Ticks run once on the bare template before any candidate is forked.
    pub prefix_ticks: u64,
    /// Budget for the first, cheap check of each candidate.
    pub probe_ticks: u64,
    pub max_ticks: u64,
    pub threads: ThreadMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            template: String::new(),
            required: Vec::new(),
            available: Vec::new(),
            target: String::new(),
            prefix_ticks: 3,
            probe_ticks: 15,
            max_ticks: 10_000,
            threads: ThreadMode::Auto,
        }
    }
}

impl SearchConfig {
    pub fn new(template: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn with_required(mut self, required: &str) -> Self {
        self.required = required.chars().collect();
        self
    }

    pub fn with_available(mut self, available: &str) -> Self {
        self.available = available.chars().collect();
        self
    }

    pub fn with_threads(mut self, threads: ThreadMode) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_prefix_ticks(mut self, ticks: u64) -> Self {
        self.prefix_ticks = ticks;
        self
    }

    pub fn with_probe_ticks(mut self, ticks: u64) -> Self {
        self.probe_ticks = ticks;
        self
    }

    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = ticks;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchReport {
    /// Solving sources, sorted and without duplicates.
    pub solutions: Vec<String>,
    pub subsets: usize,
    pub candidates: u64,
    pub skipped: u64,
    pub elapsed: Duration,
}

type BaseInterpreter = Interpreter<&'static [u8], NullSink>;

pub fn search(config: &SearchConfig) -> Result<SearchReport, SearchError> {
    let template: Vec<char> = config
        .template
        .chars()
        .filter(|ch| !IGNORED.contains(ch))
        .collect();
    let empty: Vec<usize> = template
        .iter()
        .enumerate()
        .filter(|&(_, &ch)| ch == FILLER)
        .map(|(index, _)| index)
        .collect();
    let required = config.required.len();
    if empty.len() < required {
        return Err(SearchError::NotEnoughSlots {
            empty: empty.len(),
            required,
        });
    }

    let pool = WorkerPool::new(config.threads)?;
    let orderings = permutations(&config.required);
    let total_subsets = binomial(empty.len(), required);
    info!(
        "searching {} templates x {} orderings x {} words on {} threads",
        total_subsets,
        orderings.len(),
        Words::total(&config.available, empty.len() - required),
        pool.threads()
    );

    let source: String = template.iter().collect();
    let mut base: BaseInterpreter = Interpreter::new(&source, &b""[..], NullSink);
    base.set_target(Some(&config.target));
    base.set_max_ticks(Some(config.prefix_ticks));
    base.run();

    let (sender, receiver) = crossbeam::channel::unbounded::<String>();
    let candidates = AtomicU64::new(0);
    let skipped = AtomicU64::new(0);
    let started = Instant::now();
    let mut checked = 0;

    for reserved in subsets(&empty, required) {
        log_progress(&template, &empty, &reserved, checked, total_subsets, started);
        checked += 1;

        let free: Vec<usize> = empty
            .iter()
            .copied()
            .filter(|index| !reserved.contains(index))
            .collect();

        pool.run(orderings.len(), |item| {
            let mut candidate = template.clone();
            for (&slot, &ch) in reserved.iter().zip(&orderings[item]) {
                candidate[slot] = ch;
            }
            for word in Words::new(&config.available, free.len()) {
                if repeats_required(&candidate, &reserved, &free, &word) {
                    skipped.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
                for (&slot, &ch) in free.iter().zip(&word) {
                    candidate[slot] = ch;
                }
                candidates.fetch_add(1, Ordering::Relaxed);
                if evaluate(&base, &candidate, config) {
                    let solution: String = candidate.iter().collect();
                    debug!("solution: {solution}");
                    let _ = sender.send(solution);
                }
            }
        });
    }
    drop(sender);

    let mut solutions: Vec<String> = receiver.iter().collect();
    solutions.sort();
    solutions.dedup();
    let report = SearchReport {
        solutions,
        subsets: checked,
        candidates: candidates.into_inner(),
        skipped: skipped.into_inner(),
        elapsed: started.elapsed(),
    };
    info!(
        "checked {} candidates ({} skipped) in {}: {} solutions",
        report.candidates,
        report.skipped,
        format_duration(report.elapsed),
        report.solutions.len()
    );
    Ok(report)
}

/// True when a free cell would receive a character already placed in a
/// reserved cell before it; that program is reached through another ordering.
fn repeats_required(candidate: &[char], reserved: &[usize], free: &[usize], word: &[char]) -> bool {
    free.iter().zip(word).any(|(&slot, &ch)| {
        reserved
            .iter()
            .take_while(|&&index| index <= slot)
            .any(|&index| candidate[index] == ch)
    })
}

/// Probes a candidate with a small budget and only then runs it in full.
fn evaluate(base: &BaseInterpreter, candidate: &[char], config: &SearchConfig) -> bool {
    let mut run = base.fork(candidate);
    run.set_max_ticks(Some(config.probe_ticks));
    run.run();
    if !run.success() || run.output_length() < 1 {
        return false;
    }
    run.set_max_ticks(Some(config.max_ticks));
    run.run();
    run.success() && !run.timed_out()
}

fn log_progress(
    template: &[char],
    empty: &[usize],
    reserved: &[usize],
    checked: usize,
    total: u128,
    started: Instant,
) {
    let layout: String = template
        .iter()
        .enumerate()
        .map(|(index, &ch)| {
            if reserved.contains(&index) {
                RESERVED
            } else if empty.contains(&index) {
                FILLER
            } else {
                ch
            }
        })
        .collect();
    if checked == 0 || total == 0 {
        info!("checking templates: {layout}");
        return;
    }
    let elapsed = started.elapsed();
    let progress = checked as f64 / total as f64;
    let estimated =
        Duration::try_from_secs_f64(elapsed.as_secs_f64() / progress).unwrap_or(Duration::MAX);
    info!(
        "checking templates: {layout} ... {} / {} ({} remaining)",
        format_duration(elapsed),
        format_duration(estimated),
        format_duration(estimated.saturating_sub(elapsed))
    );
}

/// `d.hh:mm:ss`
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!(
        "{}.{:02}:{:02}:{:02}",
        secs / 86_400,
        secs / 3_600 % 24,
        secs / 60 % 60,
        secs % 60
    )
}
