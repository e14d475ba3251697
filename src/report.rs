//! Progress and action reporting.
//!
//! The organizer never prints or logs directly. It hands every event to a
//! [`Reporter`], so the binary can draw a progress bar while tests and
//! library callers can record or drop the events.

use crate::entry::SkipReason;
use crate::output::OutputFormatter;
use indicatif::ProgressBar;
use log::{debug, info};

/// Receives events from a run of the organizer.
pub trait Reporter {
    /// A file was moved into `category`.
    fn report_moved(&mut self, name: &str, category: &str);

    /// `current` of `total` entries have been processed.
    fn report_progress(&mut self, current: usize, total: usize);

    /// An entry was left in place.
    fn report_skipped(&mut self, _name: &str, _reason: SkipReason) {}

    /// The run is over, successfully or not.
    fn finish(&mut self) {}
}

/// Reporter that only emits log records.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report_moved(&mut self, name: &str, category: &str) {
        info!("{} moved to the {} folder.", name, category);
    }

    fn report_progress(&mut self, current: usize, total: usize) {
        debug!("Processed {}/{} entries", current, total);
    }

    fn report_skipped(&mut self, name: &str, reason: SkipReason) {
        debug!("Skipping {} ({})", name, reason);
    }
}

/// Reporter that drives a progress bar and logs through it.
///
/// The bar is created lazily on the first progress event, once the entry
/// count is known.
#[derive(Default)]
pub struct ConsoleReporter {
    bar: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn bar(&mut self, total: usize) -> &ProgressBar {
        self.bar
            .get_or_insert_with(|| OutputFormatter::create_progress_bar(total as u64))
    }

    /// Runs `f` with the bar hidden so log lines don't tear it.
    fn suspended<F: FnOnce()>(&self, f: F) {
        match &self.bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report_moved(&mut self, name: &str, category: &str) {
        self.suspended(|| info!("{} moved to the {} folder.", name, category));
    }

    fn report_progress(&mut self, current: usize, total: usize) {
        self.bar(total).set_position(current as u64);
    }

    fn report_skipped(&mut self, name: &str, reason: SkipReason) {
        self.suspended(|| debug!("Skipping {} ({})", name, reason));
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
