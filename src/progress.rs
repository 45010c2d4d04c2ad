//! Statement progress reporting.
//!
//! A run reports progress in one of three ways: not at all, as plain
//! `Processing statement i/N` lines on stderr, or as an `indicatif` bar.
//! Plain lines are the default for interactive runs since the bar draws
//! nothing when stderr is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};

/// Statements between progress updates
pub const PROGRESS_INTERVAL: u64 = 100;

/// How progress is shown during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// Nothing is printed
    #[default]
    Hidden,
    /// One stderr line per interval
    Lines,
    /// An indicatif bar
    Bar,
}

/// Tracks how many statements have been rewritten
pub struct StatementProgress {
    bar: ProgressBar,
    mode: ProgressMode,
    total: u64,
    interval: u64,
}

impl StatementProgress {
    /// Create a reporter for `total` statements
    pub fn new(total: u64, mode: ProgressMode) -> Self {
        let bar = match mode {
            ProgressMode::Bar => {
                let pb = ProgressBar::new(total);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                        .unwrap()
                        .progress_chars("=> "),
                );
                pb
            }
            // Hidden bars still track position
            ProgressMode::Hidden | ProgressMode::Lines => {
                let pb = ProgressBar::hidden();
                pb.set_length(total);
                pb
            }
        };

        Self {
            bar,
            mode,
            total,
            interval: PROGRESS_INTERVAL,
        }
    }

    /// Reporter that never prints
    pub fn hidden(total: u64) -> Self {
        Self::new(total, ProgressMode::Hidden)
    }

    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Announce the number of statements found, before any is processed
    pub fn start(&self) {
        let line = format!("Found {} INSERT statements", self.total);
        match self.mode {
            ProgressMode::Hidden => {}
            ProgressMode::Bar if !self.bar.is_hidden() => self.bar.println(line),
            ProgressMode::Lines | ProgressMode::Bar => eprintln!("{}", line),
        }
    }

    /// Record that statement `index` (0-based) is about to be processed.
    /// Output only happens every `interval` statements.
    pub fn observe(&self, index: u64) {
        if index % self.interval != 0 {
            return;
        }
        let message = status_line(index, self.total);
        self.bar.set_position(index);
        match self.mode {
            ProgressMode::Lines => eprintln!("{}", message),
            ProgressMode::Bar => self.bar.set_message(message),
            ProgressMode::Hidden => {}
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self, rewritten: u64) {
        self.bar.set_position(self.total);
        if self.mode == ProgressMode::Bar {
            self.bar
                .finish_with_message(format!("{} statements rewritten", rewritten));
        }
    }
}

fn status_line(index: u64, total: u64) -> String {
    format!("Processing statement {}/{}", index + 1, total)
}
