//! Run-scoped logging context.
//!
//! A [`RunLog`] is created once per run and handed to each pipeline
//! stage. It carries the instant the run started and the most verbose
//! level it lets through, and forwards events to `tracing` with an
//! `elapsed` field. Nothing here is global; two runs in one process (as
//! in tests) keep independent clocks and levels.

use std::fmt::Display;
use std::time::{Duration, Instant};

use tracing::Level;

#[derive(Clone, Debug)]
pub struct RunLog {
    started: Instant,
    max_level: Level,
}

impl RunLog {
    /// Starts the clock; events more verbose than `max_level` are dropped.
    pub fn new(max_level: Level) -> Self {
        Self {
            started: Instant::now(),
            max_level,
        }
    }

    pub fn max_level(&self) -> Level {
        self.max_level
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// `tracing` orders levels by verbosity: ERROR < WARN < INFO < DEBUG.
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.max_level
    }

    pub fn error(&self, message: impl Display) {
        self.emit(Level::ERROR, "", message);
    }

    pub fn warn(&self, message: impl Display) {
        self.emit(Level::WARN, "", message);
    }

    pub fn info(&self, message: impl Display) {
        self.emit(Level::INFO, "", message);
    }

    pub fn debug(&self, message: impl Display) {
        self.emit(Level::DEBUG, "", message);
    }

    pub fn success(&self, message: impl Display) {
        self.emit(Level::INFO, "✓ ", message);
    }

    pub fn failure(&self, message: impl Display) {
        self.emit(Level::ERROR, "✗ ", message);
    }

    pub fn section(&self, title: impl Display) {
        self.emit(Level::INFO, "", format_args!("=== {} ===", title));
    }

    pub fn subsection(&self, title: impl Display) {
        self.emit(Level::INFO, "", format_args!("--- {} ---", title));
    }

    fn emit(&self, level: Level, marker: &str, message: impl Display) {
        if !self.enabled(level) {
            return;
        }
        let elapsed = format!("{:.2}s", self.elapsed().as_secs_f64());
        match level {
            Level::ERROR => tracing::error!(elapsed = %elapsed, "{}{}", marker, message),
            Level::WARN => tracing::warn!(elapsed = %elapsed, "{}{}", marker, message),
            Level::INFO => tracing::info!(elapsed = %elapsed, "{}{}", marker, message),
            Level::DEBUG => tracing::debug!(elapsed = %elapsed, "{}{}", marker, message),
            _ => tracing::trace!(elapsed = %elapsed, "{}{}", marker, message),
        }
    }
}

impl Default for RunLog {
    fn default() -> Self {
        Self::new(Level::INFO)
    }
}
