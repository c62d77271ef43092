//! Testing utilities for Wayfinder.
//!
//! This module provides plugins and presentables that record what happens to
//! them, so the open lifecycle can be asserted on.
//!
//! # Features
//!
//! - [`PhaseLog`]: A shared, ordered log of lifecycle events
//! - [`RecordingPlugin`]: A plugin that logs every phase and can be told to decline or reject
//! - [`RecordingPresentable`]: A presentable that counts opens and closes

use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};
use wayfinder_core::{Completion, Plugin, Presentable, SharedPresentable, Target};

// ============================================================================
// Phase Log
// ============================================================================

/// An ordered log shared between recorders.
///
/// Entries are written as `phase:name`, for example `prepare:auth`. A
/// presentable writes `open` and `close`.
#[derive(Clone, Default)]
pub struct PhaseLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl PhaseLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.into());
    }

    /// Every entry, in order.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Entries of a single phase, in order.
    pub fn phase(&self, phase: &str) -> Vec<String> {
        let prefix = format!("{phase}:");
        self.entries()
            .into_iter()
            .filter(|entry| entry.starts_with(&prefix))
            .collect()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

// ============================================================================
// Recording Plugin
// ============================================================================

/// A plugin that logs each phase it takes part in.
///
/// # Example
///
/// ```rust,ignore
/// let log = PhaseLog::new();
/// let provider = Provider::builder()
///     .plugin(RecordingPlugin::new("auth", &log).rejecting())
///     .plugin(RecordingPlugin::new("stats", &log))
///     .build();
///
/// provider.dispatch_url("app://profile").await.unwrap_err();
/// assert_eq!(log.phase("prepare").len(), 2);
/// ```
#[derive(Clone)]
pub struct RecordingPlugin {
    name: &'static str,
    log: PhaseLog,
    accept: bool,
    succeed: bool,
    report_twice: bool,
    spawn_report: bool,
    delay: Option<Duration>,
}

impl RecordingPlugin {
    /// Create a plugin that accepts and prepares successfully.
    pub fn new(name: &'static str, log: &PhaseLog) -> Self {
        Self {
            name,
            log: log.clone(),
            accept: true,
            succeed: true,
            report_twice: false,
            spawn_report: false,
            delay: None,
        }
    }

    /// Decline every target in `should`.
    pub fn declining(mut self) -> Self {
        self.accept = false;
        self
    }

    /// Report failure from `prepare`.
    pub fn rejecting(mut self) -> Self {
        self.succeed = false;
        self
    }

    /// Report the outcome, then the opposite outcome.
    pub fn reporting_twice(mut self) -> Self {
        self.report_twice = true;
        self
    }

    /// Wait before reporting from `prepare`.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Return from `prepare` at once and report from a spawned task.
    pub fn spawned(mut self) -> Self {
        self.spawn_report = true;
        self
    }

    /// The name used in log entries.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn report(&self, completion: &Completion) {
        self.log.record(format!("reported:{}", self.name));
        completion.complete(self.succeed);
        if self.report_twice {
            completion.complete(!self.succeed);
        }
    }
}

impl<T: Target> Plugin<T> for RecordingPlugin {
    fn should(&self, _target: &T) -> bool {
        self.log.record(format!("should:{}", self.name));
        self.accept
    }

    async fn prepare(&self, _target: &T, completion: Completion) {
        self.log.record(format!("prepare:{}", self.name));
        if self.spawn_report {
            let plugin = self.clone();
            tokio::spawn(async move {
                if let Some(delay) = plugin.delay {
                    tokio::time::sleep(delay).await;
                }
                plugin.report(&completion);
            });
            return;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.report(&completion);
    }

    fn will(&self, _target: &T, _presentable: &SharedPresentable) {
        self.log.record(format!("will:{}", self.name));
    }

    fn did(&self, _target: &T, _presentable: &SharedPresentable) {
        self.log.record(format!("did:{}", self.name));
    }
}

// ============================================================================
// Recording Presentable
// ============================================================================

/// A presentable that counts how often it is opened and closed.
///
/// Clones share their counters.
#[derive(Clone, Default)]
pub struct RecordingPresentable {
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
    log: Option<PhaseLog>,
}

impl RecordingPresentable {
    /// Create a presentable that opens successfully.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a presentable that also writes `open` and `close` to `log`.
    pub fn with_log(log: &PhaseLog) -> Self {
        Self {
            log: Some(log.clone()),
            ..Self::default()
        }
    }

    /// Report failure from `open` and `close`.
    pub fn failing(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }

    /// Number of `open` calls.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Number of `close` calls.
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Presentable for RecordingPresentable {
    async fn open(&self) -> bool {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if let Some(log) = &self.log {
            log.record("open");
        }
        !self.fail.load(Ordering::SeqCst)
    }

    async fn close(&self) -> bool {
        self.closed.fetch_add(1, Ordering::SeqCst);
        if let Some(log) = &self.log {
            log.record("close");
        }
        !self.fail.load(Ordering::SeqCst)
    }
}
