//! Timeout plugin for time-limited preparation.

use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;
use wayfinder_core::{Completion, Plugin, SharedPresentable, Target};

/// A plugin that wraps another plugin's `prepare` with a deadline.
///
/// If the inner plugin has not reported by the deadline, failure is reported
/// on its behalf. Needs a tokio runtime with the time driver enabled.
pub struct TimeoutPlugin<P> {
    inner: P,
    duration: Duration,
}

impl<P> TimeoutPlugin<P> {
    /// Create a new timeout plugin.
    pub fn new(inner: P, duration: Duration) -> Self {
        Self { inner, duration }
    }
}

impl<T: Target, P: Plugin<T>> Plugin<T> for TimeoutPlugin<P> {
    fn should(&self, target: &T) -> bool {
        self.inner.should(target)
    }

    async fn prepare(&self, target: &T, completion: Completion) {
        let (inner, verdict) = Completion::channel();
        let prepared = async {
            self.inner.prepare(target, inner).await;
            verdict.await
        };
        let ok = match timeout(self.duration, prepared).await {
            Ok(ok) => ok,
            Err(_) => {
                warn!(timeout = ?self.duration, "prepare timed out");
                false
            }
        };
        completion.complete(ok);
    }

    fn will(&self, target: &T, presentable: &SharedPresentable) {
        self.inner.will(target, presentable);
    }

    fn did(&self, target: &T, presentable: &SharedPresentable) {
        self.inner.did(target, presentable);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{PhaseLog, RecordingPlugin};
    use wayfinder_core::Task;

    struct Job;

    impl Target for Job {
        fn task(&self) -> Task {
            Task::perform(|| async { true })
        }
    }

    #[tokio::test]
    async fn reports_inner_outcome_in_time() {
        let log = PhaseLog::new();
        let plugin = TimeoutPlugin::new(
            RecordingPlugin::new("quick", &log).delayed(Duration::from_millis(1)),
            Duration::from_secs(5),
        );

        let (completion, verdict) = Completion::channel();
        plugin.prepare(&Job, completion).await;
        assert!(verdict.await);
    }

    #[tokio::test]
    async fn expiry_reports_failure() {
        let log = PhaseLog::new();
        let plugin = TimeoutPlugin::new(
            RecordingPlugin::new("stuck", &log).delayed(Duration::from_secs(60)),
            Duration::from_millis(10),
        );

        let (completion, verdict) = Completion::channel();
        plugin.prepare(&Job, completion).await;
        assert!(!verdict.await);
        assert!(log.phase("reported").is_empty());
    }

    #[tokio::test]
    async fn waits_for_a_report_made_after_prepare_returns() {
        let log = PhaseLog::new();
        let plugin = TimeoutPlugin::new(
            RecordingPlugin::new("later", &log)
                .spawned()
                .delayed(Duration::from_millis(5)),
            Duration::from_secs(5),
        );

        let (completion, verdict) = Completion::channel();
        plugin.prepare(&Job, completion).await;
        assert!(verdict.await);
    }
}
