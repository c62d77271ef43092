//! # Plugin Chain
//!
//! Runs the open lifecycle of a target across an ordered list of plugins:
//!
//! 1. **should**: sequential; the target proceeds if *any* plugin accepts it
//! 2. **prepare**: concurrent fan-out; proceeds only if *all* plugins succeed,
//!    and only once every plugin has reported
//! 3. **will**: sequential notification, `Present` tasks only
//! 4. the task itself: open the presentable, or run the action
//! 5. **did**: sequential notification after the presentable opened
//!
//! An empty chain skips every phase and runs the task directly.

use futures::future::{Either, join_all, select};
use std::{pin::pin, sync::Arc};
use tracing::{debug, warn};
use wayfinder_core::{Completion, DynPlugin, OpenError, Plugin, Target, Task};

/// An ordered, fixed list of plugins.
pub struct PluginChain<T: Target> {
    plugins: Vec<Arc<dyn DynPlugin<T>>>,
}

impl<T: Target> Default for PluginChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Target> Clone for PluginChain<T> {
    fn clone(&self) -> Self {
        Self {
            plugins: self.plugins.clone(),
        }
    }
}

impl<T: Target> PluginChain<T> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Append a plugin. Order of insertion is the order of every sequential phase.
    pub fn with<P: Plugin<T>>(mut self, plugin: P) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Append an already shared plugin.
    pub fn with_shared(mut self, plugin: Arc<dyn DynPlugin<T>>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Number of plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether the chain has no plugins (the fast path).
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run the whole lifecycle.
    pub async fn run(&self, target: &T) -> Result<(), OpenError> {
        self.should(target)?;
        self.proceed(target).await
    }

    /// Ask every plugin, in order, whether the target may open.
    ///
    /// Succeeds if at least one plugin accepts, or if the chain is empty.
    pub fn should(&self, target: &T) -> Result<(), OpenError> {
        if self.is_empty() || self.plugins.iter().any(|p| p.should_dyn(target)) {
            Ok(())
        } else {
            warn!(plugins = self.len(), "every plugin declined the target");
            Err(OpenError::Vetoed)
        }
    }

    /// Run everything after `should`: prepare, then the task.
    pub async fn proceed(&self, target: &T) -> Result<(), OpenError> {
        if self.is_empty() {
            return execute(target.task(), target, &[]).await;
        }
        self.prepare(target).await?;
        execute(target.task(), target, &self.plugins).await
    }

    /// Fan `prepare` out to every plugin and wait for all of them to report.
    ///
    /// Returns as soon as every plugin has reported, even if some `prepare`
    /// futures have not finished yet.
    pub async fn prepare(&self, target: &T) -> Result<(), OpenError> {
        let (completions, verdicts): (Vec<_>, Vec<_>) =
            self.plugins.iter().map(|_| Completion::channel()).unzip();

        let calls = pin!(join_all(
            self.plugins
                .iter()
                .zip(completions)
                .map(|(plugin, completion)| plugin.prepare_dyn(target, completion)),
        ));
        let verdicts = pin!(join_all(verdicts));

        // The phase ends on the last report; calls still running after that
        // are dropped.
        let verdicts = match select(calls, verdicts).await {
            Either::Left((_, verdicts)) => verdicts.await,
            Either::Right((verdicts, _)) => verdicts,
        };

        let rejected = verdicts.iter().filter(|ok| !**ok).count();
        if rejected == 0 {
            debug!(plugins = self.len(), "prepare succeeded");
            Ok(())
        } else {
            debug!(plugins = self.len(), rejected, "prepare rejected");
            Err(OpenError::PrepareRejected)
        }
    }
}

async fn execute<T: Target>(
    task: Task,
    target: &T,
    plugins: &[Arc<dyn DynPlugin<T>>],
) -> Result<(), OpenError> {
    match task {
        Task::Present(presentable) => {
            for plugin in plugins {
                plugin.will_dyn(target, &presentable);
            }
            if !presentable.open_dyn().await {
                return Err(OpenError::PresentableFailed);
            }
            for plugin in plugins {
                plugin.did_dyn(target, &presentable);
            }
            Ok(())
        }
        Task::Perform(action) => {
            if action.run().await {
                Ok(())
            } else {
                Err(OpenError::ActionFailed)
            }
        }
    }
}

impl<T: Target> FromIterator<Arc<dyn DynPlugin<T>>> for PluginChain<T> {
    fn from_iter<I: IntoIterator<Item = Arc<dyn DynPlugin<T>>>>(iter: I) -> Self {
        Self {
            plugins: iter.into_iter().collect(),
        }
    }
}

impl<T: Target> std::fmt::Debug for PluginChain<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginChain")
            .field("plugins", &self.plugins.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{PhaseLog, RecordingPlugin, RecordingPresentable};
    use std::time::Duration;

    struct Screen(RecordingPresentable);

    impl Target for Screen {
        fn task(&self) -> Task {
            Task::present(self.0.clone())
        }
    }

    struct Job(bool);

    impl Target for Job {
        fn task(&self) -> Task {
            let ok = self.0;
            Task::perform(move || async move { ok })
        }
    }

    #[tokio::test]
    async fn empty_chain_runs_task_directly() {
        let presentable = RecordingPresentable::new();
        let chain = PluginChain::<Screen>::new();
        assert!(chain.run(&Screen(presentable.clone())).await.is_ok());
        assert_eq!(presentable.opened(), 1);
    }

    #[tokio::test]
    async fn phases_run_in_order() {
        let log = PhaseLog::new();
        let presentable = RecordingPresentable::with_log(&log);
        let chain = PluginChain::new()
            .with(RecordingPlugin::new("a", &log))
            .with(RecordingPlugin::new("b", &log));

        chain.run(&Screen(presentable)).await.expect("opens");

        let entries = log.entries();
        let should: Vec<_> = entries.iter().filter(|e| e.starts_with("should")).collect();
        assert_eq!(should, ["should:a"]);
        assert_eq!(
            log.phase("will"),
            vec!["will:a".to_string(), "will:b".to_string()]
        );
        assert_eq!(
            log.phase("did"),
            vec!["did:a".to_string(), "did:b".to_string()]
        );

        let position = |entry: &str| entries.iter().position(|e| e == entry).expect(entry);
        assert!(position("will:b") < position("open"));
        assert!(position("open") < position("did:a"));
        assert!(position("prepare:a") < position("will:a"));
        assert!(position("prepare:b") < position("will:a"));
    }

    #[test]
    fn should_passes_when_any_plugin_accepts() {
        let log = PhaseLog::new();
        let chain = PluginChain::<Job>::new()
            .with(RecordingPlugin::new("no", &log).declining())
            .with(RecordingPlugin::new("yes", &log));

        assert!(chain.should(&Job(true)).is_ok());
    }

    #[tokio::test]
    async fn should_vetoes_when_every_plugin_declines() {
        let log = PhaseLog::new();
        let presentable = RecordingPresentable::new();
        let chain = PluginChain::new()
            .with(RecordingPlugin::new("a", &log).declining())
            .with(RecordingPlugin::new("b", &log).declining());

        let result = chain.run(&Screen(presentable.clone())).await;
        assert_eq!(result, Err(OpenError::Vetoed));
        assert!(log.phase("prepare").is_empty());
        assert!(log.phase("will").is_empty());
        assert!(log.phase("did").is_empty());
        assert_eq!(presentable.opened(), 0);
    }

    #[tokio::test]
    async fn one_rejection_fails_prepare_regardless_of_timing() {
        let log = PhaseLog::new();
        let presentable = RecordingPresentable::new();
        let chain = PluginChain::new()
            .with(RecordingPlugin::new("slow", &log).delayed(Duration::from_millis(20)))
            .with(
                RecordingPlugin::new("reject", &log)
                    .rejecting()
                    .delayed(Duration::from_millis(5)),
            )
            .with(RecordingPlugin::new("fast", &log));

        let result = chain.run(&Screen(presentable.clone())).await;
        assert_eq!(result, Err(OpenError::PrepareRejected));
        assert_eq!(log.phase("prepare").len(), 3);
        assert!(log.phase("will").is_empty());
        assert!(log.phase("did").is_empty());
        assert_eq!(presentable.opened(), 0);
    }

    #[tokio::test]
    async fn prepare_waits_for_every_plugin() {
        let log = PhaseLog::new();
        let chain = PluginChain::<Job>::new()
            .with(RecordingPlugin::new("reject", &log).rejecting())
            .with(RecordingPlugin::new("slow", &log).delayed(Duration::from_millis(20)));

        let result = chain.prepare(&Job(true)).await;
        assert_eq!(result, Err(OpenError::PrepareRejected));
        assert_eq!(log.phase("reported").len(), 2);
    }

    struct Lingering;

    impl Plugin<Job> for Lingering {
        async fn prepare(&self, _: &Job, completion: Completion) {
            completion.succeed();
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
    }

    #[tokio::test]
    async fn prepare_ends_on_the_last_report() {
        let log = PhaseLog::new();
        let chain = PluginChain::new()
            .with(Lingering)
            .with(RecordingPlugin::new("ok", &log).delayed(Duration::from_millis(5)));

        let result = tokio::time::timeout(Duration::from_secs(1), chain.run(&Job(true)))
            .await
            .expect("open finished while a prepare call was still running");
        assert!(result.is_ok());
        assert_eq!(log.phase("reported"), vec!["reported:ok".to_string()]);
    }

    #[tokio::test]
    async fn shared_plugins_join_the_chain() {
        let log = PhaseLog::new();
        let shared: Arc<dyn DynPlugin<Job>> = Arc::new(RecordingPlugin::new("shared", &log));
        let chain = PluginChain::new()
            .with_shared(Arc::clone(&shared))
            .with(shared);

        assert!(chain.run(&Job(true)).await.is_ok());
        assert_eq!(
            log.phase("prepare"),
            vec!["prepare:shared".to_string(), "prepare:shared".to_string()]
        );
    }

    #[tokio::test]
    async fn double_report_does_not_flip_the_outcome() {
        let log = PhaseLog::new();
        let presentable = RecordingPresentable::new();
        let chain = PluginChain::new()
            .with(RecordingPlugin::new("twice", &log).reporting_twice())
            .with(RecordingPlugin::new("ok", &log));

        assert!(chain.run(&Screen(presentable.clone())).await.is_ok());
        assert_eq!(presentable.opened(), 1);
        assert_eq!(log.phase("did").len(), 2);
    }

    #[tokio::test]
    async fn report_from_spawned_task_is_awaited() {
        let log = PhaseLog::new();
        let presentable = RecordingPresentable::new();
        let chain = PluginChain::new().with(
            RecordingPlugin::new("later", &log)
                .spawned()
                .delayed(Duration::from_millis(10)),
        );

        assert!(chain.run(&Screen(presentable.clone())).await.is_ok());
        assert_eq!(log.phase("reported"), vec!["reported:later".to_string()]);
        assert_eq!(presentable.opened(), 1);
    }

    #[tokio::test]
    async fn perform_task_skips_will_and_did() {
        let log = PhaseLog::new();
        let chain = PluginChain::new().with(RecordingPlugin::new("a", &log));

        assert!(chain.run(&Job(true)).await.is_ok());
        assert_eq!(chain.run(&Job(false)).await, Err(OpenError::ActionFailed));
        assert!(log.phase("will").is_empty());
        assert!(log.phase("did").is_empty());
        assert_eq!(log.phase("prepare").len(), 2);
    }

    #[tokio::test]
    async fn failing_presentable_skips_did() {
        let log = PhaseLog::new();
        let presentable = RecordingPresentable::new().failing();
        let chain = PluginChain::new().with(RecordingPlugin::new("a", &log));

        let result = chain.run(&Screen(presentable.clone())).await;
        assert_eq!(result, Err(OpenError::PresentableFailed));
        assert_eq!(log.phase("will").len(), 1);
        assert!(log.phase("did").is_empty());
        assert_eq!(presentable.opened(), 1);
    }
}
