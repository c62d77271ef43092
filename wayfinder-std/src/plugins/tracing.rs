use tracing::{Instrument, debug, info_span};
use wayfinder_core::{Completion, Plugin, SharedPresentable, Target};

/// A plugin wrapper that instruments every phase with `tracing`.
///
/// `prepare` runs inside a span named after the plugin and logs the outcome
/// the inner plugin reported. The outcome is forwarded unchanged.
pub struct TracingPlugin<P> {
    inner: P,
    name: &'static str,
}

impl<P> TracingPlugin<P> {
    /// Create a new `TracingPlugin` wrapper around a plugin.
    pub const fn new(inner: P, name: &'static str) -> Self {
        Self { inner, name }
    }

    /// The name recorded on every event and span.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<P: Clone> Clone for TracingPlugin<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            name: self.name,
        }
    }
}

impl<T: Target, P: Plugin<T>> Plugin<T> for TracingPlugin<P> {
    fn should(&self, target: &T) -> bool {
        let accepted = self.inner.should(target);
        debug!(plugin = %self.name, accepted, "should");
        accepted
    }

    async fn prepare(&self, target: &T, completion: Completion) {
        let span = info_span!("plugin_prepare", plugin = %self.name);
        async move {
            let (inner, verdict) = Completion::channel();
            self.inner.prepare(target, inner).await;
            let ok = verdict.await;
            debug!(ok, "prepare reported");
            completion.complete(ok);
        }
        .instrument(span)
        .await
    }

    fn will(&self, target: &T, presentable: &SharedPresentable) {
        debug!(plugin = %self.name, "will open");
        self.inner.will(target, presentable);
    }

    fn did(&self, target: &T, presentable: &SharedPresentable) {
        debug!(plugin = %self.name, "did open");
        self.inner.did(target, presentable);
    }
}
