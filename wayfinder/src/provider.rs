//! # Provider
//!
//! The entry point applications open URLs through.
//!
//! A [`Provider`] owns a [`Registry`] and a [`PluginChain`], both fixed at
//! build time. It is cheap to clone and safe to share between tasks.
//!
//! # Entry Points
//!
//! | method          | input  | result                                         |
//! |-----------------|--------|------------------------------------------------|
//! | `open`          | URL    | `bool` now, outcome later through a callback   |
//! | `open_target`   | target | same as `open`                                 |
//! | `dispatch_url`  | URL    | `Result` when awaited                          |
//! | `dispatch`      | target | `Result` when awaited                          |
//! | `resolve`       | URL    | the presentable, without running plugins       |
//!
//! The callback entry points run `should` before returning and spawn the rest
//! of the lifecycle on a tokio runtime.

use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use wayfinder_core::{OpenError, Plugin, SharedPresentable, Target, Value};
use wayfinder_std::{
    chain::PluginChain,
    registry::{Registry, RegistryBuilder, RouteKind, TargetResolver, UrlTarget},
};

struct Inner<T: Target> {
    registry: Registry<T>,
    chain: PluginChain<T>,
    runtime: Option<Handle>,
}

/// Opens URLs and targets through a registry and a plugin chain.
///
/// # Example
///
/// ```rust,ignore
/// let provider = Provider::<AppTarget>::builder()
///     .url_targets()
///     .plugin(AccountPlugin::new(session))
///     .build();
///
/// let attempted = provider.open("app://open/live?id=7", |ok| {
///     println!("opened: {ok}");
/// });
/// ```
pub struct Provider<T: Target> {
    inner: Arc<Inner<T>>,
}

impl<T: Target> Clone for Provider<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Target> Provider<T> {
    /// Start building a provider.
    pub fn builder() -> ProviderBuilder<T> {
        ProviderBuilder::new()
    }

    /// Create a provider from a registry and a plugin chain.
    ///
    /// The runtime is taken from the calling context, if there is one.
    pub fn new(registry: Registry<T>, chain: PluginChain<T>) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                chain,
                runtime: Handle::try_current().ok(),
            }),
        }
    }

    /// Open a URL.
    ///
    /// Returns `true` if the open was admitted: a route matched, a target was
    /// built and at least one plugin accepted it. The rest of the lifecycle
    /// then runs in the background and `on_complete` receives its outcome.
    ///
    /// When this returns `false`, `on_complete(false)` has already been called.
    pub fn open<F>(&self, url: &str, on_complete: F) -> bool
    where
        F: FnOnce(bool) + Send + 'static,
    {
        match self.target(url) {
            Ok(target) => self.open_target(target, on_complete),
            Err(_) => {
                on_complete(false);
                false
            }
        }
    }

    /// Open a target directly, skipping URL resolution.
    ///
    /// Same contract as [`Provider::open`].
    pub fn open_target<F>(&self, target: T, on_complete: F) -> bool
    where
        F: FnOnce(bool) + Send + 'static,
    {
        let guard = CompletionGuard::new(on_complete);
        if self.inner.chain.should(&target).is_err() {
            guard.finish(false);
            return false;
        }

        let Some(runtime) = self.runtime() else {
            warn!("open admitted but no tokio runtime can drive it");
            guard.finish(false);
            return false;
        };

        // The guard moves into the task, so a task dropped on shutdown or
        // unwound by a panic still reports `false`.
        let inner = Arc::clone(&self.inner);
        runtime.spawn(async move {
            let result = inner.chain.proceed(&target).await;
            if let Err(err) = &result {
                debug!(error = %err, "open failed");
            }
            guard.finish(result.is_ok());
        });
        true
    }

    /// Open a URL and wait for the outcome.
    pub async fn dispatch_url(&self, url: &str) -> Result<(), OpenError> {
        let target = self.target(url)?;
        self.dispatch(target).await
    }

    /// Open a target and wait for the outcome.
    pub async fn dispatch(&self, target: T) -> Result<(), OpenError> {
        self.inner.chain.run(&target).await
    }

    /// Resolve a URL to a target, without opening it.
    pub fn target(&self, url: &str) -> Result<T, OpenError> {
        let Some(resolved) = self.inner.registry.resolve(url) else {
            debug!(url, "no route matches");
            return Err(OpenError::NoMatch { url: url.to_owned() });
        };
        debug!(url, pattern = %resolved.matched.pattern, kind = ?resolved.kind, "route matched");
        resolved.target(url).inspect_err(|err| {
            debug!(url, error = %err, "route did not resolve");
        })
    }

    /// The presentable a URL would open.
    ///
    /// Only presentable routes are consulted and no plugin runs. Returns
    /// `None` when nothing matches, the target cannot be built, or the target
    /// performs an action instead.
    pub fn resolve(&self, url: &str) -> Option<SharedPresentable> {
        let resolved = self.inner.registry.resolve_kind(RouteKind::Present, url)?;
        let target = resolved.target(url).ok()?;
        self.presentable(&target)
    }

    /// The presentable of a target's task, if it presents one.
    pub fn presentable(&self, target: &T) -> Option<SharedPresentable> {
        target.task().into_presentable()
    }

    /// The registry routes are resolved against.
    pub fn registry(&self) -> &Registry<T> {
        &self.inner.registry
    }

    /// Number of plugins in the chain.
    pub fn plugin_count(&self) -> usize {
        self.inner.chain.len()
    }

    fn runtime(&self) -> Option<Handle> {
        self.inner
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
    }
}

/// Calls the open callback exactly once: with the outcome through `finish`,
/// or with `false` when dropped unfinished.
struct CompletionGuard<F: FnOnce(bool)> {
    callback: Option<F>,
}

impl<F: FnOnce(bool)> CompletionGuard<F> {
    fn new(callback: F) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    fn finish(mut self, ok: bool) {
        if let Some(callback) = self.callback.take() {
            callback(ok);
        }
    }
}

impl<F: FnOnce(bool)> Drop for CompletionGuard<F> {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            debug!("open dropped before it finished");
            callback(false);
        }
    }
}

impl<T: Target> std::fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("registry", &self.inner.registry)
            .field("chain", &self.inner.chain)
            .field("runtime", &self.inner.runtime.is_some())
            .finish()
    }
}

/// Builder for constructing a [`Provider`].
///
/// Plugins keep the order they are added in. Without an explicit runtime the
/// provider uses the runtime it is built on, falling back to the one it is
/// opened from.
pub struct ProviderBuilder<T: Target> {
    routes: RegistryBuilder<T>,
    chain: PluginChain<T>,
    runtime: Option<Handle>,
}

impl<T: Target> Default for ProviderBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Target> ProviderBuilder<T> {
    /// Create a new empty provider builder.
    pub fn new() -> Self {
        Self {
            routes: RegistryBuilder::new(),
            chain: PluginChain::new(),
            runtime: None,
        }
    }

    /// Append a plugin.
    pub fn plugin<P: Plugin<T>>(mut self, plugin: P) -> Self {
        self.chain = self.chain.with(plugin);
        self
    }

    /// Use an existing plugin chain, replacing the plugins added so far.
    pub fn plugins(mut self, chain: PluginChain<T>) -> Self {
        self.chain = chain;
        self
    }

    /// Start from an existing registry. Routes added afterwards are appended.
    pub fn registry(mut self, registry: Registry<T>) -> Self {
        self.routes = RegistryBuilder::from(registry);
        self
    }

    /// Bind a template to a presentable route.
    pub fn route<R: TargetResolver<T>>(mut self, pattern: &str, resolver: R) -> Self {
        self.routes = self.routes.route(pattern, resolver);
        self
    }

    /// Bind a template to an action route.
    pub fn action<R: TargetResolver<T>>(mut self, pattern: &str, resolver: R) -> Self {
        self.routes = self.routes.action(pattern, resolver);
        self
    }

    /// Register a custom placeholder converter.
    pub fn converter<F>(mut self, kind: impl Into<String>, converter: F) -> Self
    where
        F: Fn(&[&str], usize) -> Option<Value> + Send + Sync + 'static,
    {
        self.routes = self.routes.converter(kind, converter);
        self
    }

    /// Drive opens on the given runtime.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Build the provider.
    pub fn build(self) -> Provider<T> {
        Provider {
            inner: Arc::new(Inner {
                registry: self.routes.build(),
                chain: self.chain,
                runtime: self.runtime.or_else(|| Handle::try_current().ok()),
            }),
        }
    }
}

impl<T: UrlTarget> ProviderBuilder<T> {
    /// Bind every template declared by `T`.
    pub fn url_targets(mut self) -> Self {
        self.routes = self.routes.url_targets();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_core::Task;
    use wayfinder_std::{request::RouteRequest, testing::RecordingPresentable};

    struct Screen(RecordingPresentable);

    impl Target for Screen {
        fn task(&self) -> Task {
            Task::present(self.0.clone())
        }
    }

    #[test]
    fn open_without_runtime_reports_failure() {
        let presentable = RecordingPresentable::new();
        let shared = presentable.clone();
        let provider = Provider::<Screen>::builder()
            .route("app://screen", move |_: &RouteRequest| Some(Screen(shared.clone())))
            .build();

        let (tx, rx) = std::sync::mpsc::channel();
        assert!(!provider.open("app://screen", move |ok| {
            let _ = tx.send(ok);
        }));
        assert_eq!(rx.try_recv(), Ok(false));
        assert_eq!(presentable.opened(), 0);
    }

    #[test]
    fn dropped_guard_reports_failure_once() {
        let (tx, rx) = std::sync::mpsc::channel();
        drop(CompletionGuard::new(move |ok| {
            let _ = tx.send(ok);
        }));
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![false]);

        let (tx, rx) = std::sync::mpsc::channel();
        CompletionGuard::new(move |ok| {
            let _ = tx.send(ok);
        })
        .finish(true);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![true]);
    }

    #[test]
    fn resolve_does_not_need_a_runtime() {
        let provider = Provider::<Screen>::builder()
            .route("app://screen", |_: &RouteRequest| {
                Some(Screen(RecordingPresentable::new()))
            })
            .build();

        assert!(provider.resolve("app://screen").is_some());
        assert!(provider.resolve("app://other").is_none());
        assert_eq!(provider.plugin_count(), 0);
    }
}
