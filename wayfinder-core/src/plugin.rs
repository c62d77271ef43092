//! # Plugin
//!
//! Interceptors consulted while a target is being opened.
//!
//! Plugins are held in a fixed, ordered list for the lifetime of a provider.
//! Every method has a default, so a plugin only overrides the phases it
//! cares about:
//!
//! | phase     | default            | runs                                  |
//! |-----------|--------------------|---------------------------------------|
//! | `should`  | `true`             | sequentially, before anything else    |
//! | `prepare` | immediate success  | concurrently across all plugins       |
//! | `will`    | no-op              | in order, before a presentable opens  |
//! | `did`     | no-op              | in order, after a presentable opened  |

use crate::{completion::Completion, presentable::SharedPresentable, target::Target};
use std::{future::Future, pin::Pin, sync::Arc};

/// An interceptor for the open lifecycle of targets of type `T`.
///
/// # `prepare` Reporting
///
/// `prepare` receives a [`Completion`] and must report through it exactly
/// once, now or later (for example after a login screen is dismissed).
/// Extra reports are ignored. Dropping every clone of the handle without
/// reporting counts as failure.
///
/// # Static vs Dynamic Dispatch
///
/// This trait uses native `async fn` for static dispatch. Plugin chains store
/// plugins as [`DynPlugin`] trait objects.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Plugin<{T}>`",
    label = "missing `Plugin` implementation",
    note = "Plugins only need to override the phases they intercept."
)]
pub trait Plugin<T: Target>: Send + Sync + 'static {
    /// Whether this plugin accepts the target.
    fn should(&self, target: &T) -> bool {
        let _ = target;
        true
    }

    /// Prepare to open the target, reporting the outcome through `completion`.
    fn prepare(&self, target: &T, completion: Completion) -> impl Future<Output = ()> + Send {
        let _ = target;
        completion.succeed();
        std::future::ready(())
    }

    /// Called right before the presentable opens.
    fn will(&self, target: &T, presentable: &SharedPresentable) {
        let _ = (target, presentable);
    }

    /// Called after the presentable finished opening.
    fn did(&self, target: &T, presentable: &SharedPresentable) {
        let _ = (target, presentable);
    }
}

/// Object-safe version of [`Plugin`].
pub trait DynPlugin<T: Target>: Send + Sync + 'static {
    /// See [`Plugin::should`].
    fn should_dyn(&self, target: &T) -> bool;

    /// See [`Plugin::prepare`].
    fn prepare_dyn<'a>(
        &'a self,
        target: &'a T,
        completion: Completion,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

    /// See [`Plugin::will`].
    fn will_dyn(&self, target: &T, presentable: &SharedPresentable);

    /// See [`Plugin::did`].
    fn did_dyn(&self, target: &T, presentable: &SharedPresentable);
}

// Blanket implementation: Any type implementing Plugin implements DynPlugin automatically.
impl<T: Target, P: Plugin<T>> DynPlugin<T> for P {
    fn should_dyn(&self, target: &T) -> bool {
        self.should(target)
    }

    fn prepare_dyn<'a>(
        &'a self,
        target: &'a T,
        completion: Completion,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(self.prepare(target, completion))
    }

    fn will_dyn(&self, target: &T, presentable: &SharedPresentable) {
        self.will(target, presentable)
    }

    fn did_dyn(&self, target: &T, presentable: &SharedPresentable) {
        self.did(target, presentable)
    }
}

// Allow a shared plugin object to be wrapped where a Plugin is expected.
impl<T: Target> Plugin<T> for Arc<dyn DynPlugin<T>> {
    fn should(&self, target: &T) -> bool {
        self.as_ref().should_dyn(target)
    }

    async fn prepare(&self, target: &T, completion: Completion) {
        self.as_ref().prepare_dyn(target, completion).await
    }

    fn will(&self, target: &T, presentable: &SharedPresentable) {
        self.as_ref().will_dyn(target, presentable)
    }

    fn did(&self, target: &T, presentable: &SharedPresentable) {
        self.as_ref().did_dyn(target, presentable)
    }
}
