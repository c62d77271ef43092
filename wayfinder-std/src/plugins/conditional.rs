//! Conditional Plugin - Apply a plugin to selected targets only.

use wayfinder_core::{Completion, Plugin, SharedPresentable, Target};

/// A plugin that only intercepts targets accepted by a condition.
///
/// For any other target it behaves like a plugin with every default: it
/// accepts in `should`, succeeds in `prepare` and ignores `will` and `did`.
///
/// # Example
///
/// ```rust,ignore
/// // Only targets behind a login wall go through the account plugin.
/// let account = ConditionalPlugin::new(
///     |target: &AppTarget| target.requires_login(),
///     AccountPlugin::new(session),
/// );
/// ```
pub struct ConditionalPlugin<C, P> {
    condition: C,
    inner: P,
}

impl<C, P> ConditionalPlugin<C, P> {
    /// Create a new `ConditionalPlugin`.
    ///
    /// The inner plugin is only consulted when `condition(target)` returns `true`.
    pub fn new(condition: C, inner: P) -> Self {
        Self { condition, inner }
    }
}

impl<T, C, P> Plugin<T> for ConditionalPlugin<C, P>
where
    T: Target,
    C: Fn(&T) -> bool + Send + Sync + 'static,
    P: Plugin<T>,
{
    fn should(&self, target: &T) -> bool {
        !(self.condition)(target) || self.inner.should(target)
    }

    async fn prepare(&self, target: &T, completion: Completion) {
        if (self.condition)(target) {
            self.inner.prepare(target, completion).await
        } else {
            completion.succeed();
        }
    }

    fn will(&self, target: &T, presentable: &SharedPresentable) {
        if (self.condition)(target) {
            self.inner.will(target, presentable);
        }
    }

    fn did(&self, target: &T, presentable: &SharedPresentable) {
        if (self.condition)(target) {
            self.inner.did(target, presentable);
        }
    }
}
