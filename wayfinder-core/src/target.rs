//! Targets and the task they produce.

use crate::{completion::Completion, presentable::SharedPresentable};
use futures::future::BoxFuture;
use std::{fmt, future::Future};

/// A resolved, strongly typed open request.
///
/// Targets are immutable once constructed. Each call to [`Target::task`]
/// produces a fresh [`Task`] describing the effect of opening the target.
///
/// # Example
///
/// ```rust,ignore
/// enum AppTarget {
///     Profile { id: i64 },
///     Refresh,
/// }
///
/// impl Target for AppTarget {
///     fn task(&self) -> Task {
///         match self {
///             AppTarget::Profile { id } => Task::present(ProfileScreen::new(*id)),
///             AppTarget::Refresh => Task::perform(|| async { refresh().await.is_ok() }),
///         }
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Target",
    label = "missing `Target` implementation",
    note = "Targets must be `Send + Sync + 'static` and describe their `Task`."
)]
pub trait Target: Send + Sync + 'static {
    /// The effect of opening this target.
    fn task(&self) -> Task;
}

/// The kind of effect a [`Target`] produces.
pub enum Task {
    /// Open a presentable object.
    Present(SharedPresentable),
    /// Run an action that reports success or failure.
    Perform(Action),
}

impl Task {
    /// Build a `Present` task from any presentable.
    pub fn present<P: crate::Presentable>(presentable: P) -> Self {
        Task::Present(std::sync::Arc::new(presentable))
    }

    /// Build a `Perform` task from an async closure.
    pub fn perform<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Task::Perform(Action::new(f))
    }

    /// The presentable, if this is a `Present` task.
    pub fn presentable(&self) -> Option<&SharedPresentable> {
        match self {
            Task::Present(presentable) => Some(presentable),
            Task::Perform(_) => None,
        }
    }

    /// Consume the task, returning the presentable if this is a `Present` task.
    pub fn into_presentable(self) -> Option<SharedPresentable> {
        match self {
            Task::Present(presentable) => Some(presentable),
            Task::Perform(_) => None,
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Present(_) => f.write_str("Task::Present(..)"),
            Task::Perform(_) => f.write_str("Task::Perform(..)"),
        }
    }
}

/// A deferred unit of work run by a `Perform` task.
pub struct Action {
    run: Box<dyn FnOnce() -> BoxFuture<'static, bool> + Send>,
}

impl Action {
    /// Create an action from an async closure.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Self {
            run: Box::new(move || Box::pin(f())),
        }
    }

    /// Create an action from a callback-style closure.
    ///
    /// The closure receives a [`Completion`] and must report through it,
    /// possibly later and from another task. Only the first report counts;
    /// dropping every handle without reporting is a failure.
    pub fn from_callback<F>(f: F) -> Self
    where
        F: FnOnce(Completion) + Send + 'static,
    {
        Self::new(move || {
            let (completion, verdict) = Completion::channel();
            f(completion);
            verdict
        })
    }

    /// Run the action to completion.
    pub async fn run(self) -> bool {
        (self.run)().await
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}
