//! # Presentable
//!
//! The external object a `Present` task opens (a screen, a window, a view
//! controller). Wayfinder only awaits its lifecycle operations; how it appears
//! or disappears is up to the implementor.

use std::{future::Future, pin::Pin, sync::Arc};

/// An object that can be opened and closed.
///
/// Both operations must resolve exactly once on every path, including when no
/// visual transition is needed. The returned `bool` is the outcome.
///
/// # Static vs Dynamic Dispatch
///
/// This trait uses native `async fn` for static dispatch. Tasks carry
/// presentables as [`SharedPresentable`] through the [`DynPresentable`] mirror.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Presentable`",
    label = "missing `Presentable` implementation",
    note = "Presentables must implement `open` and `close`."
)]
pub trait Presentable: Send + Sync + 'static {
    /// Open the presentable.
    fn open(&self) -> impl Future<Output = bool> + Send;

    /// Close the presentable.
    fn close(&self) -> impl Future<Output = bool> + Send;
}

/// Object-safe version of [`Presentable`].
pub trait DynPresentable: Send + Sync + 'static {
    /// Open the presentable (dynamic dispatch version).
    fn open_dyn(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;

    /// Close the presentable (dynamic dispatch version).
    fn close_dyn(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

impl<P: Presentable> DynPresentable for P {
    fn open_dyn(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(self.open())
    }

    fn close_dyn(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(self.close())
    }
}

/// A shared, type-erased presentable.
pub type SharedPresentable = Arc<dyn DynPresentable>;
