//! Standard plugin decorators.
//!
//! - [`TracingPlugin`]: instruments each phase of an inner plugin
//! - [`TimeoutPlugin`]: bounds an inner plugin's `prepare` with a deadline
//! - [`ConditionalPlugin`]: applies an inner plugin only to selected targets

mod conditional;
mod timeout;
mod tracing;

pub use self::conditional::ConditionalPlugin;
pub use self::timeout::TimeoutPlugin;
pub use self::tracing::TracingPlugin;
