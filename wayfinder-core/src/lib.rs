//! # wayfinder-core
//!
//! Core traits for the Wayfinder URL dispatch framework.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! plugins and presentables that don't need the matcher or the registry.
//!
//! # Dispatch Model
//!
//! A URL is matched against registered templates, the match is turned into a
//! typed [`Target`], and the target is opened through a chain of [`Plugin`]s.
//!
//! ## Target and Task
//!
//! A [`Target`] is the resolved, strongly typed request. It exposes exactly one
//! [`Task`]: either present a [`Presentable`] or perform an [`Action`].
//!
//! ## Plugin
//!
//! Plugins intercept the open lifecycle in four phases:
//!
//! - **should**: synchronous early rejection
//! - **prepare**: concurrent, reports through a one-shot [`Completion`]
//! - **will** / **did**: ordered notifications around the presentable opening
//!
//! ## Presentable
//!
//! The external object a `Present` task opens. Wayfinder never looks inside it;
//! it only awaits its `open` and `close` operations.
//!
//! # Error Types
//!
//! - [`OpenError`] - Why an open did not happen

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod completion;
mod error;
mod plugin;
mod presentable;
mod target;
mod value;

// Re-exports
pub use completion::{Completion, Verdict};
pub use error::OpenError;
pub use plugin::{DynPlugin, Plugin};
pub use presentable::{DynPresentable, Presentable, SharedPresentable};
pub use target::{Action, Target, Task};
pub use value::{MatchValues, Value};
