//! Error types for Wayfinder.
//!
//! Every variant collapses to `false` at the callback boundary of an open
//! call. The structured form is only visible to async callers that use the
//! `dispatch` entry points.

use thiserror::Error;

/// The reason an open call did not complete successfully.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpenError {
    /// No registered template matches the normalized URL.
    #[error("no route matches `{url}`")]
    NoMatch {
        /// The URL as it was presented.
        url: String,
    },

    /// A template matched but its resolver produced no target.
    #[error("route `{pattern}` matched but could not be resolved to a target")]
    ResolutionFailed {
        /// The template that matched.
        pattern: String,
    },

    /// Every plugin declined the target in the `should` phase.
    #[error("every plugin declined to open the target")]
    Vetoed,

    /// At least one plugin reported failure in the `prepare` phase.
    #[error("a plugin rejected the target while preparing")]
    PrepareRejected,

    /// The presentable reported that it could not open.
    #[error("the presentable failed to open")]
    PresentableFailed,

    /// A perform task reported failure.
    #[error("the action reported failure")]
    ActionFailed,
}

impl OpenError {
    /// Returns `true` for the two "could not open" outcomes of URL resolution.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::NoMatch { .. } | Self::ResolutionFailed { .. })
    }
}
