//! # wayfinder - URL Dispatch for Typed Targets
//!
//! `wayfinder` turns URLs into strongly typed targets and opens them through
//! an ordered chain of plugins.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wayfinder::prelude::*;
//!
//! enum AppTarget {
//!     Profile { id: i64 },
//! }
//!
//! impl Target for AppTarget {
//!     fn task(&self) -> Task {
//!         match self {
//!             AppTarget::Profile { id } => Task::present(ProfileScreen::new(*id)),
//!         }
//!     }
//! }
//!
//! let provider = Provider::<AppTarget>::builder()
//!     .route("app://user/<int:id>", |request: &RouteRequest| {
//!         request.values().int("id").map(|id| AppTarget::Profile { id })
//!     })
//!     .plugin(TracingPlugin::new(AccountPlugin::new(session), "account"))
//!     .build();
//!
//! provider.dispatch_url("app://user/42").await?;
//! ```
//!
//! ## Matching
//!
//! URLs are normalized (query and fragment dropped, slashes collapsed) and
//! compared against templates in registration order. The first template that
//! fully matches wins; there is no specificity scoring.
//!
//! ## Opening
//!
//! Every open runs `should` on each plugin (any acceptance admits the target),
//! then `prepare` on all plugins concurrently (all must succeed), then the
//! target's task, wrapped in `will` and `did` when it presents something.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod provider;

pub use provider::{Provider, ProviderBuilder};

pub use wayfinder_core::{
    Action, Completion, DynPlugin, DynPresentable, MatchValues, OpenError, Plugin, Presentable,
    SharedPresentable, Target, Task, Value, Verdict,
};

pub use wayfinder_std::{
    chain::PluginChain,
    matcher::{Converter, MatchResult, Matcher},
    pattern::{CompiledPattern, PathSegment, normalize},
    registry::{Registry, RegistryBuilder, Resolved, RouteKind, TargetResolver, UrlTarget},
    request::{RouteRequest, append_query},
};

/// Standard plugin implementations.
pub mod plugins {
    #![allow(clippy::wildcard_imports)]
    pub use wayfinder_std::plugins::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use wayfinder_std::testing::*;
}

/// Prelude module - common imports for Wayfinder.
///
/// # Usage
///
/// ```rust,ignore
/// use wayfinder::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Lifecycle
        Completion,
        // Errors
        OpenError,
        Plugin,
        Presentable,
        // Entry point
        Provider,
        // Routing
        RouteRequest,
        Target,
        Task,
        UrlTarget,
        plugins::TracingPlugin,
    };
}
