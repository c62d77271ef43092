//! # wayfinder-std
//!
//! Standard implementations for the Wayfinder URL dispatch framework.
//!
//! This crate provides:
//! - **Templates**: [`pattern::CompiledPattern`] and URL normalization
//! - **Matching**: [`matcher::Matcher`], first match wins
//! - **Routing tables**: [`registry::Registry`], [`registry::RegistryBuilder`]
//! - **Lifecycle**: [`chain::PluginChain`] runs should / prepare / will / did
//! - **Standard plugins**: Tracing, Timeout, Conditional
//! - **Testing**: recording plugins and presentables

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use wayfinder_core;

// Modules
pub mod chain;
pub mod matcher;
pub mod pattern;
pub mod plugins;
pub mod registry;
pub mod request;
pub mod testing;
