//! Route registry: templates bound to target resolvers.
//!
//! Routes live in two ordered tables. The presentable table backs both
//! opening and presentable lookup; the action table is only consulted when
//! opening. A template lives in at most one table.

use crate::{
    matcher::{MatchResult, Matcher},
    pattern::CompiledPattern,
    request::RouteRequest,
};
use std::{fmt, sync::Arc};
use wayfinder_core::{OpenError, Target, Value};

/// Converts a matched URL into a target.
///
/// Returning `None` means the template matched but the request is not a valid
/// target (for example a required query parameter is missing).
pub trait TargetResolver<T>: Send + Sync + 'static {
    /// Resolve the request into a target.
    fn resolve(&self, request: &RouteRequest) -> Option<T>;
}

impl<T, F> TargetResolver<T> for F
where
    F: Fn(&RouteRequest) -> Option<T> + Send + Sync + 'static,
{
    fn resolve(&self, request: &RouteRequest) -> Option<T> {
        self(request)
    }
}

/// A target type that declares its own URL templates.
///
/// # Example
///
/// ```rust,ignore
/// impl UrlTarget for AppTarget {
///     fn patterns() -> &'static [&'static str] {
///         &["app://open/none", "app://open/live"]
///     }
///
///     fn from_route(request: &RouteRequest) -> Option<Self> {
///         match request.pattern() {
///             "app://open/none" => Some(AppTarget::None),
///             "app://open/live" => request.query_param("id").map(|id| AppTarget::Live { id }),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait UrlTarget: Target + Sized {
    /// The templates this target answers to, in precedence order.
    fn patterns() -> &'static [&'static str];

    /// Build the target from a matched request.
    fn from_route(request: &RouteRequest) -> Option<Self>;
}

/// Which table a route lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Produces targets that are expected to present something.
    Present,
    /// Produces targets that are only ever opened, never looked up.
    Perform,
}

struct Route<T> {
    pattern: CompiledPattern,
    resolver: Arc<dyn TargetResolver<T>>,
}

struct RouteTable<T> {
    routes: Vec<Route<T>>,
}

impl<T: 'static> RouteTable<T> {
    fn new() -> Self {
        Self { routes: Vec::new() }
    }

    fn position(&self, pattern: &str) -> Option<usize> {
        self.routes.iter().position(|route| route.pattern.as_str() == pattern)
    }

    // A duplicate template keeps its slot and takes the new resolver.
    fn insert(&mut self, pattern: CompiledPattern, resolver: Arc<dyn TargetResolver<T>>) {
        match self.position(pattern.as_str()) {
            Some(index) => self.routes[index].resolver = resolver,
            None => self.routes.push(Route { pattern, resolver }),
        }
    }

    fn remove(&mut self, pattern: &str) {
        if let Some(index) = self.position(pattern) {
            self.routes.remove(index);
        }
    }

    fn get(&self, pattern: &str) -> Option<&Arc<dyn TargetResolver<T>>> {
        self.routes
            .iter()
            .find(|route| route.pattern.as_str() == pattern)
            .map(|route| &route.resolver)
    }

    fn patterns(&self) -> impl Iterator<Item = &CompiledPattern> {
        self.routes.iter().map(|route| &route.pattern)
    }
}

/// A successful registry lookup for a URL.
pub struct Resolved<'r, T> {
    /// The table the route was found in.
    pub kind: RouteKind,
    /// The matched template and captured values.
    pub matched: MatchResult,
    resolver: &'r dyn TargetResolver<T>,
}

impl<T: 'static> Resolved<'_, T> {
    /// Build the target, using `url` (the original, unnormalized URL) for context.
    pub fn target(self, url: &str) -> Result<T, OpenError> {
        let pattern = self.matched.pattern.clone();
        let request = RouteRequest::new(url, self.matched);
        self.resolver
            .resolve(&request)
            .ok_or(OpenError::ResolutionFailed { pattern })
    }
}

impl<T: 'static> fmt::Debug for Resolved<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("kind", &self.kind)
            .field("matched", &self.matched)
            .finish_non_exhaustive()
    }
}

/// Templates bound to the resolvers that turn matches into targets.
pub struct Registry<T> {
    matcher: Matcher,
    presentables: RouteTable<T>,
    actions: RouteTable<T>,
}

impl<T: 'static> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Registry<T> {
    /// Create an empty registry with the standard matcher.
    pub fn new() -> Self {
        Self::with_matcher(Matcher::new())
    }

    /// Create an empty registry with a custom matcher.
    pub fn with_matcher(matcher: Matcher) -> Self {
        Self {
            matcher,
            presentables: RouteTable::new(),
            actions: RouteTable::new(),
        }
    }

    /// Start building a registry.
    pub fn builder() -> RegistryBuilder<T> {
        RegistryBuilder::new()
    }

    /// Bind a template in the presentable table.
    pub fn register<R>(&mut self, pattern: &str, resolver: R)
    where
        R: TargetResolver<T>,
    {
        self.actions.remove(pattern);
        self.presentables
            .insert(CompiledPattern::new(pattern), Arc::new(resolver));
    }

    /// Bind a template in the action table.
    pub fn register_action<R>(&mut self, pattern: &str, resolver: R)
    where
        R: TargetResolver<T>,
    {
        self.presentables.remove(pattern);
        self.actions
            .insert(CompiledPattern::new(pattern), Arc::new(resolver));
    }

    /// Find the route for `url`: the presentable table first, then actions.
    pub fn resolve(&self, url: &str) -> Option<Resolved<'_, T>> {
        self.resolve_kind(RouteKind::Present, url)
            .or_else(|| self.resolve_kind(RouteKind::Perform, url))
    }

    /// Find the route for `url` in a single table.
    pub fn resolve_kind(&self, kind: RouteKind, url: &str) -> Option<Resolved<'_, T>> {
        let table = self.table(kind);
        let matched = self.matcher.match_url(url, table.patterns())?;
        let resolver = table.get(&matched.pattern)?;
        Some(Resolved {
            kind,
            matched,
            resolver: resolver.as_ref(),
        })
    }

    /// Resolve `url` all the way to a target.
    pub fn target(&self, url: &str) -> Result<T, OpenError> {
        self.resolve(url)
            .ok_or_else(|| OpenError::NoMatch { url: url.to_owned() })?
            .target(url)
    }

    /// The resolver bound to a template, and the table it lives in.
    pub fn lookup(&self, pattern: &str) -> Option<(RouteKind, &dyn TargetResolver<T>)> {
        if let Some(resolver) = self.presentables.get(pattern) {
            return Some((RouteKind::Present, resolver.as_ref()));
        }
        self.actions
            .get(pattern)
            .map(|resolver| (RouteKind::Perform, resolver.as_ref()))
    }

    /// Registered templates of one table, in precedence order.
    pub fn patterns(&self, kind: RouteKind) -> impl Iterator<Item = &str> {
        self.table(kind).patterns().map(CompiledPattern::as_str)
    }

    /// The matcher used for resolution.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Total number of routes.
    pub fn len(&self) -> usize {
        self.presentables.routes.len() + self.actions.routes.len()
    }

    /// Whether no route is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn table(&self, kind: RouteKind) -> &RouteTable<T> {
        match kind {
            RouteKind::Present => &self.presentables,
            RouteKind::Perform => &self.actions,
        }
    }
}

impl<T: UrlTarget> Registry<T> {
    /// Bind every template declared by `T` in the presentable table.
    pub fn register_url_targets(&mut self) {
        for pattern in T::patterns() {
            self.register(pattern, T::from_route);
        }
    }
}

impl<T: 'static> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("presentables", &self.patterns(RouteKind::Present).collect::<Vec<_>>())
            .field("actions", &self.patterns(RouteKind::Perform).collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for constructing a [`Registry`] during startup.
pub struct RegistryBuilder<T> {
    matcher: Matcher,
    registry: Registry<T>,
}

impl<T: 'static> Default for RegistryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> RegistryBuilder<T> {
    /// Create a new empty registry builder.
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(),
            registry: Registry::new(),
        }
    }

    /// Register a custom placeholder converter.
    pub fn converter<F>(mut self, kind: impl Into<String>, converter: F) -> Self
    where
        F: Fn(&[&str], usize) -> Option<Value> + Send + Sync + 'static,
    {
        self.matcher = self.matcher.with_converter(kind, converter);
        self
    }

    /// Bind a template in the presentable table.
    pub fn route<R: TargetResolver<T>>(mut self, pattern: &str, resolver: R) -> Self {
        self.registry.register(pattern, resolver);
        self
    }

    /// Bind a template in the action table.
    pub fn action<R: TargetResolver<T>>(mut self, pattern: &str, resolver: R) -> Self {
        self.registry.register_action(pattern, resolver);
        self
    }

    /// Build the registry.
    pub fn build(self) -> Registry<T> {
        Registry {
            matcher: self.matcher,
            ..self.registry
        }
    }
}

impl<T: 'static> From<Registry<T>> for RegistryBuilder<T> {
    fn from(registry: Registry<T>) -> Self {
        Self {
            matcher: registry.matcher.clone(),
            registry,
        }
    }
}

impl<T: UrlTarget> RegistryBuilder<T> {
    /// Bind every template declared by `T`.
    pub fn url_targets(mut self) -> Self {
        self.registry.register_url_targets();
        self
    }
}
