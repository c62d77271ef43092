//! # URL Templates
//!
//! Templates are URLs whose path segments may be placeholders:
//!
//! | segment         | meaning                                          |
//! |-----------------|--------------------------------------------------|
//! | `open`          | literal, compared verbatim                       |
//! | `<:key>`        | raw string capture                               |
//! | `<int:id>`      | typed capture (`string`, `int`, `float`, `uuid`) |
//! | `<path:rest>`   | every remaining segment, joined with `/`         |
//!
//! Malformed placeholder syntax is kept as a literal rather than rejected.

pub mod normalize;

pub use normalize::{normalize, scheme};

/// The placeholder kind that absorbs every remaining segment.
pub const PATH_KIND: &str = "path";

/// One segment of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Compared verbatim.
    Literal(String),
    /// Captures the segment under `key`, converted according to `kind`.
    Placeholder {
        /// The converter name; `None` captures the raw text.
        kind: Option<String>,
        /// The key the value is stored under.
        key: String,
    },
}

impl PathSegment {
    /// Parse a single segment.
    pub fn parse(segment: &str) -> Self {
        segment
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .and_then(|inner| inner.split_once(':'))
            .filter(|(_, key)| !key.is_empty())
            .map(|(kind, key)| PathSegment::Placeholder {
                kind: (!kind.is_empty()).then(|| kind.to_owned()),
                key: key.to_owned(),
            })
            .unwrap_or_else(|| PathSegment::Literal(segment.to_owned()))
    }

    /// Whether this is a `path` placeholder.
    pub fn is_path(&self) -> bool {
        matches!(self, PathSegment::Placeholder { kind: Some(kind), .. } if kind == PATH_KIND)
    }
}

/// Split a URL into its comparable path segments.
///
/// Empty segments and scheme tokens (segments ending in `:`) are skipped.
pub fn path_segments(url: &str) -> impl Iterator<Item = &str> {
    url.split('/')
        .filter(|segment| !segment.is_empty() && !segment.ends_with(':'))
}

/// Compile a template into its ordered segments.
///
/// The template is used as given; [`CompiledPattern::new`] normalizes first.
pub fn compile(template: &str) -> Vec<PathSegment> {
    path_segments(template).map(PathSegment::parse).collect()
}

/// A template compiled once and reused for every match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    source: String,
    scheme: Option<String>,
    segments: Vec<PathSegment>,
    has_path: bool,
}

impl CompiledPattern {
    /// Normalize and compile a template.
    pub fn new(template: impl Into<String>) -> Self {
        let source = template.into();
        let normalized = normalize(&source);
        let segments = compile(&normalized);
        Self {
            scheme: scheme(&normalized).map(str::to_owned),
            has_path: segments.iter().any(PathSegment::is_path),
            segments,
            source,
        }
    }

    /// The template exactly as it was registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The declared scheme, if any.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// The compiled segments.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether any segment is a `path` placeholder.
    pub fn has_path(&self) -> bool {
        self.has_path
    }

    /// Placeholder keys declared by the template, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            PathSegment::Placeholder { key, .. } => Some(key.as_str()),
            PathSegment::Literal(_) => None,
        })
    }
}

impl From<&str> for CompiledPattern {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl From<String> for CompiledPattern {
    fn from(template: String) -> Self {
        Self::new(template)
    }
}
