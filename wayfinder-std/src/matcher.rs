//! First-match-wins URL matching against compiled templates.
//!
//! Candidates are tried in the order given. There is no specificity scoring:
//! callers resolve ambiguity through registration order.

use crate::pattern::{CompiledPattern, PATH_KIND, PathSegment, normalize, path_segments, scheme};
use std::{collections::HashMap, fmt, sync::Arc};
use uuid::Uuid;
use wayfinder_core::{MatchValues, Value};

/// Converts the segment at `index` into a typed value.
///
/// Receives every input segment so that greedy kinds can look past `index`.
/// Returning `None` rejects the whole candidate.
pub type Converter = Arc<dyn Fn(&[&str], usize) -> Option<Value> + Send + Sync>;

fn converter<F>(f: F) -> Converter
where
    F: Fn(&[&str], usize) -> Option<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// The outcome of a successful match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// The matched template, as registered.
    pub pattern: String,
    /// Values captured by the template's placeholders.
    pub values: MatchValues,
}

/// Matches URLs against ordered candidate templates.
#[derive(Clone)]
pub struct Matcher {
    converters: HashMap<String, Converter>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    /// Create a matcher with the standard converters
    /// (`string`, `int`, `float`, `uuid`, `path`).
    pub fn new() -> Self {
        let mut converters: HashMap<String, Converter> = HashMap::new();
        converters.insert(
            "string".into(),
            converter(|segments, index| Some(Value::String(segments[index].to_owned()))),
        );
        converters.insert(
            "int".into(),
            converter(|segments, index| segments[index].parse().ok().map(Value::Int)),
        );
        converters.insert(
            "float".into(),
            converter(|segments, index| segments[index].parse().ok().map(Value::Float)),
        );
        converters.insert(
            "uuid".into(),
            converter(|segments, index| {
                let segment = segments[index];
                // Only the hyphenated form is accepted.
                if segment.len() != 36 {
                    return None;
                }
                Uuid::parse_str(segment).ok().map(Value::Uuid)
            }),
        );
        converters.insert(
            PATH_KIND.into(),
            converter(|segments, index| Some(Value::Path(segments[index..].join("/")))),
        );
        Self { converters }
    }

    /// Register a converter for a placeholder kind, replacing any existing one.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let matcher = Matcher::new().with_converter("hex", |segments, index| {
    ///     i64::from_str_radix(segments[index], 16).ok().map(Value::Int)
    /// });
    /// ```
    pub fn with_converter<F>(mut self, kind: impl Into<String>, converter: F) -> Self
    where
        F: Fn(&[&str], usize) -> Option<Value> + Send + Sync + 'static,
    {
        self.converters.insert(kind.into(), Arc::new(converter));
        self
    }

    /// Whether a converter is registered for `kind`.
    pub fn has_converter(&self, kind: &str) -> bool {
        self.converters.contains_key(kind)
    }

    /// Match `url` against `candidates`, returning the first full match.
    pub fn match_url<'p, I>(&self, url: &str, candidates: I) -> Option<MatchResult>
    where
        I: IntoIterator<Item = &'p CompiledPattern>,
    {
        let url = normalize(url);
        let input_scheme = scheme(&url);
        let segments: Vec<&str> = path_segments(&url).collect();

        candidates
            .into_iter()
            .filter(|candidate| candidate.scheme().is_none_or(|s| Some(s) == input_scheme))
            .find_map(|candidate| self.match_segments(&segments, candidate))
    }

    /// Match `url` against uncompiled templates.
    pub fn match_templates<S: AsRef<str>>(&self, url: &str, templates: &[S]) -> Option<MatchResult> {
        let compiled: Vec<CompiledPattern> = templates
            .iter()
            .map(|template| CompiledPattern::new(template.as_ref()))
            .collect();
        self.match_url(url, &compiled)
    }

    fn match_segments(&self, segments: &[&str], candidate: &CompiledPattern) -> Option<MatchResult> {
        let expected = candidate.segments().len();
        let fits = segments.len() == expected || (candidate.has_path() && segments.len() > expected);
        if !fits {
            return None;
        }

        let mut values = MatchValues::new();
        for (index, segment) in candidate.segments().iter().enumerate() {
            match segment {
                PathSegment::Literal(text) => {
                    if text != segments[index] {
                        return None;
                    }
                }
                PathSegment::Placeholder { kind, key } => {
                    let converter = kind.as_deref().and_then(|kind| self.converters.get(kind));
                    let value = match converter {
                        Some(convert) => convert(segments, index)?,
                        None => Value::String(segments[index].to_owned()),
                    };
                    values.insert(key.clone(), value);
                }
            }
        }

        Some(MatchResult {
            pattern: candidate.as_str().to_owned(),
            values,
        })
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("Matcher").field("converters", &kinds).finish()
    }
}
