//! The context handed to target resolvers.

use crate::matcher::MatchResult;
use url::form_urlencoded;
use wayfinder_core::{MatchValues, Value};

/// A matched URL, as seen by a target resolver.
///
/// Keeps the original URL (query and fragment included) next to the values
/// the matcher captured from its normalized path.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    url: String,
    pattern: String,
    values: MatchValues,
}

impl RouteRequest {
    /// Create a request from the original URL and its match.
    pub fn new(url: impl Into<String>, matched: MatchResult) -> Self {
        Self {
            url: url.into(),
            pattern: matched.pattern,
            values: matched.values,
        }
    }

    /// The URL exactly as it was opened.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The template that matched.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Values captured from placeholders.
    pub fn values(&self) -> &MatchValues {
        &self.values
    }

    /// A single captured value.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Decoded query pairs of the original URL, in order.
    pub fn query(&self) -> Vec<(String, String)> {
        form_urlencoded::parse(query_of(&self.url).as_bytes())
            .into_owned()
            .collect()
    }

    /// The first decoded value for a query parameter.
    pub fn query_param(&self, name: &str) -> Option<String> {
        form_urlencoded::parse(query_of(&self.url).as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// The raw query of a URL: between the first `?` and the fragment.
pub fn query_of(url: &str) -> &str {
    let url = url.split_once('#').map_or(url, |(before, _)| before);
    url.split_once('?').map_or("", |(_, query)| query)
}

/// Append form-encoded parameters to a URL's query.
///
/// Pairs with an empty key or value are skipped. An existing query is kept and
/// extended; a fragment stays at the end.
///
/// ```rust,ignore
/// assert_eq!(
///     append_query("app://open/live?a=1#top", [("id", "7")]),
///     "app://open/live?a=1&id=7#top",
/// );
/// ```
pub fn append_query<I, K, V>(url: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut appended = false;
    for (key, value) in params {
        let (key, value) = (key.as_ref(), value.as_ref());
        if key.is_empty() || value.is_empty() {
            continue;
        }
        serializer.append_pair(key, value);
        appended = true;
    }
    if !appended {
        return url.to_owned();
    }
    let encoded = serializer.finish();

    let (rest, fragment) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    };
    let mut out = match rest.split_once('?') {
        Some((base, query)) if !query.is_empty() => format!("{base}?{query}&{encoded}"),
        Some((base, _)) => format!("{base}?{encoded}"),
        None => format!("{rest}?{encoded}"),
    };
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
