//! URL normalization shared by templates and incoming URLs.

/// Normalize a URL or template for segment comparison.
///
/// - everything from the first `?` or `#` is dropped
/// - `:` followed by three or more slashes becomes `://`
/// - any other run of slashes becomes a single `/`
/// - trailing slashes are dropped, except directly after `scheme:` or `scheme://`
///
/// Normalization is idempotent.
pub fn normalize(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let url = &url[..end];

    let mut out = String::with_capacity(url.len());
    let mut chars = url.chars().peekable();
    let mut prev = None;
    while let Some(c) = chars.next() {
        if c != '/' {
            out.push(c);
            prev = Some(c);
            continue;
        }
        let mut run = 1;
        while chars.next_if_eq(&'/').is_some() {
            run += 1;
        }
        let keep = match prev {
            Some(':') => run.min(2),
            _ => 1,
        };
        out.extend(std::iter::repeat_n('/', keep));
        prev = Some('/');
    }

    let body = out.trim_end_matches('/').len();
    if body < out.len() {
        let keep = if out[..body].ends_with(':') {
            (out.len() - body).min(2)
        } else {
            0
        };
        out.truncate(body + keep);
    }
    out
}

/// The scheme of a normalized URL: the text before `://`.
///
/// Returns `None` when there is no `://`, or when a `/` appears before it.
pub fn scheme(url: &str) -> Option<&str> {
    let (scheme, _) = url.split_once("://")?;
    (!scheme.contains('/')).then_some(scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_query_and_fragment() {
        assert_eq!(normalize("app://open/live?id=7"), "app://open/live");
        assert_eq!(normalize("app://open/live#top"), "app://open/live");
        assert_eq!(normalize("app://open/live#a?b"), "app://open/live");
    }

    #[test]
    fn collapses_slashes() {
        assert_eq!(normalize("app:///open//none/"), "app://open/none");
        assert_eq!(normalize("app://open///a////b"), "app://open/a/b");
        assert_eq!(normalize("a//b"), "a/b");
    }

    #[test]
    fn trims_trailing_slashes_but_not_the_scheme() {
        assert_eq!(normalize("app://open/"), "app://open");
        assert_eq!(normalize("app://open///"), "app://open");
        assert_eq!(normalize("app://"), "app://");
        assert_eq!(normalize("app:////"), "app://");
        assert_eq!(normalize("app:/"), "app:/");
        assert_eq!(normalize("/"), "");
    }

    #[test]
    fn is_idempotent() {
        for url in [
            "app:///open//none/",
            "http://example.com//a/b/?q=1",
            "x:////",
            "//lead//ing//",
            "plain",
            "",
            "a:/b//c:///d/",
        ] {
            let once = normalize(url);
            assert_eq!(normalize(&once), once, "not idempotent for {url:?}");
        }
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(url in "[a-z:/?#]{0,16}") {
            let once = normalize(&url);
            prop_assert_eq!(normalize(&once), once.clone(), "input {:?}", url);
        }
    }

    #[test]
    fn extracts_scheme() {
        assert_eq!(scheme("app://open/live"), Some("app"));
        assert_eq!(scheme("open/live"), None);
        assert_eq!(scheme("open/x://y"), None);
        assert_eq!(scheme("http://<path:_>"), Some("http"));
    }
}
