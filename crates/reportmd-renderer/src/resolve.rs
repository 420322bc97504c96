//! Relative URL resolution for links and images.
//!
//! Report markdown references charts and source pages with relative
//! targets; this module resolves them against the document's own
//! location using WHATWG URL semantics, the same join a browser performs
//! against a `<base>` element.

use url::Url;

/// Synthetic origin used to resolve root-relative bases and targets.
///
/// The origin never appears in output: anything resolved against it is
/// stripped back to path + query + fragment.
const LOCAL_ORIGIN: &str = "http://localhost";

/// Resolve a possibly-relative URL against a base document location.
///
/// - An empty `raw_url` stays empty.
/// - An absolute http(s) `base_url` yields the full resolved URL.
/// - A root-relative `base_url` yields a root-relative result.
/// - With no base, a root-relative `raw_url` is normalized in place and
///   anything else is returned unchanged.
///
/// Resolution never fails: a parse or join error returns `raw_url`
/// unchanged, so a malformed target degrades to a broken link rather
/// than a broken render.
#[must_use]
pub fn resolve_url(raw_url: &str, base_url: &str) -> String {
    if raw_url.is_empty() {
        return String::new();
    }

    if !base_url.is_empty() {
        if has_network_scheme(base_url) {
            return match Url::parse(base_url).and_then(|base| base.join(raw_url)) {
                Ok(resolved) => resolved.into(),
                Err(_) => raw_url.to_owned(),
            };
        }
        return match join_local(base_url).and_then(|base| base.join(raw_url)) {
            Ok(resolved) => strip_local_origin(&resolved),
            Err(_) => raw_url.to_owned(),
        };
    }

    if raw_url.starts_with('/') {
        return match join_local(raw_url) {
            Ok(resolved) => strip_local_origin(&resolved),
            Err(_) => raw_url.to_owned(),
        };
    }

    raw_url.to_owned()
}

/// Whether the string starts with an absolute http or https scheme.
fn has_network_scheme(url: &str) -> bool {
    let head = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    head.starts_with("http://") || head.starts_with("https://")
}

/// Join a root-relative path onto the synthetic local origin.
fn join_local(path: &str) -> Result<Url, url::ParseError> {
    Url::parse(LOCAL_ORIGIN).and_then(|origin| origin.join(path))
}

/// Strip the synthetic origin from a resolved URL.
///
/// Targets that escaped the local origin during the join (absolute or
/// protocol-relative) keep their full resolved form.
fn strip_local_origin(resolved: &Url) -> String {
    if resolved.host_str() != Some("localhost") {
        return resolved.as_str().to_owned();
    }
    let mut out = resolved.path().to_owned();
    if let Some(query) = resolved.query() {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = resolved.fragment() {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
