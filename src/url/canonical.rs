use crate::url::parts::{decompose, split_authority};
use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a raw reference into its canonical `scheme://host/path` form
///
/// The canonical string is the join key for everything downstream — the
/// seen-set, the cache-hit test, and the storage path all compare it
/// bit-for-bit — so this function is idempotent: cleaning an already
/// canonical URL returns it unchanged.
///
/// Rules:
/// - surrounding whitespace is trimmed; an empty value is invalid
/// - a missing scheme is inferred as `http` (protocol-relative `//host/..`
///   references keep their host; anything else becomes a path under
///   `http://`)
/// - query string and fragment are dropped
/// - a URL without a usable host is invalid and yields no canonical form
pub fn clean(raw: &str) -> UrlResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::EmptyReference);
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else if trimmed.starts_with("//") {
        format!("http:{}", trimmed)
    } else {
        format!("http://{}", trimmed)
    };

    let mut url = Url::parse(&candidate)
        .map_err(|e| UrlError::Parse(format!("'{}': {}", trimmed, e)))?;

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(trimmed.to_string()));
    }

    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Resolves a reference against the page that contained it
///
/// A reference that already carries a host component is absolute and is
/// returned unchanged. Anything else joins against the directory-style form
/// of the base page: its authority plus its directory segments, with exactly
/// one trailing `/`. An extension-less final segment of the base counts as a
/// directory, so `x` seen on `http://h/a/b` resolves to `http://h/a/b/x`,
/// while the same reference on `http://h/a/b.html` resolves to
/// `http://h/a/x`.
///
/// The directory-style base keeps the base URL's scheme and port so that
/// resolved references remain fetchable; only the filesystem mapping strips
/// ports.
pub fn resolve_absolute(base: &Url, raw: &str) -> UrlResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::EmptyReference);
    }

    if split_authority(trimmed).is_some() {
        // Already absolute
        return Ok(trimmed.to_string());
    }

    let parts = decompose(base);
    let mut dir = format!("{}://{}", base.scheme(), parts.host);
    for segment in &parts.path_segments {
        dir.push('/');
        dir.push_str(segment);
    }
    if !dir.ends_with('/') {
        dir.push('/');
    }

    let base_dir =
        Url::parse(&dir).map_err(|e| UrlError::Parse(format!("'{}': {}", dir, e)))?;
    let joined = base_dir
        .join(trimmed)
        .map_err(|e| UrlError::Parse(format!("'{}' against '{}': {}", trimmed, dir, e)))?;

    Ok(joined.to_string())
}

/// Resolves a raw reference against its page and normalizes the result
pub fn canonicalize(base: &Url, raw: &str) -> UrlResult<Url> {
    let absolute = resolve_absolute(base, raw)?;
    clean(&absolute)
}

/// Scheme detection for raw references: `name:` where name is an ASCII
/// letter followed by letters, digits, `+`, `-` or `.`
fn has_scheme(s: &str) -> bool {
    match s.find(':') {
        Some(idx) if idx > 0 => {
            let scheme = &s[..idx];
            scheme
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}
