/// Decides whether a canonical URL is eligible for crawling or downloading
///
/// A URL is in scope iff some allowed-domain entry is a substring of the
/// URL, no blocked entry is a substring of the URL, and the URL contains no
/// `@` (mail references are never crawl targets).
///
/// The substring semantics are deliberate: they admit subdomains and
/// path-embedded domain mirrors without a public-suffix list. The cost is
/// false positives when an allowed string happens to appear inside an
/// unrelated path segment; that is a documented limitation of this filter,
/// not something callers should compensate for.
pub fn is_in_scope(url: &str, allowed_domains: &[String], blocked_substrings: &[String]) -> bool {
    if url.contains('@') {
        return false;
    }

    if !allowed_domains.iter().any(|d| url.contains(d.as_str())) {
        return false;
    }

    !blocked_substrings.iter().any(|b| url.contains(b.as_str()))
}
