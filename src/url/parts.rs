use url::Url;

/// Filesystem-oriented decomposition of a URL
///
/// `full_path` is the directory chain the URL maps to under the mirror root:
/// the authority followed by the directory path segments, with any
/// `:`-suffix stripped from every segment so the result is safe as a
/// directory name. `file_name` is the last path segment only when it
/// contains a `.`; an extension-less last segment is a directory, and the
/// empty `file_name` marks the page as a directory page (the root page being
/// the canonical example).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    /// Authority as written in the URL, port included
    pub host: String,

    /// Directory path segments (the file name, when present, is excluded)
    pub path_segments: Vec<String>,

    /// Last path segment when it carries an extension, empty otherwise
    pub file_name: String,

    /// `[host] + path_segments`, each segment cut at the first `:`
    pub full_path: Vec<String>,
}

impl UrlParts {
    /// True for pages whose body maps to the directory itself (no dotted
    /// final segment), including the site root.
    pub fn is_directory_page(&self) -> bool {
        self.file_name.is_empty()
    }
}

/// Decomposes a parsed URL into its mirror-path parts
pub fn decompose(url: &Url) -> UrlParts {
    let authority = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };

    decompose_parts(&authority, url.path())
}

/// Decomposes a raw reference string, which may lack a host entirely
///
/// Relative references ("logo.png", "img/photo.jpg") decompose with an
/// empty host; their `full_path` holds just the directory segments, so the
/// caller can nest them under the referring page. Query strings and
/// fragments are cut before splitting.
pub fn decompose_reference(raw: &str) -> UrlParts {
    let cut = raw
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    match split_authority(cut) {
        Some((authority, path)) => decompose_parts(authority, path),
        None => decompose_parts("", cut),
    }
}

/// Splits `scheme://host/path` or `//host/path` into authority and path
///
/// Returns None for references without a host component, mirroring how a
/// generic URL split leaves the netloc empty for scheme-less relatives.
pub(crate) fn split_authority(s: &str) -> Option<(&str, &str)> {
    let rest = if let Some(idx) = s.find("://") {
        &s[idx + 3..]
    } else if let Some(stripped) = s.strip_prefix("//") {
        stripped
    } else {
        return None;
    };

    let end = rest.find('/').unwrap_or(rest.len());
    let authority = &rest[..end];
    if authority.is_empty() {
        None
    } else {
        Some((authority, &rest[end..]))
    }
}

fn decompose_parts(authority: &str, path: &str) -> UrlParts {
    if path.is_empty() || path == "/" {
        // Root-page sentinel
        return UrlParts {
            host: authority.to_string(),
            path_segments: Vec::new(),
            file_name: String::new(),
            full_path: strip_segments(std::iter::once(authority)),
        };
    }

    let mut segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    // The last segment names a file only if it carries an extension
    let file_name = if segments.last().is_some_and(|s| s.contains('.')) {
        segments.pop().unwrap_or_default()
    } else {
        String::new()
    };

    let full_path = strip_segments(
        std::iter::once(authority).chain(segments.iter().map(String::as_str)),
    );

    UrlParts {
        host: authority.to_string(),
        path_segments: segments,
        file_name,
        full_path,
    }
}

/// Cuts each segment at the first `:` and drops segments that vanish
fn strip_segments<'a>(segments: impl Iterator<Item = &'a str>) -> Vec<String> {
    segments
        .filter(|s| !s.is_empty())
        .map(|s| s.split(':').next().unwrap_or_default().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
