//! Resource classification: media asset or followable link
//!
//! After canonicalization and scope filtering, every surviving reference is
//! either a media asset (downloaded as bytes, never parsed) or a link
//! (another page to crawl). The split is a file-extension heuristic over the
//! canonical URL's file name.

mod extensions;

pub use extensions::MEDIA_EXTENSIONS;

use crate::url::decompose;
use url::Url;

/// What to do with a discovered reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Binary asset: streamed to disk, never crawled
    Media,
    /// Page: crawled for further references
    Link,
}

/// A discovered reference that survived canonicalization
///
/// `raw` is kept alongside the canonical URL because the storage mapping
/// needs it: a relative raw reference nests under the referring page's
/// directory, an absolute one roots under the mirror root.
#[derive(Debug, Clone)]
pub struct Resource {
    /// The attribute value as found in the document
    pub raw: String,

    /// Canonical form, the dedup/cache/storage key
    pub url: Url,

    pub kind: ResourceKind,
}

impl Resource {
    pub fn new(raw: String, url: Url) -> Self {
        let kind = classify_url(&url);
        Self { raw, url, kind }
    }
}

/// Classifies a canonical URL by its file name's extension
///
/// The match is containment of `.{ext}` in the file name (ASCII
/// case-insensitive), so `data.csv.bak` and `ARCHIVE.ZIP` both count as
/// media. Directory pages have no file name and are always links.
pub fn classify_url(url: &Url) -> ResourceKind {
    let file_name = decompose(url).file_name.to_ascii_lowercase();
    if file_name.is_empty() {
        return ResourceKind::Link;
    }

    for ext in MEDIA_EXTENSIONS {
        if file_name.contains(&format!(".{}", ext)) {
            return ResourceKind::Media;
        }
    }

    ResourceKind::Link
}

/// Partitions resources into media assets and links, preserving order
pub fn classify(resources: Vec<Resource>) -> (Vec<Resource>, Vec<Resource>) {
    resources
        .into_iter()
        .partition(|r| r.kind == ResourceKind::Media)
}
