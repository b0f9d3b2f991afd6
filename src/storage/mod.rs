//! Filesystem mirror storage
//!
//! This module owns the URL-to-path mapping and the write discipline that
//! makes re-runs incremental: a file that exists is never rewritten, and new
//! content always lands at a `.temp` sibling first and is renamed into place
//! so no reader (and no interrupted run) ever observes a half-written file.

mod housekeeping;

pub use housekeeping::{remove_empty_dirs, remove_temp_files};

use crate::resource::Resource;
use crate::url::{decompose, decompose_reference, UrlParts};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix for staged writes; strays are swept by housekeeping
pub const TEMP_SUFFIX: &str = ".temp";

/// File name under which directory pages (the root page, extension-less
/// paths) are stored inside their directory
pub const DIRECTORY_PAGE_FILE: &str = "index";

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Unmappable path for {0}")]
    InvalidPath(String),
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Handle on the mirror root directory
///
/// Cheap to clone; all operations are plain blocking filesystem calls, safe
/// under concurrent workers (directory creation tolerates the benign
/// already-exists race).
#[derive(Debug, Clone)]
pub struct MirrorStore {
    root: PathBuf,
}

impl MirrorStore {
    /// Opens a store rooted at `root`, creating the directory if absent
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        if !root.is_dir() {
            fs::create_dir_all(&root).map_err(|e| StorageError::io(&root, e))?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local file a page body is stored at
    ///
    /// Directory pages map to an `index` file inside their directory so that
    /// every page has a real file — this is what the cache-hit test probes.
    pub fn page_path(&self, parts: &UrlParts) -> PathBuf {
        let mut path = self.root.clone();
        for segment in &parts.full_path {
            path.push(segment);
        }
        if parts.file_name.is_empty() {
            path.push(DIRECTORY_PAGE_FILE);
        } else {
            path.push(&parts.file_name);
        }
        path
    }

    /// Local file a media asset is stored at
    ///
    /// A relative raw reference nests under the referring page's directory
    /// chain; an absolute reference roots directly under the mirror root via
    /// its own decomposition. Dot segments in a relative reference resolve
    /// against the base chain, matching how the fetch URL resolves them, and
    /// can never climb above the mirror root.
    pub fn media_path(
        &self,
        base: &UrlParts,
        resource: &Resource,
    ) -> Result<(PathBuf, Vec<String>), StorageError> {
        let ref_parts = decompose_reference(&resource.raw);
        let (dirs, file_name) = if ref_parts.host.is_empty() {
            let mut dirs = base.full_path.clone();
            for segment in &ref_parts.full_path {
                match segment.as_str() {
                    "." => {}
                    ".." => {
                        dirs.pop();
                    }
                    _ => dirs.push(segment.clone()),
                }
            }
            (dirs, ref_parts.file_name)
        } else {
            let parts = decompose(&resource.url);
            (parts.full_path, parts.file_name)
        };

        if file_name.is_empty() {
            return Err(StorageError::InvalidPath(resource.url.to_string()));
        }

        let mut path = self.root.clone();
        for segment in &dirs {
            path.push(segment);
        }
        path.push(&file_name);
        Ok((path, dirs))
    }

    /// Creates every directory along `full_path` under the root
    ///
    /// Idempotent. A regular file squatting where a directory must exist is
    /// deleted and replaced: the directory structure takes precedence over a
    /// stray file left by a previous run.
    pub fn ensure_directories(&self, full_path: &[String]) -> Result<(), StorageError> {
        let mut path = self.root.clone();
        for segment in full_path {
            if segment.is_empty() {
                continue;
            }
            path.push(segment);

            if path.exists() && !path.is_dir() {
                tracing::debug!("Replacing stray file with directory: {}", path.display());
                fs::remove_file(&path).map_err(|e| StorageError::io(&path, e))?;
            }

            if let Err(e) = fs::create_dir(&path) {
                // Tolerate concurrent creation of a shared prefix
                if e.kind() != std::io::ErrorKind::AlreadyExists {
                    return Err(StorageError::io(&path, e));
                }
            }
        }
        Ok(())
    }

    /// Writes `content` to `path` unless a file is already there
    ///
    /// Returns whether a write happened. New content is staged at the
    /// `.temp` sibling and renamed into place; existing files are left
    /// byte-for-byte untouched. The staging file is opened create-new: a
    /// staged sibling that already exists means another worker holds this
    /// path, and the write is skipped. The caller must have created the
    /// parent directories first.
    pub fn write_if_absent(&self, path: &Path, content: &str) -> Result<bool, StorageError> {
        use std::io::Write;

        if path.is_file() {
            return Ok(false);
        }

        let staged = Self::stage_path(path);
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&staged)
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(StorageError::io(&staged, e)),
        };

        file.write_all(content.as_bytes())
            .map_err(|e| StorageError::io(&staged, e))?;
        drop(file);

        fs::rename(&staged, path).map_err(|e| StorageError::io(path, e))?;
        Ok(true)
    }

    /// The `.temp` sibling a write is staged at
    pub fn stage_path(path: &Path) -> PathBuf {
        let mut staged = path.as_os_str().to_owned();
        staged.push(TEMP_SUFFIX);
        PathBuf::from(staged)
    }

    /// Moves a finished staged file to its final path
    pub fn promote(staged: &Path, path: &Path) -> Result<(), StorageError> {
        fs::rename(staged, path).map_err(|e| StorageError::io(path, e))
    }
}
