//! Mirror-tree housekeeping
//!
//! A crawl can leave two kinds of debris behind: `.temp` staging files from
//! interrupted writes, and directory chains created for pages that then
//! failed to produce any content. Temps are swept before a run (so stale
//! stages never shadow a retry) and both are swept after.

use super::TEMP_SUFFIX;
use std::fs;
use std::io;
use std::path::Path;

/// Removes every `.temp` staging file under `path`, returning the count
pub fn remove_temp_files(path: &Path) -> io::Result<usize> {
    if !path.is_dir() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let entry_path = entry.path();
        if entry_path.is_dir() {
            count += remove_temp_files(&entry_path)?;
        } else if entry_path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(TEMP_SUFFIX))
        {
            tracing::debug!("Removing stray temp file: {}", entry_path.display());
            fs::remove_file(&entry_path)?;
            count += 1;
        }
    }

    Ok(count)
}

/// Removes empty directories under (and including) `path`, returning the count
pub fn remove_empty_dirs(path: &Path) -> io::Result<usize> {
    if !path.is_dir() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in fs::read_dir(path)? {
        let entry_path = entry?.path();
        if entry_path.is_dir() {
            count += remove_empty_dirs(&entry_path)?;
        }
    }

    // Children may have emptied this directory
    if fs::read_dir(path)?.next().is_none() {
        tracing::debug!("Removing empty folder: {}", path.display());
        fs::remove_dir(path)?;
        count += 1;
    }

    Ok(count)
}
