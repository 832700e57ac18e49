use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::collection::error::{CollectionError, Result};

/// Evenly subsample an oversized image directory in place.
///
/// When the directory holds more than `max_count` files, keep the files at
/// positions `round(i * (n-1)/(max_count-1))` (away-from-zero rounding) in
/// insertion order and delete the rest, so the retained set spans the whole
/// capture timeline instead of truncating its tail. Directories at or under
/// the bound are left untouched.
///
/// `max_count` must be at least 2. Returns the number of deleted files.
pub fn trim(dir: &Path, max_count: usize) -> Result<usize> {
    if max_count < 2 {
        return Err(CollectionError::InvalidBound(max_count));
    }
    if !dir.is_dir() {
        return Err(CollectionError::NotADirectory(dir.to_path_buf()));
    }

    let files = list_in_insertion_order(dir)?;
    let n = files.len();
    if n <= max_count {
        return Ok(0);
    }

    let step = (n - 1) as f64 / (max_count - 1) as f64;
    let keep: HashSet<usize> = (0..n)
        .map(|i| (i as f64 * step).round() as usize)
        .filter(|&pos| pos < n)
        .collect();

    let mut deleted = 0;
    for (pos, file) in files.iter().enumerate() {
        if !keep.contains(&pos) {
            fs::remove_file(file)?;
            deleted += 1;
        }
    }

    info!(
        "trimmed {} to {} files ({} deleted)",
        dir.display(),
        n - deleted,
        deleted
    );
    Ok(deleted)
}

/// List regular files in insertion order.
///
/// Collection files are named by their assigned index, so insertion order is
/// numeric order of the file stem. Non-numeric names sort after, by name.
fn list_in_insertion_order(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();

    files.sort_by_key(|path| (stem_index(path).unwrap_or(u64::MAX), path.clone()));
    Ok(files)
}

fn stem_index(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.parse().ok()
}
