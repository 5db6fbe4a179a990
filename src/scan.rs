//! Directory tree scanning.
//!
//! Directories are listed depth-first in pre-order; files are listed per
//! directory, root first. Entries of one directory are visited in ascending
//! file name order so the same tree always produces the same image.
//! Symlinks are followed; a link loop is reported as an error.

use std::io;
use std::iter;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ImageError, Result};
use crate::layout::FileEntry;

fn walk_error(dir: &Path, err: walkdir::Error) -> ImageError {
    let path = err.path().unwrap_or(dir).to_path_buf();
    ImageError::io(path, io::Error::from(err))
}

/// All directories below `root`, each one followed by its own subtree.
pub fn list_directories(root: &Path) -> Result<Vec<PathBuf>> {
    let mut directories = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .min_depth(1)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if entry.file_type().is_dir() {
            directories.push(entry.into_path());
        }
    }
    Ok(directories)
}

/// Files directly in `root`, then files directly in each of `directories` in order.
pub fn list_files(root: &Path, directories: &[PathBuf]) -> Result<Vec<FileEntry>> {
    let mut files = Vec::new();
    for dir in iter::once(root).chain(directories.iter().map(PathBuf::as_path)) {
        let walker = WalkDir::new(dir)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| walk_error(dir, e))?;
            if entry.file_type().is_file() {
                files.push(FileEntry::new(entry.into_path()));
            }
        }
    }
    Ok(files)
}
