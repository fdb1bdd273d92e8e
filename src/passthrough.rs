//! Passthrough copy of static assets.
//!
//! Each configured path is relative to the source root and lands at the same
//! relative path in the output:
//!
//! ```text
//! src/assets/images/logo.png  →  _site/assets/images/logo.png
//! src/robots.txt              →  _site/robots.txt
//! ```
//!
//! Directories are copied recursively. Configured paths that don't exist are
//! skipped and reported, so a fresh site without images still builds.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What a passthrough run did, for CLI output.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PassthroughReport {
    /// Configured paths that were copied, with the number of files each contributed
    pub copied: Vec<(String, usize)>,
    /// Configured paths missing from the source root
    pub missing: Vec<String>,
}

impl PassthroughReport {
    pub fn file_count(&self) -> usize {
        self.copied.iter().map(|(_, n)| n).sum()
    }
}

/// Copy every configured path from `source` into `output`.
pub fn copy_all(
    source: &Path,
    output: &Path,
    paths: &[String],
) -> Result<PassthroughReport, (PathBuf, io::Error)> {
    let mut report = PassthroughReport::default();
    for rel in paths {
        let src = source.join(rel);
        if !src.exists() {
            report.missing.push(rel.clone());
            continue;
        }
        let count = copy_path(&src, &output.join(rel)).map_err(|e| (src.clone(), e))?;
        report.copied.push((rel.clone(), count));
    }
    Ok(report)
}

/// Copy a file or directory tree, returning the number of files written.
fn copy_path(src: &Path, dst: &Path) -> io::Result<usize> {
    if src.is_file() {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dst)?;
        return Ok(1);
    }

    let mut count = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(io::Error::other)?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            count += 1;
        }
    }
    Ok(count)
}
