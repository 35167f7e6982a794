//! Backend discovery in the build cache.

use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::BACKEND_PATTERN;
use crate::executable::ExecutableTest;

/// Compile the base-name matcher for backend executables (`pixi-build*`).
pub fn backend_matcher() -> Result<GlobMatcher> {
    let glob = Glob::new(BACKEND_PATTERN)
        .with_context(|| format!("Invalid backend pattern: {}", BACKEND_PATTERN))?;
    Ok(glob.compile_matcher())
}

/// Find backends anywhere under `source_root`.
///
/// An entry qualifies when its base name matches `matcher` and `test` accepts
/// it. Directories are visited in sorted order so results are deterministic.
/// Symlinked directories are not descended into.
///
/// Returns an empty list if `source_root` is missing or not a directory.
/// Directories that cannot be read, the root included, are skipped with a
/// warning.
#[must_use = "found backends should be copied"]
pub fn find_backends(
    source_root: &Path,
    matcher: &GlobMatcher,
    test: &dyn ExecutableTest,
) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    if !source_root.is_dir() {
        debug!(root = %source_root.display(), "source root missing, nothing to scan");
        return Ok(found);
    }

    match sorted_entries(source_root) {
        Ok(entries) => walk(entries, matcher, test, &mut found),
        Err(err) => warn!(
            root = %source_root.display(),
            error = %err,
            "skipping unreadable source root"
        ),
    }

    Ok(found)
}

fn walk(
    entries: Vec<DirEntry>,
    matcher: &GlobMatcher,
    test: &dyn ExecutableTest,
    found: &mut Vec<PathBuf>,
) {
    for entry in entries {
        let path = entry.path();

        if matcher.is_match(Path::new(&entry.file_name())) {
            if test.is_executable(&path) {
                found.push(path.clone());
            } else {
                debug!(path = %path.display(), "skipping non-executable match");
            }
        }

        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            match sorted_entries(&path) {
                Ok(children) => walk(children, matcher, test, found),
                Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable directory"),
            }
        }
    }
}

fn sorted_entries(dir: &Path) -> std::io::Result<Vec<DirEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(err) => warn!(dir = %dir.display(), error = %err, "skipping unreadable entry"),
        }
    }
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}
