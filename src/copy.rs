//! Installing backends into the prefix.

use anyhow::{Context, Result};
use filetime::{set_file_times, FileTime};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::executable::for_platform;
use crate::paths::{backend_matcher, find_backends};

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopySummary {
    /// Destination paths written, in copy order.
    pub copied: Vec<PathBuf>,
    /// Total size in bytes of the copied files.
    pub total_bytes: u64,
}

/// Create `<prefix>/bin` (and any missing parents). Safe to call repeatedly.
pub fn ensure_bin_dir(config: &Config) -> Result<PathBuf> {
    let bin_dir = config.bin_dir();
    fs::create_dir_all(&bin_dir)
        .with_context(|| format!("Failed to create directory: {}", bin_dir.display()))?;
    Ok(bin_dir)
}

/// Copy one backend into `dest_dir` under its own base name.
///
/// An existing file or symlink at the destination is replaced. Permissions
/// and access/modification times are carried over from the source. If the
/// destination already resolves to `src` itself, nothing is touched.
///
/// Returns the destination path and the number of bytes copied.
pub fn copy_backend(src: &Path, dest_dir: &Path) -> Result<(PathBuf, u64)> {
    let name = src
        .file_name()
        .with_context(|| format!("Backend path has no file name: {}", src.display()))?;
    let dest = dest_dir.join(name);

    if is_same_file(src, &dest) {
        debug!(path = %src.display(), "backend already in place");
        let len = fs::metadata(src)
            .with_context(|| format!("Failed to read metadata: {}", src.display()))?
            .len();
        return Ok((dest, len));
    }

    if let Ok(meta) = fs::symlink_metadata(&dest) {
        if !meta.is_dir() {
            fs::remove_file(&dest)
                .with_context(|| format!("Failed to replace existing file: {}", dest.display()))?;
        }
    }

    let bytes = fs::copy(src, &dest).with_context(|| {
        format!("Failed to copy {} to {}", src.display(), dest.display())
    })?;

    let src_meta = fs::metadata(src)
        .with_context(|| format!("Failed to read metadata: {}", src.display()))?;
    fs::set_permissions(&dest, src_meta.permissions())
        .with_context(|| format!("Failed to set permissions: {}", dest.display()))?;
    set_file_times(
        &dest,
        FileTime::from_last_access_time(&src_meta),
        FileTime::from_last_modification_time(&src_meta),
    )
    .with_context(|| format!("Failed to set file times: {}", dest.display()))?;

    Ok((dest, bytes))
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Install every backend found under the source root into `<prefix>/bin`.
///
/// The destination directory is created first, even when there is nothing to
/// copy. A missing source root or zero matches is a successful, empty run.
/// The first copy failure aborts the run.
pub fn copy_backends(config: &Config) -> Result<CopySummary> {
    let bin_dir = ensure_bin_dir(config)?;

    let matcher = backend_matcher()?;
    let test = for_platform(config);
    let backends = find_backends(&config.source_root, &matcher, test.as_ref())?;

    let mut summary = CopySummary::default();
    let mut seen: HashSet<OsString> = HashSet::new();

    for src in &backends {
        if let Some(name) = src.file_name() {
            if !seen.insert(name.to_os_string()) {
                warn!(
                    name = %name.to_string_lossy(),
                    path = %src.display(),
                    "duplicate backend name, overwriting earlier copy"
                );
            }
        }

        let (dest, bytes) = copy_backend(src, &bin_dir)?;
        info!(from = %src.display(), to = %dest.display(), bytes, "copied backend");
        summary.copied.push(dest);
        summary.total_bytes += bytes;
    }

    Ok(summary)
}
