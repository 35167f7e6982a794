//! Platform-specific "is this a runnable program" checks.

use std::fs;
use std::path::Path;

use crate::config::{Config, DEFAULT_PATHEXT};

/// Decides whether a candidate file should be installed as a backend.
///
/// Implementations must return `false` for anything that is not a regular
/// file (after following symlinks).
pub trait ExecutableTest {
    fn is_executable(&self, path: &Path) -> bool;
}

/// Pick the test for the platform we are running on.
#[cfg(unix)]
pub fn for_platform(_config: &Config) -> Box<dyn ExecutableTest> {
    Box::new(ModeBits)
}

/// Pick the test for the platform we are running on.
#[cfg(not(unix))]
pub fn for_platform(config: &Config) -> Box<dyn ExecutableTest> {
    Box::new(PathExt::from_config(config))
}

fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// POSIX test: a regular file the current user is allowed to execute.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeBits;

#[cfg(unix)]
impl ExecutableTest for ModeBits {
    fn is_executable(&self, path: &Path) -> bool {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        if !is_regular_file(path) {
            return false;
        }
        let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
            return false;
        };
        // SAFETY: `c_path` is a valid NUL-terminated string for the duration of the call.
        unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 }
    }
}

/// Windows-style test: a regular file whose extension is listed in `PATHEXT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExt {
    extensions: Vec<String>,
}

impl PathExt {
    /// Parse a semicolon-separated list such as `.EXE;.BAT`.
    ///
    /// Matching is case-insensitive. Empty items are dropped so a trailing `;`
    /// does not make extension-less files executable, unlike a plain split
    /// of the Windows variable.
    pub fn from_list(list: &str) -> Self {
        let extensions = list
            .split(';')
            .map(|ext| ext.trim().to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    /// Use `PATHEXT` from `config`, falling back to [`DEFAULT_PATHEXT`].
    pub fn from_config(config: &Config) -> Self {
        Self::from_list(config.path_ext.as_deref().unwrap_or(DEFAULT_PATHEXT))
    }

    fn has_listed_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension() else {
            return false;
        };
        let suffix = format!(".{}", ext.to_string_lossy().to_lowercase());
        self.extensions.iter().any(|known| *known == suffix)
    }
}

impl Default for PathExt {
    fn default() -> Self {
        Self::from_list(DEFAULT_PATHEXT)
    }
}

impl ExecutableTest for PathExt {
    fn is_executable(&self, path: &Path) -> bool {
        is_regular_file(path) && self.has_listed_extension(path)
    }
}
