//! Environment-driven configuration.

use anyhow::{bail, Result};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Build cache scanned for backends, relative to the working directory.
pub const SOURCE_ROOT: &str = "../../target-cache";

/// Base-name pattern a backend executable must match.
pub const BACKEND_PATTERN: &str = "pixi-build*";

/// Extensions treated as executable when `PATHEXT` is not set.
pub const DEFAULT_PATHEXT: &str = ".EXE;.BAT;.CMD;.COM;.PS1";

/// Settings for one run, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Installation prefix; backends land in `<prefix>/bin`.
    pub prefix: PathBuf,
    /// Directory searched recursively for backends.
    pub source_root: PathBuf,
    /// Raw `PATHEXT` value, if any. Only used by the extension-based test.
    pub path_ext: Option<String>,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var_os(key))
    }

    /// Read the configuration through `lookup`.
    ///
    /// Fails when `PREFIX` is absent or empty. Nothing is touched on disk.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let prefix = match lookup("PREFIX") {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => bail!("$PREFIX is not set"),
        };

        let path_ext = lookup("PATHEXT").map(|value| value.to_string_lossy().into_owned());

        Ok(Self {
            prefix,
            source_root: PathBuf::from(SOURCE_ROOT),
            path_ext,
        })
    }

    /// Directory the backends are copied into.
    pub fn bin_dir(&self) -> PathBuf {
        self.prefix.join("bin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let vars: HashMap<String, OsString> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_prefix_required() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("PREFIX"), "got: {}", err);
    }

    #[test]
    fn test_empty_prefix_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("PREFIX", "")])).is_err());
    }

    #[test]
    fn test_bin_dir_under_prefix() {
        let config = Config::from_lookup(lookup_from(&[("PREFIX", "/opt/env")])).unwrap();
        assert_eq!(config.bin_dir(), Path::new("/opt/env/bin"));
        assert_eq!(config.source_root, Path::new(SOURCE_ROOT));
        assert_eq!(config.path_ext, None);
    }

    #[test]
    fn test_pathext_passed_through() {
        let config =
            Config::from_lookup(lookup_from(&[("PREFIX", "p"), ("PATHEXT", ".EXE;.PY")])).unwrap();
        assert_eq!(config.path_ext.as_deref(), Some(".EXE;.PY"));
    }
}
