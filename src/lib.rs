//! Backend installation helper.
//!
//! Finds every `pixi-build*` executable under the build cache and copies it
//! into `$PREFIX/bin`. The layout of the build cache does not matter: matches
//! are discovered recursively and placed flat in the destination.

mod config;
mod copy;
mod executable;
mod paths;

pub use config::{Config, BACKEND_PATTERN, DEFAULT_PATHEXT, SOURCE_ROOT};
pub use copy::{copy_backend, copy_backends, ensure_bin_dir, CopySummary};
#[cfg(unix)]
pub use executable::ModeBits;
pub use executable::{for_platform, ExecutableTest, PathExt};
pub use paths::{backend_matcher, find_backends};
