//! Skip patterns for files the renderer must leave untouched.
//! Matched against the base file name only: dotfiles, the Makefile, and
//! compiled bytecode.

use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// File names that are never rendered.
pub const SKIP_PATTERNS: [&str; 3] = [".*", "Makefile", "*.pyc"];

/// Compiles [`SKIP_PATTERNS`] into a matcher over base file names.
pub fn skip_set() -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in SKIP_PATTERNS {
        builder.add(Glob::new(pattern).map_err(|e| {
            Error::SkipPatternError(format!("'{}' failed to compile: {}", pattern, e))
        })?);
    }

    builder
        .build()
        .map_err(|e| Error::SkipPatternError(e.to_string()))
}
