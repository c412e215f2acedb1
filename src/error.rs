//! Error handling for the Charmgen application.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use thiserror::Error;

/// All failure modes of a charm generation run.
///
/// Nothing is caught and recovered internally; every variant propagates to
/// the caller, which owns retry and reporting policy.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Represents errors that occur during template rendering
    #[error("Template error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    /// The external git client could not be started or the clone failed
    #[error(
        "Failed to clone the charm template from '{repo}'. \
         Please make sure you have git installed on your system.\n{detail}"
    )]
    CloneError { repo: String, detail: String },

    /// Represents errors in the caller-supplied configuration mapping
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A skip pattern failed to compile into a glob
    #[error("Skip pattern error: {0}")]
    SkipPatternError(String),

    /// The output directory exists, is non-empty, and replacement was declined
    #[error("Output directory '{output_dir}' already exists. Use --force to replace it.")]
    OutputDirectoryExistsError { output_dir: String },

    /// An interactive confirmation could not be read
    #[error("Prompt error: {0}")]
    PromptError(String),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("{}", err);
    std::process::exit(1);
}
