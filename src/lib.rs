//! Charmgen scaffolds a new charm project from a remote template
//! repository: clone, strip repository metadata, relocate the placeholder
//! sources, and render every remaining file with the caller configuration.

/// Command-line interface module for the Charmgen application
pub mod cli;

/// Configuration mapping, derived identifiers, and template bindings
pub mod config;

/// Error types and handling for the Charmgen application
pub mod error;

/// Template repository fetching, stripping, and placeholder relocation
pub mod fetcher;

/// Core charm generation orchestration
/// Combines all components to produce the final output tree
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Template rendering engine seam
pub mod renderer;

/// Skip patterns for files that are never rendered
pub mod skip;
