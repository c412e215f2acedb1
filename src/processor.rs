//! Core charm generation orchestration.
//! Combines the fetcher, the skip set, and the renderer into the single
//! `create_charm` operation, and implements the in-place file rendering
//! with atomic replacement.

use log::debug;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::{
    config::{derive_names, package_name, template_context, Config},
    error::{Error, Result},
    fetcher::{fetch_template, Fetcher},
    renderer::TemplateRenderer,
    skip::skip_set,
};

/// Generates a charm into `output_dir`.
///
/// Fetches the template, then renders every regular file in the tree with
/// the caller configuration plus the derived identifiers. Derived names
/// are computed once for the whole run; the caller's mapping is read-only.
///
/// # Errors
/// Any fetch, traversal, render, or replacement failure aborts the run.
pub fn create_charm(
    fetcher: &dyn Fetcher,
    engine: &dyn TemplateRenderer,
    config: &Config,
    output_dir: &Path,
) -> Result<()> {
    let package = package_name(config)?;
    let names = derive_names(&package);
    let context = template_context(config, &names)?;
    let skip = skip_set()?;

    fetch_template(fetcher, &package, output_dir)?;

    for entry in WalkDir::new(output_dir) {
        let entry = entry.map_err(|e| Error::IoError(e.into()))?;
        if entry.file_type().is_dir() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if skip.is_match(file_name.as_ref()) {
            debug!("Skipping '{}'", entry.path().display());
            continue;
        }

        render_file(engine, &context, entry.path())?;
    }

    Ok(())
}

/// Renders a single file in place, preserving its permission bits.
///
/// Symbolic links are never rewritten; their targets, if also in-tree, are
/// rendered independently. The rendered text goes to a temporary file in
/// the same directory (permissions set before content is written) which is
/// then renamed over the original in one atomic step, so the path always
/// holds either the complete old text or the complete new text.
pub fn render_file(
    engine: &dyn TemplateRenderer,
    context: &serde_json::Value,
    path: &Path,
) -> Result<()> {
    if fs::symlink_metadata(path)?.file_type().is_symlink() {
        debug!("Leaving symlink '{}' untouched", path.display());
        return Ok(());
    }

    let permissions = fs::metadata(path)?.permissions();
    let source = fs::read_to_string(path)?;
    let rendered = engine.render(&source, context)?;

    debug!("Rendering '{}'", path.display());

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut output = NamedTempFile::new_in(dir)?;
    fs::set_permissions(output.path(), permissions)?;
    output.write_all(rendered.as_bytes())?;
    output.persist(path).map_err(|e| Error::IoError(e.error))?;

    Ok(())
}
