//! Charmgen's main application entry point and orchestration logic.
//! Handles command-line argument parsing, output directory safety, and
//! wiring of the fetcher, renderer, and prompter into charm generation.

use std::fs;
use std::path::{Path, PathBuf};

use charmgen::{
    cli::{get_args, Args},
    config::load_config,
    error::{default_error_handler, Error, Result},
    fetcher::GitFetcher,
    processor::create_charm,
    prompt::{DialoguerPrompter, Prompter},
    renderer::MiniJinjaRenderer,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Off
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Ensures the output directory is safe for the clone to land in.
///
/// A missing or empty directory is used as-is. A non-empty directory is
/// replaced after confirmation (`force` skips the question); declining
/// fails the run.
fn get_output_dir(
    prompt: &dyn Prompter,
    output_dir: &Path,
    force: bool,
) -> Result<PathBuf> {
    if output_dir.exists() {
        let is_empty = fs::read_dir(output_dir)?.next().is_none();
        if !is_empty {
            let replace = prompt.confirm(
                force,
                format!(
                    "Directory '{}' already exists. Replace it?",
                    output_dir.display()
                ),
            )?;
            if !replace {
                return Err(Error::OutputDirectoryExistsError {
                    output_dir: output_dir.display().to_string(),
                });
            }
            fs::remove_dir_all(output_dir).map_err(Error::IoError)?;
        }
    }

    Ok(output_dir.to_path_buf())
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the caller configuration mapping
/// 2. Validates the output directory
/// 3. Fetches the template and renders the tree
fn run(args: Args) -> Result<()> {
    let engine = MiniJinjaRenderer::new();
    let prompt = DialoguerPrompter::new();
    let fetcher = GitFetcher::new();

    let config = load_config(&args.config)?;
    let output_dir = get_output_dir(&prompt, &args.output_dir, args.force)?;

    create_charm(&fetcher, &engine, &config, &output_dir)?;

    println!("Charm generation completed successfully in {}.", output_dir.display());
    Ok(())
}
