//! Fetching the charm template repository.
//! Clones the remote template with the git client on `PATH`, removes
//! repository metadata that must not appear in the generated charm, and
//! relocates the placeholder sources to package-specific names.

use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Remote skeleton the generated charm is seeded from.
pub const TEMPLATE_URL: &str =
    "https://github.com/chris-sanders/template-python-pytest.git";

/// Entries present in the template repository that are not carried over
/// into the generated charm.
const EXTRA_FILES: [&str; 3] = ["README.md", ".git", ".gitmodules"];

/// Obtains a working copy of a template repository.
///
/// Injectable so tests can substitute a fetcher that materializes a canned
/// directory tree instead of touching the network.
pub trait Fetcher {
    /// Produces the template's contents at `output_dir`.
    fn fetch(&self, repo: &str, output_dir: &Path) -> Result<()>;
}

/// Fetcher that shells out to the git client on `PATH`.
pub struct GitFetcher;

impl GitFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GitFetcher {
    fn default() -> Self {
        GitFetcher::new()
    }
}

impl Fetcher for GitFetcher {
    /// Clones `repo` into `output_dir` as a blocking subprocess.
    ///
    /// # Errors
    /// * `Error::CloneError` if git cannot be started or exits abnormally;
    ///   the message tells the user to install git
    fn fetch(&self, repo: &str, output_dir: &Path) -> Result<()> {
        debug!("Cloning '{}' into '{}'", repo, output_dir.display());

        let status = Command::new("git")
            .arg("clone")
            .arg(repo)
            .arg(output_dir)
            .status()
            .map_err(|e| Error::CloneError {
                repo: repo.to_string(),
                detail: e.to_string(),
            })?;

        if !status.success() {
            return Err(Error::CloneError {
                repo: repo.to_string(),
                detail: format!("git exited with {}", status),
            });
        }

        Ok(())
    }
}

/// Removes the template repository entries listed in [`EXTRA_FILES`].
///
/// Non-symlink directories are removed recursively; files and symlinked
/// entries are removed as single files. Missing entries are skipped.
pub fn strip_extra_files(output_dir: &Path) -> Result<()> {
    for name in EXTRA_FILES {
        let item = output_dir.join(name);
        let metadata = match fs::symlink_metadata(&item) {
            Ok(metadata) => metadata,
            Err(_) => continue,
        };

        debug!("Removing '{}' from the template", item.display());

        if metadata.is_dir() {
            fs::remove_dir_all(&item).map_err(Error::IoError)?;
        } else {
            fs::remove_file(&item).map_err(Error::IoError)?;
        }
    }

    Ok(())
}

/// Relocates the placeholder sources to names derived from the package.
///
/// `package` must already be lower-cased. Both renames are unconditional;
/// a missing placeholder fails the whole run.
pub fn rename_placeholders(output_dir: &Path, package: &str) -> Result<()> {
    let module = package.replace('-', "_");

    let handlers = output_dir.join("reactive").join("handlers.py");
    let reactive_target = output_dir.join("reactive").join(format!("{}.py", module));
    debug!("Renaming '{}' to '{}'", handlers.display(), reactive_target.display());
    fs::rename(&handlers, &reactive_target).map_err(Error::IoError)?;

    let lib = output_dir.join("lib").join("lib.py");
    let lib_target = output_dir.join("lib").join(format!("lib_{}.py", module));
    debug!("Renaming '{}' to '{}'", lib.display(), lib_target.display());
    fs::rename(&lib, &lib_target).map_err(Error::IoError)?;

    Ok(())
}

/// Fetches the template and prepares it for rendering: clone, strip the
/// unwanted entries, relocate the placeholder sources.
pub fn fetch_template(
    fetcher: &dyn Fetcher,
    package: &str,
    output_dir: &Path,
) -> Result<()> {
    fetcher.fetch(TEMPLATE_URL, output_dir)?;
    strip_extra_files(output_dir)?;
    rename_placeholders(output_dir, package)
}
