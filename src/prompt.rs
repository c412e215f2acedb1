//! User confirmation prompts.

use crate::error::{Error, Result};
use dialoguer::Confirm;

/// Trait for interactive confirmations, injectable for tests.
pub trait Prompter {
    /// Asks the user a yes/no question; `skip` answers yes without asking.
    fn confirm(&self, skip: bool, message: String) -> Result<bool>;
}

/// Prompter backed by dialoguer's terminal dialogs.
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        DialoguerPrompter::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, skip: bool, message: String) -> Result<bool> {
        if skip {
            return Ok(true);
        }

        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .map_err(|e| Error::PromptError(e.to_string()))
    }
}
