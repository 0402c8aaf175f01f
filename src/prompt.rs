use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::Cli;

/// Inline prompt keys are truncated to this many characters for display.
const KEY_MAX_CHARS: usize = 30;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("failed to read prompt file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The effective prompts for a run, plus a short display key.
#[derive(Debug, Clone)]
pub struct ResolvedPrompt {
    pub user_prompt: String,
    pub system_prompt: Option<String>,
    /// Display label: file base name, or a truncated inline prompt.
    pub key: String,
}

impl ResolvedPrompt {
    /// Resolve the user and system prompts from the CLI arguments.
    ///
    /// The inline-XOR-file constraints are enforced by clap, so exactly
    /// one user prompt source and at most one system prompt source reach
    /// this point. File errors surface before any model is called.
    pub fn from_cli(cli: &Cli) -> Result<Self, PromptError> {
        let (user_prompt, key) = if let Some(path) = &cli.user_prompt_file {
            let path = expand_home(path);
            let text = read_prompt_file(&path)?;
            (text, base_name(&path))
        } else {
            // clap guarantees one of the pair is present
            let text = cli.user_prompt.clone().unwrap_or_default();
            let key = inline_key(&text);
            (text, key)
        };

        let system_prompt = if let Some(path) = &cli.system_prompt_file {
            let path = expand_home(path);
            Some(read_prompt_file(&path)?)
        } else {
            cli.system_prompt.clone()
        };

        Ok(Self {
            user_prompt,
            system_prompt,
            key,
        })
    }
}

fn read_prompt_file(path: &Path) -> Result<String, PromptError> {
    fs::read_to_string(path).map_err(|source| PromptError::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// First 30 characters of the prompt, with a trailing ellipsis marker
/// when truncated. Character-based so multi-byte prompts stay intact.
fn inline_key(prompt: &str) -> String {
    let mut key: String = prompt.chars().take(KEY_MAX_CHARS).collect();
    if prompt.chars().count() > KEY_MAX_CHARS {
        key.push_str("...");
    }
    key
}
