use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "llm-probe")]
#[command(author, version, about = "Send one prompt to multiple LLM backends and record responses, cost, and latency", long_about = None)]
#[command(group(
    ArgGroup::new("user")
        .required(true)
        .args(["user_prompt", "user_prompt_file"])
))]
#[command(group(
    ArgGroup::new("system").args(["system_prompt", "system_prompt_file"])
))]
pub struct Cli {
    /// Provide the user prompt directly
    #[arg(long)]
    pub user_prompt: Option<String>,

    /// Read the user prompt from a file
    #[arg(long)]
    pub user_prompt_file: Option<PathBuf>,

    /// Provide the system prompt directly
    #[arg(long)]
    pub system_prompt: Option<String>,

    /// Read the system prompt from a file
    #[arg(long)]
    pub system_prompt_file: Option<PathBuf>,

    /// Comma-separated list of model identifiers to query
    #[arg(long, value_delimiter = ',', default_value = "openai/gpt-4o-mini")]
    pub models: Vec<String>,

    /// Directory where run records are written
    #[arg(long, default_value = "outputs")]
    pub output_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
