use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use llm_probe::{logging, webui};

#[derive(Parser, Debug)]
#[command(name = "llm-probe-web")]
#[command(author, version, about = "Browse saved llm-probe run records in a browser", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:5000")]
    listen: SocketAddr,

    /// Directory containing run records
    #[arg(long, default_value = "outputs")]
    output_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _drain = logging::init(cli.verbose);

    webui::start_server(cli.listen, cli.output_dir).await;

    Ok(())
}
