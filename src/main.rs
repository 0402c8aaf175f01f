use anyhow::Result;
use log::debug;

use llm_probe::{
    logging, record, Cli, CompletionClient, ProbeConfig, ProbeRunner, ResolvedPrompt, RunRecord,
};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Pick up API credentials from a local .env file if present.
    dotenvy::dotenv().ok();

    let _drain = logging::init(cli.verbose);

    // Resolve prompts before anything touches the network.
    let prompt = ResolvedPrompt::from_cli(&cli)?;
    let config = ProbeConfig::from_env();
    debug!("endpoint: {}", config.base_url);

    // Model calls run strictly one after another.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(cli, config, prompt))
}

async fn run(cli: Cli, config: ProbeConfig, prompt: ResolvedPrompt) -> Result<()> {
    let client = CompletionClient::new(&config)?;
    let runner = ProbeRunner::new(client, cli.models.clone(), prompt);

    let results = runner.run().await;

    let prompt = runner.prompt();
    let record = RunRecord::new(
        prompt.user_prompt.clone(),
        prompt.system_prompt.clone(),
        prompt.key.clone(),
        results,
    );

    let path = record::write_record(&cli.output_dir, &record)?;
    println!("Results saved to {}", path.display());

    Ok(())
}
