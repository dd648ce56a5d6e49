mod pipeline;

use clap::{Parser, Subcommand};
use recap_core::{config, traits::Provider};
use recap_providers::anthropic::AnthropicProvider;
use recap_slack::SlackClient;

#[derive(Parser)]
#[command(
    name = "recap",
    version,
    about = "Slack mention triage agent — a 24-hour recap delivered to your own DMs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one triage run: collect, analyze, deliver.
    Run,
    /// Check credential and provider readiness.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut cfg = config::load(&cli.config)?;
    cfg.apply_env();

    match cli.command {
        Commands::Run => {
            if cfg.slack.user_token.is_empty() {
                anyhow::bail!(
                    "Slack user token missing. Set slack.user_token in config.toml \
                     or the SLACK_USER_TOKEN env var."
                );
            }

            let platform = SlackClient::new(cfg.slack.clone());
            // A missing API key surfaces as an auth failure at the completion
            // endpoint and degrades to the failure notice, so the run is not
            // gated on provider availability here.
            let provider = AnthropicProvider::from_config(cfg.anthropic.clone());

            let outcome = pipeline::run(&platform, &provider, &cfg).await?;
            println!(
                "Recap — {} mention(s) triaged, {} message(s) sent",
                outcome.mentions, outcome.messages_sent
            );
        }
        Commands::Status => {
            println!("Recap — Status Check\n");
            println!("Config: {}", cli.config);
            println!(
                "  slack token: {}",
                if cfg.slack.user_token.is_empty() {
                    "missing"
                } else {
                    "configured"
                }
            );
            println!(
                "  anthropic key: {}",
                if cfg.anthropic.api_key.is_empty() {
                    "missing"
                } else {
                    "configured"
                }
            );
            println!("  model: {}", cfg.anthropic.model);

            let provider = AnthropicProvider::from_config(cfg.anthropic.clone());
            println!(
                "  provider: {}",
                if provider.is_available().await {
                    "available"
                } else {
                    "not available"
                }
            );
        }
    }

    Ok(())
}
