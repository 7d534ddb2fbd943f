use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use verity_common::Config;
use verity_pipeline::services::collaborators_from_config;
use verity_pipeline::VerificationDispatcher;

#[derive(Parser)]
#[command(name = "verity", about = "Fan a news text out to every verification source")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify a news text and print the aggregated report as JSON
    Verify {
        /// Text to verify. Read from stdin when omitted.
        #[arg(long)]
        text: Option<String>,
        /// Condensed text sent to the services. Defaults to the full text.
        #[arg(long)]
        summary: Option<String>,
    },
    /// Show which API credentials are configured
    CheckEnv,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::CheckEnv => {
            for (key, set) in config.key_status() {
                println!("{key:<26} {}", if set { "set" } else { "missing" });
            }
            let model = if config.model_path.exists() { "found" } else { "missing" };
            println!("{:<26} {model} ({})", "MODEL_PATH", config.model_path.display());
        }
        Command::Verify { text, summary } => {
            config.log_keys();

            let text = match text {
                Some(text) => text,
                None => read_stdin()?,
            };
            if text.trim().is_empty() {
                bail!("No text to verify: pass --text or pipe it on stdin");
            }
            let summary = summary.unwrap_or_else(|| text.clone());

            let dispatcher =
                VerificationDispatcher::from_config(collaborators_from_config(&config), &config);
            let report = dispatcher.run_parallel_verification(&text, &summary).await;
            info!(
                services_successful = report.services_successful,
                services_checked = report.services_checked,
                "Verification finished"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Logs go to stderr so the report on stdout stays machine-readable.
fn init_tracing() -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("verity=info".parse()?);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read text from stdin")?;
    Ok(buf)
}
