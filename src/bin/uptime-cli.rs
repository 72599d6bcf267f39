use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;
use url::Url;

use uptime_monitor::health::{HttpPoller, PollOutcome, Probe, SuccessCriterion};

#[derive(Parser)]
#[command(name = "uptime-cli")]
#[command(about = "Operator CLI for the uptime monitor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a running monitor's current belief
    Status {
        /// Base URL of the monitor's status page
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
    /// Poll a target once, exactly like the scheduler would
    Probe {
        /// Health-check URL
        target: Url,

        /// Request timeout in seconds
        #[arg(short, long, default_value_t = 10)]
        timeout: u64,

        /// Exact status code that counts as success
        #[arg(long)]
        expect_status: Option<u16>,

        /// Substring the body must contain
        #[arg(long)]
        expect_body: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status { url } => match fetch_status(&url).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Probe {
            target,
            timeout,
            expect_status,
            expect_body,
        } => {
            let criterion = SuccessCriterion {
                status: expect_status,
                body_contains: expect_body,
            };
            let poller = HttpPoller::new(target, Duration::from_secs(timeout), criterion);

            match poller.check().await {
                PollOutcome::Success => {
                    println!("reachable");
                    ExitCode::SUCCESS
                }
                PollOutcome::Failure { detail } => {
                    println!("unreachable: {}", detail);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

async fn fetch_status(base: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/status", base.trim_end_matches('/')))
        .query(&[("format", "json")])
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        return Err(format!("status page returned {}: {}", status, text).into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
