//! coursepace - course progress status service.
//!
//! Serves the progress evaluation API, or evaluates a single request offline.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use coursepace_api::{validate_fields, ProgressServer, RequestFields, ServerConfig};
use coursepace_core::{Clock, FixedClock, SystemClock};
use coursepace_progress::ProgressEvaluator;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coursepace")]
#[command(about = "Course progress status service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Listen address for the HTTP API
        #[arg(long, env = "COURSEPACE_LISTEN", default_value = coursepace_api::config::DEFAULT_LISTEN)]
        listen: SocketAddr,

        /// Accepted bearer token (repeat, or comma separate in the env var)
        #[arg(long = "api-token", env = "COURSEPACE_API_TOKENS", value_delimiter = ',', hide_env_values = true)]
        api_tokens: Vec<String>,
    },

    /// Evaluate one request and print the result as JSON
    Evaluate {
        /// Course content duration in seconds
        #[arg(long)]
        course_duration: String,

        /// Current progress percent (0-100)
        #[arg(long)]
        progress_percent: String,

        /// Assignment date (RFC 3339)
        #[arg(long)]
        assignment_date: String,

        /// Due date (RFC 3339)
        #[arg(long)]
        due_date: String,

        /// Evaluate as of this instant instead of the current time (RFC 3339)
        #[arg(long)]
        now: Option<String>,
    },

    /// Print server info
    Info,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { listen, api_tokens } => {
            let config = ServerConfig::new(listen, api_tokens);
            let server = ProgressServer::new(config)?;
            info!("Starting coursepace server");
            server.serve().await?;
        }

        Commands::Evaluate {
            course_duration,
            progress_percent,
            assignment_date,
            due_date,
            now,
        } => {
            let clock: Arc<dyn Clock> = match now {
                Some(now) => {
                    let at = DateTime::parse_from_rfc3339(&now)
                        .with_context(|| format!("invalid --now timestamp: {now}"))?;
                    Arc::new(FixedClock::new(at.to_utc()))
                }
                None => Arc::new(SystemClock),
            };

            let fields: RequestFields = [
                ("course_duration", course_duration),
                ("progress_percent", progress_percent),
                ("assignment_date", assignment_date),
                ("due_date", due_date),
            ]
            .into_iter()
            .map(|(name, value)| (name.to_string(), Value::String(value)))
            .collect();

            let request = match validate_fields(&fields) {
                Ok(request) => request,
                Err(errors) => {
                    eprintln!("{}", serde_json::to_string_pretty(&errors)?);
                    bail!("The given data was invalid.");
                }
            };

            let result = ProgressEvaluator::new(clock).evaluate(&request);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Info => {
            let config = ServerConfig::default();
            println!("{} v{}", config.server_name, config.version);
            println!("Endpoint: {}", coursepace_api::PROGRESS_STATUS_PATH);
            println!("Health: {}", coursepace_api::HEALTH_PATH);
            println!("Default listen: {}", config.listen);
        }
    }

    Ok(())
}
