use std::path::PathBuf;

use clap::Parser;
use mermates_rag::config::Config;
use mermates_rag::daemon::{self, AppState};
use mermates_rag::error::Result;
use mermates_rag::factories::service_factory::build_chat_service;

#[derive(Parser, Debug)]
#[command(name = "mermates-ragd")]
#[command(about = "Mermates retrieval-augmented chat daemon")]
#[command(version = mermates_rag::version())]
struct Cli {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// JSON config file; the process environment is used when omitted.
    #[arg(long, env = "MERMATES_CONFIG")]
    config: Option<PathBuf>,
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for ctrl-c: {}", err);
        futures::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    mermates_rag::logging::init_tracing("mermates_ragd");
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    let chat = build_chat_service(&config).await?;

    daemon::run_with_shutdown(&cli.host, cli.port, AppState::new(chat), shutdown_signal()).await
}
