use std::path::PathBuf;

use clap::Parser;
use serde_json::Value;

use mermates_rag::domains::message::{ChatRequest, ChatTurn};
use mermates_rag::error::{MermatesRagError, Result};

#[derive(Parser, Debug)]
#[command(name = "mermates-rag")]
#[command(about = "Send one message to a running mermates-ragd and print the reply")]
#[command(version = mermates_rag::version())]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    daemon: String,

    /// JSON array of `{role, content}` turns preceding the message.
    #[arg(long)]
    history: Option<PathBuf>,

    message: String,
}

fn load_history(path: Option<&PathBuf>) -> Result<Vec<ChatTurn>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|e| MermatesRagError::Config(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| MermatesRagError::Serialization(e.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let request = ChatRequest {
        message: cli.message,
        history: load_history(cli.history.as_ref())?,
    };

    let url = format!("{}/chat", cli.daemon.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .post(&url)
        .json(&request)
        .send()
        .await
        .map_err(|e| MermatesRagError::Http(format!("cannot reach {url}: {e}")))?;
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .map_err(|e| MermatesRagError::Serialization(e.to_string()))?;

    let pretty = serde_json::to_string_pretty(&body)
        .map_err(|e| MermatesRagError::Serialization(e.to_string()))?;
    if !status.is_success() {
        eprintln!("{pretty}");
        return Err(MermatesRagError::Http(format!("daemon answered {status}")));
    }
    println!("{pretty}");
    Ok(())
}
