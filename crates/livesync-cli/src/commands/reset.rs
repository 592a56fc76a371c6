//! Reset command: asks a running catalog server to reseed.
//!
//! Goes through the server rather than the store so connected clients
//! receive the new state.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use std::time::Duration;
use tracing::debug;

#[derive(Args)]
pub struct ResetArgs {
    /// Base URL of the running server
    #[arg(long, env = "LIVESYNC_URL", default_value = "http://127.0.0.1:8000")]
    pub server_url: String,
}

impl ResetArgs {
    pub fn reset_url(&self) -> String {
        format!("{}/reset-data", self.server_url.trim_end_matches('/'))
    }
}

pub async fn execute(args: ResetArgs) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let url = args.reset_url();

    debug!(url = %url, "Sending reset request");
    let response = client
        .post(&url)
        .send()
        .await
        .with_context(|| format!("Failed to reach LiveSync server at {}", url))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("Reset failed with status {}: {}", status, body);
    }

    let body: serde_json::Value = response.json().await?;
    println!(
        "  {} {}",
        "✓".green(),
        body["message"].as_str().unwrap_or("Reset complete")
    );
    Ok(())
}
