//! Web server command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use livesync_store::{DocumentStore, MemoryStore, RedisStore};
use livesync_web::config::DEFAULT_QUEUE_CAPACITY;
use livesync_web::{Dataset, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(long, env = "LIVESYNC_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "LIVESYNC_PORT", default_value = "8000")]
    pub port: u16,

    /// Record set to serve: items or catalog
    #[arg(long, env = "LIVESYNC_DATASET", default_value = "items")]
    pub dataset: Dataset,

    /// Redis connection URL
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    /// Prefix for every Redis key
    #[arg(long, env = "LIVESYNC_NAMESPACE", default_value = "livesync")]
    pub namespace: String,

    /// Keep data in memory instead of Redis (lost on exit)
    #[arg(long)]
    pub memory: bool,

    /// Allowed CORS origin; repeat or comma-separate, `*` for any
    #[arg(
        long = "allowed-origin",
        env = "LIVESYNC_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173,http://127.0.0.1:5173"
    )]
    pub allowed_origins: Vec<String>,

    /// Outbound messages buffered per WebSocket before it is disconnected
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Give up on a WebSocket write after this many milliseconds
    #[arg(long, default_value_t = 5000)]
    pub send_timeout_ms: u64,

    /// Do not seed an empty catalog on startup
    #[arg(long)]
    pub no_seed: bool,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file used with --log
    #[arg(long, default_value = "livesync.log")]
    pub log_file: PathBuf,
}

impl ServeArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            dataset: self.dataset,
            allowed_origins: self.allowed_origins.clone(),
            queue_capacity: self.queue_capacity,
            send_timeout: Duration::from_millis(self.send_timeout_ms),
            seed: !self.no_seed,
        }
    }
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let store: Arc<dyn DocumentStore> = if args.memory {
        Arc::new(MemoryStore::new())
    } else {
        let store = RedisStore::connect(&args.redis_url, &args.namespace)
            .await
            .with_context(|| format!("Failed to connect to Redis at {}", args.redis_url))?;
        Arc::new(store)
    };
    let config = args.server_config();

    println!();
    println!(
        "  {} {} {}",
        "LiveSync".cyan().bold(),
        "Server".bold(),
        format!("({})", config.dataset).dimmed()
    );
    println!();
    match config.dataset {
        Dataset::Items => println!(
            "  {}      http://{}:{}/items",
            "Items".green(),
            args.host,
            args.port
        ),
        Dataset::Catalog => println!(
            "  {}       http://{}:{}/data",
            "Data".green(),
            args.host,
            args.port
        ),
    }
    println!(
        "  {}  ws://{}:{}/ws",
        "WebSocket".green(),
        args.host,
        args.port
    );
    println!(
        "  {}      {}",
        "Store".green(),
        if args.memory {
            "in-memory".to_string()
        } else {
            format!("{} ({})", args.redis_url, args.namespace)
        }
    );
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    livesync_web::run_server(store, config).await?;

    Ok(())
}
