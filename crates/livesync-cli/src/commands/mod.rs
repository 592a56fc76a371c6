//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod reset;
pub mod serve;

/// LiveSync - real-time data synchronization server
#[derive(Parser)]
#[command(name = "livesync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST + WebSocket server
    Serve(serve::ServeArgs),

    /// Ask a running catalog server to wipe and reseed its data
    Reset(reset::ResetArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args).await,
            Commands::Reset(args) => reset::execute(args).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livesync_web::Dataset;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["livesync", "serve"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let config = args.server_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.dataset, Dataset::Items);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:5173", "http://127.0.0.1:5173"]
        );
        assert!(config.seed);
        assert!(!args.memory);
    }

    #[test]
    fn test_serve_catalog_options() {
        let cli = Cli::try_parse_from([
            "livesync",
            "serve",
            "--dataset",
            "catalog",
            "--port",
            "9000",
            "--memory",
            "--no-seed",
            "--send-timeout-ms",
            "250",
            "--allowed-origin",
            "*",
        ])
        .unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let config = args.server_config();
        assert_eq!(config.dataset, Dataset::Catalog);
        assert_eq!(config.port, 9000);
        assert!(!config.seed);
        assert_eq!(config.send_timeout.as_millis(), 250);
        assert_eq!(config.allowed_origins, vec!["*"]);
    }

    #[test]
    fn test_unknown_dataset_rejected() {
        assert!(Cli::try_parse_from(["livesync", "serve", "--dataset", "todo"]).is_err());
    }

    #[test]
    fn test_reset_url() {
        let cli = Cli::try_parse_from(["livesync", "reset", "--server-url", "http://host:1/"])
            .unwrap();
        let Commands::Reset(args) = cli.command else {
            panic!("expected reset");
        };
        assert_eq!(args.reset_url(), "http://host:1/reset-data");
    }
}
