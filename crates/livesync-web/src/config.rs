//! Server configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default outbound queue capacity per WebSocket connection.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Default bound on a single WebSocket write.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Which record set the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// Flat to-do list, pushed as `items_updated`.
    Items,
    /// Classes and courses, pushed as `data_updated`.
    Catalog,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::Catalog => "catalog",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "items" => Ok(Self::Items),
            "catalog" => Ok(Self::Catalog),
            other => Err(format!(
                "Invalid dataset '{}'. Valid datasets: items, catalog",
                other
            )),
        }
    }
}

/// Everything `run_server` needs besides the store.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub dataset: Dataset,
    /// CORS origins; `*` allows any.
    pub allowed_origins: Vec<String>,
    pub queue_capacity: usize,
    pub send_timeout: Duration,
    /// Seed an empty catalog on startup.
    pub seed: bool,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Queue capacity clamped to what `tokio::sync::mpsc` accepts.
    pub fn effective_queue_capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            dataset: Dataset::Items,
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            seed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_parse() {
        assert_eq!("items".parse::<Dataset>(), Ok(Dataset::Items));
        assert_eq!("Catalog".parse::<Dataset>(), Ok(Dataset::Catalog));
        assert!("courses".parse::<Dataset>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.dataset, Dataset::Items);
        assert_eq!(config.effective_queue_capacity(), DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let config = ServerConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_queue_capacity(), 1);
    }
}
