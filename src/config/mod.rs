use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub external_url: Option<String>,
    pub api_rate_limit: u64,
    pub cors_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Deadline applied to every candidate-adapter call
    pub adapter_timeout_ms: u64,
    pub use_synonyms: bool,
    pub embedding_dimensions: usize,
    pub similar_default_limit: usize,
    pub similar_max_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub api_default_limit: usize,
    pub api_max_limit: usize,
}

impl SearchConfig {
    pub fn adapter_timeout(&self) -> Duration {
        Duration::from_millis(self.adapter_timeout_ms)
    }
}

fn env_or<T: FromStr>(name: &str, default: &str) -> Result<T> {
    std::env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {name} value")))
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/recipes.db".to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env_or("PORT", "3001")?;
        let external_url = std::env::var("EXTERNAL_URL").ok();
        let api_rate_limit = env_or("API_RATE_LIMIT", "100")?;

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let use_synonyms = match std::env::var("SEARCH_USE_SYNONYMS") {
            Ok(value) => parse_bool(&value)
                .ok_or_else(|| Error::Config("Invalid SEARCH_USE_SYNONYMS value".to_string()))?,
            Err(_) => true,
        };

        Ok(Settings {
            database: DatabaseConfig {
                url: database_url,
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", "25")?,
                min_connections: env_or("DATABASE_MIN_CONNECTIONS", "5")?,
                connection_timeout_seconds: env_or("DATABASE_CONNECTION_TIMEOUT", "30")?,
                idle_timeout_seconds: env_or("DATABASE_IDLE_TIMEOUT", "600")?,
            },
            server: ServerConfig {
                host,
                port,
                external_url,
                api_rate_limit,
                cors_origins,
                max_request_body_size: env_or("MAX_REQUEST_BODY_SIZE", "1048576")?,
            },
            search: SearchConfig {
                adapter_timeout_ms: env_or("SEARCH_ADAPTER_TIMEOUT_MS", "5000")?,
                use_synonyms,
                embedding_dimensions: env_or("EMBEDDING_DIMENSIONS", "1536")?,
                similar_default_limit: env_or("SIMILAR_DEFAULT_LIMIT", "5")?,
                similar_max_limit: env_or("SIMILAR_MAX_LIMIT", "50")?,
            },
            pagination: PaginationConfig {
                api_default_limit: env_or("API_DEFAULT_LIMIT", "100")?,
                api_max_limit: env_or("API_MAX_LIMIT", "1000")?,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.server.api_rate_limit == 0 {
            return Err(Error::Config("API rate limit must be non-zero".to_string()));
        }

        if self.search.adapter_timeout_ms == 0 {
            return Err(Error::Config(
                "Search adapter timeout must be non-zero".to_string(),
            ));
        }

        if self.search.embedding_dimensions == 0 {
            return Err(Error::Config(
                "Embedding dimensions must be non-zero".to_string(),
            ));
        }

        if self.search.similar_default_limit > self.search.similar_max_limit {
            return Err(Error::Config(
                "SIMILAR_DEFAULT_LIMIT cannot exceed SIMILAR_MAX_LIMIT".to_string(),
            ));
        }

        if self.pagination.api_default_limit == 0
            || self.pagination.api_default_limit > self.pagination.api_max_limit
        {
            return Err(Error::Config(
                "API_DEFAULT_LIMIT must be between 1 and API_MAX_LIMIT".to_string(),
            ));
        }

        Ok(())
    }

    /// Settings suitable for tests and local tooling
    pub fn for_database(url: &str) -> Self {
        Settings {
            database: DatabaseConfig {
                url: url.to_string(),
                max_connections: 5,
                min_connections: 1,
                connection_timeout_seconds: 30,
                idle_timeout_seconds: 600,
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
                external_url: None,
                api_rate_limit: 100,
                cors_origins: vec!["http://localhost:3000".to_string()],
                max_request_body_size: 1_048_576,
            },
            search: SearchConfig {
                adapter_timeout_ms: 5000,
                use_synonyms: true,
                embedding_dimensions: 1536,
                similar_default_limit: 5,
                similar_max_limit: 50,
            },
            pagination: PaginationConfig {
                api_default_limit: 100,
                api_max_limit: 1000,
            },
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
