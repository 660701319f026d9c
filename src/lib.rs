pub mod config;
pub mod db;
pub mod error;

// Search and similarity engine
pub mod search;

// HTTP API
pub mod api;

// Command-line interface
pub mod cli;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
