//! Infrastructure layer: storage adapters and configuration.

pub mod config;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use store::{InMemoryPersonStore, PersonStore};
