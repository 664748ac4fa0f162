//! Configuration loading and representation.
//!
//! Read from the process environment:
//! - `GEOCORE_BIND_ADDR`: listen address (default: `0.0.0.0:8080`)
//! - `GEOCORE_SEED_SAMPLE_DATA`: pre-populate the sample people (default: `true`)

use std::net::SocketAddr;

use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "GEOCORE_BIND_ADDR";
pub const SEED_SAMPLE_DATA_VAR: &str = "GEOCORE_SEED_SAMPLE_DATA";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid socket address {value:?}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var}: expected a boolean, got {value:?}")]
    InvalidBool { var: &'static str, value: String },
}

/// Process-wide settings for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub seed_sample_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            seed_sample_data: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source (the environment in production).
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = match lookup(BIND_ADDR_VAR) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidAddr {
                var: BIND_ADDR_VAR,
                value,
            })?,
            None => {
                tracing::warn!("{BIND_ADDR_VAR} not set; using {DEFAULT_BIND_ADDR}");
                defaults.bind_addr
            }
        };

        let seed_sample_data = match lookup(SEED_SAMPLE_DATA_VAR) {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidBool {
                var: SEED_SAMPLE_DATA_VAR,
                value,
            })?,
            None => defaults.seed_sample_data,
        };

        Ok(Self {
            bind_addr,
            seed_sample_data,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
