//! Server configuration (env-driven).

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address to bind (example: 0.0.0.0).
    pub host: IpAddr,

    /// Port to listen on.
    pub port: u16,

    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host: IpAddr = lookup("SEAT_PLANNER_HOST")
            .map(|v| v.parse())
            .transpose()
            .context("SEAT_PLANNER_HOST must be an IP address.")?
            .unwrap_or(IpAddr::from([127, 0, 0, 1]));

        let port: u16 = lookup("PORT")
            .map(|v| v.parse())
            .transpose()
            .context("PORT must be an integer between 0 and 65535.")?
            .unwrap_or(5000);

        let log_level = lookup("SEAT_PLANNER_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            host,
            port,
            log_level,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
