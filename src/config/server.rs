use crate::core::Result;

use super::{parse_or, Lookup};

/// Server configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    pub(super) fn from_lookup(lookup: Lookup<'_>) -> Result<Self> {
        Ok(Self::new(
            lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            parse_or(lookup, "SERVER_PORT", 8080)?,
        ))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
