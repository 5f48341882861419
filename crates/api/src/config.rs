//! Server configuration.

use std::net::SocketAddr;

/// Default listen address for the HTTP API.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

/// coursepace server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP API binds to
    pub listen: SocketAddr,
    /// Bearer tokens accepted on authenticated routes
    pub api_tokens: Vec<String>,
    /// Server name reported by `info`
    pub server_name: String,
    /// Server version
    pub version: String,
}

impl ServerConfig {
    /// Create a config listening on `listen` and accepting `api_tokens`.
    pub fn new(listen: SocketAddr, api_tokens: Vec<String>) -> Self {
        Self {
            listen,
            api_tokens,
            ..Self::default()
        }
    }

    /// Tokens with surrounding whitespace removed; blank entries dropped.
    pub fn usable_tokens(&self) -> Vec<String> {
        self.api_tokens
            .iter()
            .map(|token| token.trim())
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
            api_tokens: Vec::new(),
            server_name: "coursepace".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
