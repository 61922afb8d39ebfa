//! Environment configuration for the HTTP front door.

use std::env;
use std::net::SocketAddr;

use tool_host::ServerConfig;

/// Default listen address.
pub const DEFAULT_ADDR: &str = "0.0.0.0:5001";

/// Where the rate tools run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportKind {
    /// Spawn `rate-tool-server` and talk to it over stdio.
    Stdio(ServerConfig),
    /// Run the tool registry inside this process.
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub addr: SocketAddr,
    pub transport: TransportKind,
}

impl ApiConfig {
    /// Read `RATE_API_ADDR` and `TOOL_TRANSPORT` (`stdio` or `local`).
    pub fn from_env() -> Result<Self, String> {
        let addr = env::var("RATE_API_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr
            .parse()
            .map_err(|e| format!("Invalid RATE_API_ADDR '{}': {}", addr, e))?;

        let transport = match env::var("TOOL_TRANSPORT")
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "" | "stdio" => TransportKind::Stdio(ServerConfig::from_env()),
            "local" => TransportKind::Local,
            other => {
                return Err(format!(
                    "Invalid TOOL_TRANSPORT '{}': expected stdio or local",
                    other
                ))
            }
        };

        Ok(Self { addr, transport })
    }
}
