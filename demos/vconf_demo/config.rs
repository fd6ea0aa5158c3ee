//! Typed settings for the demo app.

use serde::Deserialize;

/// Top-level settings.
#[derive(Deserialize, Debug)]
pub struct DemoConfig {
    /// Display name of the service.
    pub name: String,

    /// Primary upstream, as a URL.
    pub upstream: String,

    /// Fallback backends, `;`-separated.
    #[serde(default)]
    pub backends: Vec<String>,

    /// Server settings (`server.*` keys).
    pub server: ServerConfig,
}

#[derive(Deserialize, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub debug: bool,
    pub max_connections: Option<u32>,
}
