//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub templates_dir: String,
    /// Signs session cookies, flash messages and auth tokens.
    pub secret: String,
    /// When `false` every request runs as the demo guest.
    #[serde(default = "default_require_auth")]
    pub require_auth: bool,
    pub zmq_emailer_pub: String,
    /// Base URL used in links sent by email.
    pub public_url: String,
}

fn default_require_auth() -> bool {
    true
}
