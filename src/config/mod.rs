// Configuration module entry point
// Manages application configuration and runtime state

mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

// Re-export the types the rest of the crate consumes
pub use state::AppState;
pub use types::{Config, ReloadMode};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVE"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("source.path", "www")?
            .set_default("source.index_files", vec!["index.html", "index.htm"])?
            .set_default("rules.file", "_redirects")?
            .set_default("rules.reload", "cached")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)?; // 10MB

        // Deployment knob for the site directory, kept as a plain
        // environment variable rather than a nested config key
        if let Ok(path) = std::env::var("SERVE_SOURCE_PATH") {
            builder = builder.set_override("source.path", path)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Full path of the rule file inside the source directory
    pub fn rules_path(&self) -> PathBuf {
        PathBuf::from(&self.source.path).join(&self.rules.file)
    }
}
