//! Handles settings for the application.
//!
//! Values are layered: built-in defaults, then an optional `settings.toml` in
//! the working directory, then `FINANCE__*` environment variables
//! (`FINANCE__SERVER__PORT=9000`, `FINANCE__CORS__ORIGINS=a,b`).
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    /// Store file path, or `:memory:`.
    pub database: String,
}

#[derive(Debug, Deserialize)]
pub struct Cors {
    pub origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub cors: Cors,
}

fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("app.level", "info")?
        .set_default("server.bind", "127.0.0.1")?
        .set_default("server.port", 8000)?
        .set_default("server.database", "./finance.db")?
        .set_default("cors.origins", vec!["http://localhost:3000"])
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = defaults()?
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("FINANCE")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.origins")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
