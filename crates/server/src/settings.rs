use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

impl Settings {
    /// Loads `config/{RUN_MODE}.toml` when present, then `APP__...`
    /// environment variables (e.g. `APP__SERVER__PORT=8000`).
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("server.bind_address", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.log_level", "info")?
            .set_default("database.path", "data/catalog.db")?
            .add_source(
                File::with_name(&format!("config/{}", run_mode))
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_address: String,
    pub port: u16,
    /// Used when `RUST_LOG` is unset
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub path: String,
}
