use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable holding the MongoDB connection string
pub const MONGO_URI_VAR: &str = "MONGOURI";

const CONFIG_PATH_VAR: &str = "APP_CONFIG";
const PORT_VAR: &str = "PORT";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub mongo_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub name: String,
    pub collection: String,
    pub connect_timeout_secs: u64,
    pub sample_size: i64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: "sample_mflix".to_string(),
            collection: "movies".to_string(),
            connect_timeout_secs: 10,
            sample_size: crate::sampling::SAMPLE_SIZE,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "http://localhost:5173".to_string(),
        }
    }
}

/// Shape of the optional TOML file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    server: ServerConfig,
    database: DatabaseConfig,
    cors: CorsConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not found in environment variables")]
    MissingEnv(&'static str),
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, toml::de::Error),
    #[error("Invalid {0}: {1}")]
    Invalid(&'static str, String),
}

impl AppConfig {
    /// Load `.env`, the optional TOML file and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenv::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        let file = read_optional(&path)?;

        Self::from_sources(file.as_deref(), &path, |key| std::env::var(key).ok())
    }

    /// Build the configuration from file contents and an environment lookup
    pub fn from_sources<F>(file: Option<&str>, path: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed: FileConfig = match file {
            Some(contents) => toml::from_str(contents)
                .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))?,
            None => FileConfig::default(),
        };

        let mongo_uri = env(MONGO_URI_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingEnv(MONGO_URI_VAR))?;

        let mut server = parsed.server;
        if let Some(port) = env(PORT_VAR) {
            server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", port.clone()))?;
        }

        let config = Self {
            server,
            database: parsed.database,
            cors: parsed.cors,
            mongo_uri,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port", "0".to_string()));
        }
        if self.database.name.trim().is_empty() {
            return Err(ConfigError::Invalid("database.name", "empty".to_string()));
        }
        if self.database.collection.trim().is_empty() {
            return Err(ConfigError::Invalid("database.collection", "empty".to_string()));
        }
        if self.database.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "database.connect_timeout_secs",
                "must be greater than 0".to_string(),
            ));
        }
        if !(1..=100).contains(&self.database.sample_size) {
            return Err(ConfigError::Invalid(
                "database.sample_size",
                format!("{} is not between 1 and 100", self.database.sample_size),
            ));
        }
        if self.cors.allowed_origin.parse::<axum::http::HeaderValue>().is_err() {
            return Err(ConfigError::Invalid(
                "cors.allowed_origin",
                self.cors.allowed_origin.clone(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::ReadError(path.to_path_buf(), e)),
    }
}
