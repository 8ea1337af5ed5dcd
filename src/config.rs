//! Configuration management for Roster.
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). The binary reads it once through [`config()`]; tests build a
//! [`Config`] directly.

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Initialize configuration (call once at startup)
pub fn init() -> &'static Config {
    config()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub public_url: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory that receives uploaded photos.
    pub uploads_path: PathBuf,
    /// Base of every photo URL; a stored name `n` is served at `{base}/{n}`.
    pub uploads_base_url: String,
    pub max_upload_size: usize,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let public_url = env_or("PUBLIC_URL", "http://localhost:5000")
            .trim_end_matches('/')
            .to_string();
        let uploads_base_url = env::var("UPLOADS_BASE_URL")
            .unwrap_or_else(|_| format!("{}/uploads", public_url));

        Self {
            server: ServerConfig {
                host: env_or("HOST", "0.0.0.0"),
                port: env_or("PORT", "5000").parse().unwrap_or(5000),
                public_url,
            },
            database: DatabaseConfig {
                path: env_or("DATABASE_PATH", "./data/roster.db"),
            },
            storage: StorageConfig {
                uploads_path: PathBuf::from(env_or("UPLOADS_PATH", "./uploads")),
                uploads_base_url,
                max_upload_size: env_or("MAX_UPLOAD_SIZE", "10485760")
                    .parse()
                    .unwrap_or(10 * 1024 * 1024), // 10MB
            },
        }
    }

    /// Configuration for an isolated instance: in-memory database and the
    /// given uploads directory.
    pub fn ephemeral(uploads_path: impl Into<PathBuf>) -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                public_url: "http://localhost".into(),
            },
            database: DatabaseConfig {
                path: ":memory:".into(),
            },
            storage: StorageConfig {
                uploads_path: uploads_path.into(),
                uploads_base_url: "http://localhost/uploads".into(),
                max_upload_size: 10 * 1024 * 1024,
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
