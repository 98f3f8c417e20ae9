use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Database connection URL
    /// Format: sqlite://PATH_TO_FILE
    pub database_url: String,

    /// Address the HTTP server binds to
    pub host: String,
    pub port: u16,

    /// Maximum payload size for all requests (in bytes)
    /// Default: 10MB (10 * 1024 * 1024)
    pub max_payload_size: usize,

    /// Maximum number of pooled database connections
    pub max_db_connections: u32,

    /// JSON file used to seed an empty store on startup
    pub seed_file: PathBuf,

    /// Directory for rolling log files
    pub log_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Optional environment variables:
    /// - DATABASE_URL: SQLite connection string (default: sqlite://jobs.db)
    /// - HOST: bind address (default: 127.0.0.1)
    /// - PORT: bind port (default: 5000)
    /// - MAX_PAYLOAD_SIZE: Maximum request payload size in bytes (default: 10485760 = 10MB)
    /// - MAX_DB_CONNECTIONS: pool size (default: 5)
    /// - SEED_FILE: seed data loaded when the store is empty (default: output.json)
    /// - LOG_DIR: log file directory (default: logs)
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://jobs.db".to_string());
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = parse_or(&lookup, "PORT", 5000)?;
        let max_payload_size = parse_or(&lookup, "MAX_PAYLOAD_SIZE", 10 * 1024 * 1024)?;
        let max_db_connections = parse_or(&lookup, "MAX_DB_CONNECTIONS", 5)?;
        if max_db_connections == 0 {
            return Err("MAX_DB_CONNECTIONS must be at least 1".to_string());
        }

        let seed_file = lookup("SEED_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("output.json"));
        let log_dir = lookup("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("logs"));

        Ok(Config {
            database_url,
            host,
            port,
            max_payload_size,
            max_db_connections,
            seed_file,
            log_dir,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{} must be a valid number, got '{}'", key, raw)),
        None => Ok(default),
    }
}
