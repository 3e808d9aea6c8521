//! Configuration for Big Store
//!
//! All settings come from the environment (with `.env` support via dotenvy);
//! there is no config file.

use std::path::PathBuf;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite document store (default: ~/.bigstore/catalog.db)
    pub db_path: PathBuf,

    /// HTTP server port
    pub http_port: u16,

    /// Secret used to sign and verify access tokens
    pub jwt_secret: String,
}

impl Config {
    /// Load config from environment variables.
    ///
    /// `JWT_SECRET` is required; startup fails without it rather than
    /// minting tokens with a default secret.
    pub fn from_env() -> Result<Self> {
        let db_path = match std::env::var("BIGSTORE_DB") {
            Ok(path) => PathBuf::from(path),
            Err(_) => Self::default_db_path()?,
        };

        let http_port = match std::env::var("PORT") {
            Ok(port) => port
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("Invalid PORT value: {}", port)))?,
            Err(_) => default_http_port(),
        };

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| Error::Config("JWT_SECRET is not set".into()))?;
        if jwt_secret.is_empty() {
            return Err(Error::Config("JWT_SECRET is empty".into()));
        }

        Ok(Self {
            db_path,
            http_port,
            jwt_secret,
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not find home directory".into()))?;
        Ok(home.join(".bigstore").join("catalog.db"))
    }

    /// Directory containing the database file
    pub fn data_dir(&self) -> PathBuf {
        self.db_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn default_http_port() -> u16 {
    5000
}
