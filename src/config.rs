//! Process configuration from the environment (optionally seeded from a `.env` file).

use crate::error::ConfigError;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::path::Path;

pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Load variables from an env file into the process environment. Existing variables win.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    dotenvy::from_filename(path)
        .map(|_| ())
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))
}

#[derive(Clone, Debug)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub ssl_mode: PgSslMode,
    pub max_connections: u32,
}

impl DbConfig {
    /// Read `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASS`, `DB_NAME`, `DB_SSLMODE`
    /// and optional `DB_MAX_CONNECTIONS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            get(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };
        let port = required("DB_PORT")?;
        let port = port.parse::<u16>().map_err(|e| ConfigError::Invalid {
            var: "DB_PORT",
            reason: e.to_string(),
        })?;
        let ssl_mode = required("DB_SSLMODE")?;
        let ssl_mode = ssl_mode.parse::<PgSslMode>().map_err(|e| ConfigError::Invalid {
            var: "DB_SSLMODE",
            reason: e.to_string(),
        })?;
        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        Ok(DbConfig {
            host: required("DB_HOST")?,
            port,
            user: required("DB_USER")?,
            // may be empty, must be set
            password: get("DB_PASS").ok_or(ConfigError::Missing("DB_PASS"))?,
            database: required("DB_NAME")?,
            ssl_mode,
            max_connections,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(self.ssl_mode)
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: String,
}

impl ServerConfig {
    /// Listen address from `SERVER_ADDR`, default `0.0.0.0:8080`.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = get("SERVER_ADDR")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        ServerConfig { addr }
    }
}
