use std::str::FromStr;

use axum::http::HeaderValue;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Where todos and categories are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// PostgreSQL via `sqlx`; migrations run at startup.
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    /// Process-local tables seeded with the default categories. Data is lost
    /// on restart.
    Memory,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development against the frontend on ports 3000/3001.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub storage: StorageConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                                       |
    /// |----------------------------|-----------------------------------------------|
    /// | `HOST`                     | `0.0.0.0`                                     |
    /// | `PORT`                     | `3001`                                        |
    /// | `CORS_ORIGINS`             | `http://localhost:3000,http://localhost:3001` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                                          |
    /// | `STORAGE_BACKEND`          | `postgres` (or `memory`)                      |
    /// | `DATABASE_URL`             | required when the backend is `postgres`       |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`                                          |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "PORT", 3001u16, "a valid u16")?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,http://localhost:3001".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    expected: "a comma-separated list of origins",
                    value: origin.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30u64, "a valid u64")?;

        let backend = lookup("STORAGE_BACKEND").unwrap_or_else(|| "postgres".into());
        let storage = match backend.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => StorageConfig::Postgres {
                database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 20u32, "a valid u32")?,
            },
            "memory" => StorageConfig::Memory,
            _ => {
                return Err(ConfigError::Invalid {
                    var: "STORAGE_BACKEND",
                    expected: "'postgres' or 'memory'",
                    value: backend,
                })
            }
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            storage,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid {
                var,
                expected,
                value,
            }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_memory_backend() {
        let cfg = config(&[("STORAGE_BACKEND", "memory")]).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 3001);
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.cors_origins.len(), 2);
        assert_eq!(cfg.storage, StorageConfig::Memory);
    }

    #[test]
    fn postgres_requires_database_url() {
        let err = config(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));

        let cfg = config(&[("DATABASE_URL", "postgres://localhost/todos")]).unwrap();
        assert_eq!(
            cfg.storage,
            StorageConfig::Postgres {
                database_url: "postgres://localhost/todos".into(),
                max_connections: 20,
            }
        );
    }

    #[test]
    fn invalid_numbers_are_reported() {
        let err = config(&[("STORAGE_BACKEND", "memory"), ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = config(&[("STORAGE_BACKEND", "sqlite")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "STORAGE_BACKEND", .. }));
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let cfg = config(&[
            ("STORAGE_BACKEND", "memory"),
            ("CORS_ORIGINS", " http://a.test , ,http://b.test"),
        ])
        .unwrap();
        assert_eq!(cfg.cors_origins, vec!["http://a.test", "http://b.test"]);
    }
}
