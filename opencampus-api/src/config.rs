/// API server configuration
///
/// Everything comes from the environment (a `.env` file is honored in
/// development). Required: `DATABASE_URL`, `JWT_SECRET` (32+ characters).
/// Optional with defaults: `API_HOST` (0.0.0.0), `API_PORT` (8080),
/// `DATABASE_MAX_CONNECTIONS` (10), `CORS_ORIGINS` (`*`, comma-separated
/// otherwise).

use serde::{Deserialize, Serialize};
use std::env;

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; the single entry "*" selects permissive CORS
    pub cors_origins: Vec<String>,
}

/// Database settings passed through to the pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Token signing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing secret, 32 characters minimum
    pub secret: String,
}

fn optional(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("{key} environment variable is required"))
}

impl Config {
    /// Reads the configuration from the environment
    ///
    /// # Errors
    ///
    /// Fails when a required variable is missing, a numeric variable does
    /// not parse, or the JWT secret is too short.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let port: u16 = optional("API_PORT", "8080").parse()?;
        let max_connections: u32 = optional("DATABASE_MAX_CONNECTIONS", "10").parse()?;

        let cors_origins: Vec<String> = optional("CORS_ORIGINS", "*")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let secret = required("JWT_SECRET")?;
        if secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        Ok(Config {
            api: ApiConfig {
                host: optional("API_HOST", "0.0.0.0"),
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections,
            },
            jwt: JwtConfig { secret },
        })
    }

    /// The `host:port` string the listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 9090,
                cors_origins: vec!["https://app.opencampus.dev".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/opencampus".to_string(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(sample().bind_address(), "127.0.0.1:9090");
    }

    #[test]
    fn test_cors_origins_preserved() {
        let config = sample();
        assert!(!config.api.cors_origins.contains(&"*".to_string()));
    }
}
