use std::str::FromStr;

use chrono::Duration;
use jsonwebtoken::Algorithm;
use thiserror::Error;

/// Only for local development; refused when `APP_ENV=production`.
pub const DEV_SECRET_KEY: &str = "budget-server-dev-secret-change-me";

const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// One year.
const MAX_TOKEN_LIFETIME_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SECRET_KEY must be set to a non-default value in production")]
    DefaultSecretInProduction,

    #[error("SECRET_KEY must be at least 32 bytes in production")]
    WeakSecretInProduction,

    #[error("ALGORITHM {0:?} is not a supported HMAC algorithm (use HS256, HS384 or HS512)")]
    UnsupportedAlgorithm(String),

    #[error("ACCESS_TOKEN_EXPIRE_MINUTES must be a whole number of minutes between 1 and 525600, got {0:?}")]
    InvalidTokenLifetime(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_ttl: Duration,
    pub environment: Environment,
}

impl Config {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            _ => Environment::Development,
        };

        let secret_key = lookup("SECRET_KEY")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEV_SECRET_KEY.to_string());

        if secret_key == DEV_SECRET_KEY {
            if environment == Environment::Production {
                return Err(ConfigError::DefaultSecretInProduction);
            }
            tracing::warn!(
                "WARNING: using the built-in development SECRET_KEY; \
                 set a strong SECRET_KEY before deploying"
            );
        } else if environment == Environment::Production
            && secret_key.len() < MIN_PRODUCTION_SECRET_LEN
        {
            return Err(ConfigError::WeakSecretInProduction);
        }

        let algorithm = match lookup("ALGORITHM") {
            Some(name) => parse_algorithm(&name)?,
            None => Algorithm::HS256,
        };

        let access_token_ttl = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| (1..=MAX_TOKEN_LIFETIME_MINUTES).contains(minutes))
                .and_then(Duration::try_minutes)
                .ok_or(ConfigError::InvalidTokenLifetime(raw))?,
            None => Duration::minutes(30),
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://budget.db?mode=rwc".to_string()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            secret_key,
            algorithm,
            access_token_ttl,
            environment,
        })
    }
}

fn parse_algorithm(name: &str) -> Result<Algorithm, ConfigError> {
    match Algorithm::from_str(name.trim()) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(ConfigError::UnsupportedAlgorithm(name.to_string())),
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("bind_addr", &self.bind_addr)
            .field("secret_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("environment", &self.environment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_for_development() {
        let config = load(&[]).unwrap();

        assert_eq!(config.secret_key, DEV_SECRET_KEY);
        assert_eq!(config.algorithm, Algorithm::HS256);
        assert_eq!(config.access_token_ttl, Duration::minutes(30));
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    fn production_refuses_default_secret() {
        assert!(matches!(
            load(&[("APP_ENV", "production")]),
            Err(ConfigError::DefaultSecretInProduction)
        ));
        assert!(matches!(
            load(&[("APP_ENV", "production"), ("SECRET_KEY", DEV_SECRET_KEY)]),
            Err(ConfigError::DefaultSecretInProduction)
        ));
    }

    #[test]
    fn production_refuses_short_secret() {
        assert!(matches!(
            load(&[("APP_ENV", "production"), ("SECRET_KEY", "short")]),
            Err(ConfigError::WeakSecretInProduction)
        ));
    }

    #[test]
    fn production_accepts_operator_secret() {
        let secret = "an-operator-supplied-secret-of-decent-length";
        let config = load(&[("APP_ENV", "production"), ("SECRET_KEY", secret)]).unwrap();

        assert_eq!(config.secret_key, secret);
        assert!(!format!("{config:?}").contains(secret));
    }

    #[test]
    fn only_hmac_algorithms() {
        assert_eq!(
            load(&[("ALGORITHM", "HS512")]).unwrap().algorithm,
            Algorithm::HS512
        );
        assert!(matches!(
            load(&[("ALGORITHM", "RS256")]),
            Err(ConfigError::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            load(&[("ALGORITHM", "none")]),
            Err(ConfigError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn token_lifetime_must_be_in_range() {
        assert_eq!(
            load(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "45")])
                .unwrap()
                .access_token_ttl,
            Duration::minutes(45)
        );
        assert_eq!(
            load(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "525600")])
                .unwrap()
                .access_token_ttl,
            Duration::days(365)
        );
        let max = i64::MAX.to_string();
        for bad in ["0", "-5", "soon", "525601", "1000000000000", max.as_str()] {
            assert!(matches!(
                load(&[("ACCESS_TOKEN_EXPIRE_MINUTES", bad)]),
                Err(ConfigError::InvalidTokenLifetime(_))
            ), "{bad}");
        }
    }
}
