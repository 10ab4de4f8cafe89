pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod rest;

use std::sync::Arc;

use sqlx::sqlite::SqlitePool;

use crate::auth::{AuthError, AuthService, PasswordPolicy, TokenService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(db: SqlitePool, auth: AuthService) -> Self {
        Self {
            db,
            auth: Arc::new(auth),
        }
    }

    /// Wires the auth core to the pool using the loaded configuration.
    pub fn from_config(db: SqlitePool, config: &Config) -> Result<Self, AuthError> {
        let tokens = TokenService::new(
            config.secret_key.as_bytes(),
            config.algorithm,
            config.access_token_ttl,
        );
        let auth = AuthService::new(Arc::new(db.clone()), PasswordPolicy::default(), tokens)?;
        Ok(Self::new(db, auth))
    }
}
