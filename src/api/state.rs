//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::PasswordCodec;
use crate::errors::AppResult;
use crate::infra::{Database, UserStore};
use crate::services::{AuthService, Authenticator, TokenIssuer};

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
}

impl AppState {
    /// Wire the production services on top of a database connection.
    pub async fn from_config(database: &Database, config: &Config) -> AppResult<Self> {
        let users = Arc::new(UserStore::new(database.get_connection()));
        let auth_service = Authenticator::new(
            users,
            PasswordCodec::production().await?,
            TokenIssuer::new(config.token.clone()),
        );

        Ok(Self::new(Arc::new(auth_service)))
    }

    /// Create application state with a manually injected service.
    pub fn new(auth_service: Arc<dyn AuthService>) -> Self {
        Self { auth_service }
    }
}
