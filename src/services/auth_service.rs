//! Authentication service - registration and login.
//!
//! Both operations take already-validated input. Registration and login
//! failures caused by the caller all surface as the same generic error.

use async_trait::async_trait;
use std::sync::Arc;

use super::TokenIssuer;
use crate::domain::{Credentials, PasswordCodec, Registration, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user. No token is issued.
    async fn register(&self, registration: Registration) -> AppResult<User>;

    /// Check credentials and return a signed token
    async fn login(&self, credentials: Credentials) -> AppResult<String>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    passwords: PasswordCodec,
    tokens: TokenIssuer,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: PasswordCodec,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        if self
            .users
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            tracing::info!("Registration rejected: email already registered");
            return Err(AppError::Conflict);
        }

        let password = self.passwords.hash(registration.password).await?;
        let user = self
            .users
            .create(registration.email, password.into_string())
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, credentials: Credentials) -> AppResult<String> {
        let user = self.users.find_by_email(&credentials.email).await?;

        // Unknown emails are still compared (against a decoy hash) so both
        // failure paths cost one bcrypt verification.
        let stored = user.as_ref().map(User::password);
        let matches = self.passwords.verify(credentials.password, stored).await?;

        let user = match user {
            Some(user) if matches => user,
            _ => {
                tracing::info!("Login rejected: invalid credentials");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.tokens.issue(user.id)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::config::{TokenConfig, TokenExpiry};
    use crate::domain::Password;
    use crate::infra::MockUserRepository;

    const TEST_COST: u32 = 4;
    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    fn tokens() -> TokenIssuer {
        TokenIssuer::new(TokenConfig::new(
            SECRET,
            TokenExpiry::from_seconds(3600).unwrap(),
        ))
    }

    fn service(repo: MockUserRepository) -> Authenticator {
        Authenticator::new(
            Arc::new(repo),
            PasswordCodec::new(TEST_COST).unwrap(),
            tokens(),
        )
    }

    fn registration() -> Registration {
        Registration {
            email: "a@b.com".into(),
            password: "secret1".into(),
        }
    }

    fn credentials(password: &str) -> Credentials {
        Credentials {
            email: "a@b.com".into(),
            password: password.into(),
        }
    }

    fn stored_user() -> User {
        let hash = Password::hash_with_cost("secret1", TEST_COST).unwrap();
        User::new("a@b.com".into(), hash.into_string())
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("a@b.com"))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_create()
            .withf(|email, hash| {
                email == "a@b.com" && hash != "secret1" && bcrypt::verify("secret1", hash).unwrap()
            })
            .times(1)
            .returning(|email, hash| Ok(User::new(email, hash)));

        let user = service(repo).register(registration()).await.unwrap();

        assert_eq!(user.email, "a@b.com");
        assert!(user.password().verify("secret1"));
    }

    #[tokio::test]
    async fn test_register_existing_email_conflicts_without_insert() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(stored_user())));
        repo.expect_create().never();

        let result = service(repo).register(registration()).await;

        assert!(matches!(result, Err(AppError::Conflict)));
    }

    #[tokio::test]
    async fn test_register_propagates_insert_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().returning(|_, _| Err(AppError::Conflict));

        let result = service(repo).register(registration()).await;

        assert!(matches!(result, Err(AppError::Conflict)));
    }

    #[tokio::test]
    async fn test_register_propagates_store_errors() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Err(AppError::internal("store down")));
        repo.expect_create().never();

        let result = service(repo).register(registration()).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_login_success_returns_token_for_user() {
        let user = stored_user();
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("a@b.com"))
            .returning(move |_| Ok(Some(user.clone())));

        let token = service(repo).login(credentials("secret1")).await.unwrap();
        let claims = tokens().verify(&token).unwrap();

        assert_eq!(claims.id, user_id);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(stored_user())));

        let result = service(repo).login(credentials("wrong")).await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let result = service(repo).login(credentials("secret1")).await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_corrupt_stored_hash_is_mismatch() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(User::new("a@b.com".into(), "garbage".into()))));

        let result = service(repo).login(credentials("garbage")).await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }
}
