//! User repository: lookup by email and insert.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::User;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User store used by the auth service.
///
/// Email matching is exact and case-sensitive for both operations.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user.
    ///
    /// Fails with `AppError::Conflict` if the email is already taken.
    async fn create(&self, email: String, password_hash: String) -> AppResult<User>;
}

/// PostgreSQL-backed implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn create(&self, email: String, password_hash: String) -> AppResult<User> {
        let new_user = User::new(email, password_hash);
        let active_model = ActiveModel {
            id: Set(new_user.id),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            created_at: Set(new_user.created_at),
            updated_at: Set(new_user.updated_at),
        };

        let model = active_model.insert(&self.db).await.map_err(insert_error)?;
        Ok(User::from(model))
    }
}

/// The unique email index turns a lost registration race into the ordinary conflict.
fn insert_error(err: DbErr) -> AppError {
    let sql_err = err.sql_err();
    classify_insert_error(err, sql_err)
}

fn classify_insert_error(err: DbErr, sql_err: Option<SqlErr>) -> AppError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::info!("Duplicate email rejected by unique index: {}", detail);
            AppError::Conflict
        }
        _ => AppError::from(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_constraint_errors_pass_through() {
        let err = insert_error(DbErr::Custom("connection reset".into()));
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_unique_violation_becomes_conflict() {
        let err = classify_insert_error(
            DbErr::Custom("duplicate key".into()),
            Some(SqlErr::UniqueConstraintViolation(
                "duplicate key value violates unique constraint \"idx_users_email_unique\"".into(),
            )),
        );
        assert!(matches!(err, AppError::Conflict));
    }

    #[test]
    fn test_other_constraint_violations_stay_database_errors() {
        let err = classify_insert_error(
            DbErr::Custom("fk".into()),
            Some(SqlErr::ForeignKeyConstraintViolation("fk".into())),
        );
        assert!(matches!(err, AppError::Database(_)));
    }
}
