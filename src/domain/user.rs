//! User domain entity.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::Password;

/// Registered account as held by the user store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a freshly registered user with a new identifier
    pub fn new(email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stored hash as a password value object
    pub fn password(&self) -> Password {
        Password::from_hash(self.password_hash.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_omits_hash() {
        let user = User::new("a@b.com".into(), "$2b$04$hash".into());
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["email"], "a@b.com");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_new_users_get_distinct_ids() {
        let a = User::new("a@b.com".into(), "h".into());
        let b = User::new("a@b.com".into(), "h".into());
        assert_ne!(a.id, b.id);
    }
}
