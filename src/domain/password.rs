//! Password value object and the bcrypt codec that produces it.
//!
//! bcrypt is CPU-bound; the async codec methods run it on tokio's blocking
//! pool so request tasks never stall the reactor.

use crate::config::BCRYPT_COST;
use crate::errors::{AppError, AppResult};

/// Stored password hash. Never holds plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash plaintext with a fresh random salt at the given cost.
    pub fn hash_with_cost(plain_text: &str, cost: u32) -> AppResult<Self> {
        let hash = bcrypt::hash(plain_text, cost)?;
        Ok(Self { hash })
    }

    /// Wrap an existing hash (from database).
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify plaintext against this hash.
    ///
    /// A hash bcrypt cannot parse never matches.
    pub fn verify(&self, plain_text: &str) -> bool {
        match bcrypt::verify(plain_text, &self.hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!("Stored password hash could not be parsed: {}", e);
                false
            }
        }
    }
}

/// Hashes and compares passwords off the async executor.
#[derive(Clone, Debug)]
pub struct PasswordCodec {
    cost: u32,
    /// Compared against when no account exists, so that path costs a full bcrypt round.
    decoy: Password,
}

impl PasswordCodec {
    /// Build a codec at the given bcrypt cost.
    pub fn new(cost: u32) -> AppResult<Self> {
        let decoy = Password::hash_with_cost("decoy-password-never-matches", cost)?;
        Ok(Self { cost, decoy })
    }

    /// Codec at the production cost. The decoy hash is computed on the blocking pool.
    pub async fn production() -> AppResult<Self> {
        tokio::task::spawn_blocking(|| Self::new(BCRYPT_COST))
            .await
            .map_err(|e| AppError::internal(format!("Password codec setup failed: {}", e)))?
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub async fn hash(&self, plain_text: String) -> AppResult<Password> {
        let cost = self.cost;
        tokio::task::spawn_blocking(move || Password::hash_with_cost(&plain_text, cost))
            .await
            .map_err(|e| AppError::internal(format!("Password hash task failed: {}", e)))?
    }

    /// Compare plaintext against `stored`, or against the decoy when `stored` is `None`.
    ///
    /// Returns `false` whenever `stored` is `None`.
    pub async fn verify(&self, plain_text: String, stored: Option<Password>) -> AppResult<bool> {
        let exists = stored.is_some();
        let target = stored.unwrap_or_else(|| self.decoy.clone());

        let matches = tokio::task::spawn_blocking(move || target.verify(&plain_text))
            .await
            .map_err(|e| AppError::internal(format!("Password verify task failed: {}", e)))?;

        Ok(exists && matches)
    }
}
