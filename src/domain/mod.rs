//! Domain layer - Core business entities and logic
//!
//! Holds the user entity, the password codec and the request validators.
//! Nothing here knows about HTTP or the database.

pub mod password;
pub mod user;
pub mod validation;

pub use password::{Password, PasswordCodec};
pub use user::User;
pub use validation::{reject_unknown_fields, Credentials, Registration, ValidationError};
