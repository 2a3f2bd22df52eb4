//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::domain::ValidationError;
use crate::errors::AppError;

/// Field reported when the body itself cannot be read as the expected JSON object.
const BODY_FIELD: &str = "body";

/// Raw request bodies that validate into a typed value.
pub trait Validate {
    type Output;

    fn validate(&self) -> Result<Self::Output, ValidationError>;
}

/// Extracts `R` from a JSON body and yields its validated output.
///
/// # Example
///
/// ```rust,ignore
/// async fn register(ValidatedJson(registration): ValidatedJson<RegisterRequest>) {
///     // registration is a validated `Registration`
/// }
/// ```
pub struct ValidatedJson<R: Validate>(pub R::Output);

#[async_trait]
impl<S, R> FromRequest<S> for ValidatedJson<R>
where
    S: Send + Sync,
    R: DeserializeOwned + Validate,
    Json<R>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<R>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(BODY_FIELD, e.body_text()))?;

        Ok(ValidatedJson(raw.validate()?))
    }
}
