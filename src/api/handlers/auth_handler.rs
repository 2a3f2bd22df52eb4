//! Authentication handlers.

use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::extractors::{Validate, ValidatedJson};
use crate::api::AppState;
use crate::config::REGISTER_SUCCESS_MESSAGE;
use crate::domain::{reject_unknown_fields, Credentials, Registration, ValidationError};
use crate::errors::AppResult;

/// User registration request.
///
/// Fields stay untyped until validation so type errors are reported per field.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: Option<Value>,
    pub password: Option<Value>,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: Option<Value>,
    #[serde(flatten)]
    pub unknown: BTreeMap<String, Value>,
}

impl Validate for RegisterRequest {
    type Output = Registration;

    fn validate(&self) -> Result<Registration, ValidationError> {
        let registration = Registration::validate(
            self.email.as_ref(),
            self.password.as_ref(),
            self.confirm_password.as_ref(),
        )?;
        reject_unknown_fields(self.unknown.keys())?;
        Ok(registration)
    }
}

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<Value>,
    pub password: Option<Value>,
    #[serde(flatten)]
    pub unknown: BTreeMap<String, Value>,
}

impl Validate for LoginRequest {
    type Output = Credentials;

    fn validate(&self) -> Result<Credentials, ValidationError> {
        let credentials = Credentials::validate(self.email.as_ref(), self.password.as_ref())?;
        reject_unknown_fields(self.unknown.keys())?;
        Ok(credentials)
    }
}

/// Registration acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Token returned after a successful login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(registration): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    state.auth_service.register(registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: REGISTER_SUCCESS_MESSAGE,
        }),
    ))
}

/// Login and get a signed token
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state.auth_service.login(credentials).await?;

    Ok(Json(TokenResponse { token }))
}
