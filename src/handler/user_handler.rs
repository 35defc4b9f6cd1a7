use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::dto::user_dto::{LoginRequest, RefreshTokenRequest, RegisterRequest};
use crate::model::user::{User, ROLE_ADMIN};
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::error::{HandlerError, HandlerErrorKind};

pub async fn register_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::bad_request(format!("Validation error: {}", e)))?;

    // Admins come from bootstrap config, never from the public endpoint.
    if payload.role == ROLE_ADMIN {
        return Err(HandlerError {
            error: HandlerErrorKind::Forbidden,
            message: "Cannot self-register as admin".to_string(),
            details: None,
        });
    }

    let user = User {
        id: None,
        username: payload.username,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        password_hash: String::new(),
        role: payload.role,
        created_at: None,
        updated_at: None,
    };

    let response = service.register(user, payload.password).await?;
    Ok(Json(response))
}

pub async fn login_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::bad_request(format!("Validation error: {}", e)))?;
    let response = service.login(payload.email, payload.password).await?;
    Ok(Json(response))
}

pub async fn refresh_token_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::bad_request(format!("Validation error: {}", e)))?;
    let tokens = service.refresh_token(payload.refresh_token).await?;
    Ok(Json(tokens))
}
