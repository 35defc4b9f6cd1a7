use std::sync::Arc;

use axum::{
    body::Body, extract::State, http::Request, http::StatusCode, middleware::Next,
    response::Response,
};

use crate::model::user::ROLE_ADMIN;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

fn claims_from_request(
    state: &AuthState,
    req: &Request<Body>,
) -> Result<crate::util::jwt::Claims, StatusCode> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = state
        .jwt_utils
        .extract_token_from_header(auth_header)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    state
        .jwt_utils
        .validate_access_token(&token)
        .map_err(|_| StatusCode::UNAUTHORIZED)
}

/// Validates the bearer token and stores the claims in request
/// extensions for handlers to pick up.
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let claims = claims_from_request(&state, &req)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Same as `require_auth`, but only admins pass.
pub async fn require_admin(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let claims = claims_from_request(&state, &req)?;
    if claims.role != ROLE_ADMIN {
        return Err(StatusCode::FORBIDDEN);
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
