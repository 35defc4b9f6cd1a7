use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use validator::Validate;

use crate::dto::admin_dto::{AddCategoryRequest, VerifyProviderRequest};
use crate::service::admin_service::{AdminService, AdminServiceImpl};
use crate::service::lifecycle_service::{LifecycleServiceImpl, RequestLifecycleService};
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

/// Shared state for the admin surface: moderation plus the lifecycle
/// service for content removal.
#[derive(Clone)]
pub struct AdminState {
    pub admin_service: Arc<AdminServiceImpl>,
    pub lifecycle_service: Arc<LifecycleServiceImpl>,
}

fn paging(params: &HashMap<String, String>) -> (u32, u32) {
    let page = params.get("page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let limit = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(20);
    (page, limit)
}

pub async fn list_users_handler(
    State(state): State<AdminState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let (page, limit) = paging(&params);
    let users = state.admin_service.list_users(page, limit).await?;
    Ok(Json(users))
}

pub async fn list_providers_handler(
    State(state): State<AdminState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let (page, limit) = paging(&params);
    let providers = state.admin_service.list_providers(page, limit).await?;
    Ok(Json(providers))
}

pub async fn verify_provider_handler(
    State(state): State<AdminState>,
    Extension(claims): Extension<Claims>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<VerifyProviderRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    state
        .admin_service
        .set_provider_verified(&claims, &id, payload.verified)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_category_handler(
    State(state): State<AdminState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddCategoryRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::bad_request(format!("Validation error: {}", e)))?;
    state
        .admin_service
        .add_category(&claims, &payload.name)
        .await?;
    Ok(StatusCode::CREATED)
}

pub async fn list_audit_logs_handler(
    State(state): State<AdminState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let (page, limit) = paging(&params);
    let entries = state.admin_service.list_audit_logs(page, limit).await?;
    Ok(Json(entries))
}

pub async fn admin_delete_request_handler(
    State(state): State<AdminState>,
    Extension(claims): Extension<Claims>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    state.lifecycle_service.delete_request(&claims, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
