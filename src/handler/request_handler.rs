use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use validator::Validate;

use crate::dto::request_dto::{CreateRequestRequest, SubmitQuoteRequest};
use crate::service::lifecycle_service::{LifecycleServiceImpl, RequestLifecycleService};
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

pub async fn create_request_handler(
    State(service): State<Arc<LifecycleServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateRequestRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::bad_request(format!("Validation error: {}", e)))?;
    let created = service.create_request(&claims, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_my_requests_handler(
    State(service): State<Arc<LifecycleServiceImpl>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, HandlerError> {
    let requests = service.list_my_requests(&claims).await?;
    Ok(Json(requests))
}

pub async fn get_request_handler(
    State(service): State<Arc<LifecycleServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let request = service.get_request(&claims, &id).await?;
    Ok(Json(request))
}

pub async fn submit_quote_handler(
    State(service): State<Arc<LifecycleServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<SubmitQuoteRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::bad_request(format!("Validation error: {}", e)))?;
    let updated = service.submit_quote(&claims, &id, payload).await?;
    Ok(Json(updated))
}

pub async fn accept_quote_handler(
    State(service): State<Arc<LifecycleServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path((id, quote_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, HandlerError> {
    let updated = service.accept_quote(&claims, &id, &quote_id).await?;
    Ok(Json(updated))
}

pub async fn complete_order_handler(
    State(service): State<Arc<LifecycleServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let updated = service.complete_order(&claims, &id).await?;
    Ok(Json(updated))
}

pub async fn delete_request_handler(
    State(service): State<Arc<LifecycleServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    service.delete_request(&claims, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn matching_requests_handler(
    State(service): State<Arc<LifecycleServiceImpl>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, HandlerError> {
    let requests = service.matching_requests(&claims).await?;
    Ok(Json(requests))
}

pub async fn refinement_nudges_handler(
    State(service): State<Arc<LifecycleServiceImpl>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, HandlerError> {
    let requests = service.refinement_nudges(&claims).await?;
    Ok(Json(requests))
}
