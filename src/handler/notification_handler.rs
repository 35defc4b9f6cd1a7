use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use bson::oid::ObjectId;

use crate::repository::notification_repo::NotificationRepository;
use crate::util::error::{HandlerError, ServiceError};
use crate::util::jwt::Claims;

pub async fn list_notifications_handler(
    State(repo): State<Arc<dyn NotificationRepository>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, HandlerError> {
    let user_id = ObjectId::parse_str(&claims.sub)
        .map_err(|_| HandlerError::bad_request("Invalid user id in token"))?;
    let notifications = repo
        .list_for_user(user_id)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(notifications))
}

pub async fn mark_notification_read_handler(
    State(repo): State<Arc<dyn NotificationRepository>>,
    Extension(claims): Extension<Claims>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let user_id = ObjectId::parse_str(&claims.sub)
        .map_err(|_| HandlerError::bad_request("Invalid user id in token"))?;
    let notification_id =
        ObjectId::parse_str(&id).map_err(|_| HandlerError::bad_request("Invalid notification id"))?;
    repo.mark_read(notification_id, user_id)
        .await
        .map_err(ServiceError::from)?;
    Ok(StatusCode::NO_CONTENT)
}
