use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::handler::notification_handler::{
    list_notifications_handler, mark_notification_read_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::repository::notification_repo::NotificationRepository;

pub fn notification_router(
    repo: Arc<dyn NotificationRepository>,
    auth_state: Arc<AuthState>,
) -> Router {
    Router::new()
        .route("/notifications", get(list_notifications_handler))
        .route(
            "/notifications/{id}/read",
            put(mark_notification_read_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            require_auth,
        ))
        .with_state(repo)
}
