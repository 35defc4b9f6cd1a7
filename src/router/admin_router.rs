use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handler::admin_handler::{
    add_category_handler, admin_delete_request_handler, list_audit_logs_handler,
    list_providers_handler, list_users_handler, verify_provider_handler, AdminState,
};
use crate::middlewares::auth_middleware::{require_admin, AuthState};

pub fn admin_router(state: AdminState, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/admin/users", get(list_users_handler))
        .route("/admin/providers", get(list_providers_handler))
        .route(
            "/admin/providers/{id}/verified",
            put(verify_provider_handler),
        )
        .route("/admin/categories", post(add_category_handler))
        .route("/admin/audit-logs", get(list_audit_logs_handler))
        .route("/admin/requests/{id}", delete(admin_delete_request_handler))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            require_admin,
        ))
        .with_state(state)
}
