use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handler::request_handler::{
    accept_quote_handler, complete_order_handler, create_request_handler, delete_request_handler,
    get_request_handler, list_my_requests_handler, matching_requests_handler,
    refinement_nudges_handler, submit_quote_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::lifecycle_service::LifecycleServiceImpl;

pub fn request_router(service: Arc<LifecycleServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Static paths before parameterized ones so /requests/matching is
    // never captured by /requests/{id}.
    Router::new()
        .route(
            "/requests",
            post(create_request_handler).get(list_my_requests_handler),
        )
        .route("/requests/matching", get(matching_requests_handler))
        .route("/requests/nudges", get(refinement_nudges_handler))
        .route(
            "/requests/{id}",
            get(get_request_handler).delete(delete_request_handler),
        )
        .route("/requests/{id}/quotes", post(submit_quote_handler))
        .route(
            "/requests/{id}/quotes/{quote_id}/accept",
            post(accept_quote_handler),
        )
        .route("/requests/{id}/complete", post(complete_order_handler))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            require_auth,
        ))
        .with_state(service)
}
