use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handler::provider_handler::{create_provider_profile_handler, get_my_profile_handler};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::repository::provider_repo::ProviderRepository;

pub fn provider_router(repo: Arc<dyn ProviderRepository>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/providers", post(create_provider_profile_handler))
        .route("/providers/me", get(get_my_profile_handler))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            require_auth,
        ))
        .with_state(repo)
}
