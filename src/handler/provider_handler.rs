use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use bson::oid::ObjectId;
use validator::Validate;

use crate::dto::provider_dto::CreateProviderProfileRequest;
use crate::model::provider::ProviderProfile;
use crate::model::user::ROLE_PROVIDER;
use crate::repository::provider_repo::ProviderRepository;
use crate::util::error::{HandlerError, HandlerErrorKind, ServiceError};
use crate::util::jwt::Claims;

pub async fn create_provider_profile_handler(
    State(repo): State<Arc<dyn ProviderRepository>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateProviderProfileRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload
        .validate()
        .map_err(|e| HandlerError::bad_request(format!("Validation error: {}", e)))?;

    if claims.role != ROLE_PROVIDER {
        return Err(HandlerError {
            error: HandlerErrorKind::Forbidden,
            message: "Only providers can create a provider profile".to_string(),
            details: None,
        });
    }

    let user_id = ObjectId::parse_str(&claims.sub)
        .map_err(|_| HandlerError::bad_request("Invalid user id in token"))?;

    let existing = repo
        .find_by_user_id(user_id)
        .await
        .map_err(ServiceError::from)?;
    if existing.is_some() {
        return Err(HandlerError {
            error: HandlerErrorKind::Conflict,
            message: "Provider profile already exists".to_string(),
            details: None,
        });
    }

    let profile = ProviderProfile {
        id: None,
        user_id,
        name: payload.name,
        service_types: payload.service_types,
        locality: payload.locality,
        rating: None,
        verified: false,
        created_at: None,
        updated_at: None,
    };

    let created = repo.create(profile).await.map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_my_profile_handler(
    State(repo): State<Arc<dyn ProviderRepository>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, HandlerError> {
    let user_id = ObjectId::parse_str(&claims.sub)
        .map_err(|_| HandlerError::bad_request("Invalid user id in token"))?;
    let profile = repo
        .find_by_user_id(user_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| {
            HandlerError::from(ServiceError::NotFound("No provider profile".to_string()))
        })?;
    Ok(Json(profile))
}
