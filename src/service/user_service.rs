use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::model::user::{User, ROLE_ADMIN, ROLE_CUSTOMER, ROLE_PROVIDER};
use crate::repository::user_repo::UserRepository;
use crate::util::error::ServiceError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl, TokenPair};
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

#[derive(Debug, Clone, Serialize)]
pub struct UserWithoutPassword {
    pub id: Option<ObjectId>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<User> for UserWithoutPassword {
    fn from(user: User) -> Self {
        UserWithoutPassword {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserAuthResponse {
    pub user: UserWithoutPassword,
    pub tokens: TokenPair,
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, user: User, password: String)
        -> Result<UserAuthResponse, ServiceError>;
    async fn login(&self, email: String, password: String)
        -> Result<UserAuthResponse, ServiceError>;
    async fn refresh_token(&self, refresh_token: String) -> Result<TokenPair, ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

impl UserServiceImpl {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Self {
        Self {
            user_repo,
            jwt_utils,
        }
    }

    fn token_pair_for(&self, user: &User) -> Result<TokenPair, ServiceError> {
        self.jwt_utils
            .generate_token_pair(
                &user.id.as_ref().map(|id| id.to_hex()).unwrap_or_default(),
                &user.email,
                &user.role,
            )
            .map_err(|e| ServiceError::Internal(format!("JWT error: {}", e)))
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, user, password), fields(username = %user.username, email = %user.email, role = %user.role))]
    async fn register(
        &self,
        mut user: User,
        password: String,
    ) -> Result<UserAuthResponse, ServiceError> {
        info!("Registering new user");

        if user.role != ROLE_CUSTOMER && user.role != ROLE_PROVIDER && user.role != ROLE_ADMIN {
            return Err(ServiceError::InvalidInput(format!(
                "Unknown role: {}",
                user.role
            )));
        }

        if let Err(problems) = PasswordUtilsImpl::validate_password_strength(&password) {
            return Err(ServiceError::InvalidInput(problems.join("; ")));
        }

        if let Some(existing) = self.user_repo.find_by_email(&user.email).await? {
            error!("Email already registered: {}", existing.email);
            return Err(ServiceError::InvalidInput(
                "Email is already registered".to_string(),
            ));
        }

        let hash = PasswordUtilsImpl::hash_password(&password)
            .map_err(|e| ServiceError::Internal(format!("Password hash error: {}", e)))?;
        user.password_hash = hash;

        let inserted = self.user_repo.insert(user).await?;
        let tokens = self.token_pair_for(&inserted)?;
        info!("User registered successfully");

        Ok(UserAuthResponse {
            user: inserted.into(),
            tokens,
        })
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(
        &self,
        email: String,
        password: String,
    ) -> Result<UserAuthResponse, ServiceError> {
        info!("User login attempt");

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        let valid = PasswordUtilsImpl::verify_password(&password, &user.password_hash)
            .map_err(|e| ServiceError::Internal(format!("Password verify error: {}", e)))?;
        if !valid {
            error!("Invalid credentials for user: {}", email);
            return Err(ServiceError::Unauthorized("Invalid credentials".to_string()));
        }

        let tokens = self.token_pair_for(&user)?;
        info!("User logged in successfully");

        Ok(UserAuthResponse {
            user: user.into(),
            tokens,
        })
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_token(&self, refresh_token: String) -> Result<TokenPair, ServiceError> {
        let claims = self
            .jwt_utils
            .validate_refresh_token(&refresh_token)
            .map_err(|e| ServiceError::Unauthorized(format!("Invalid refresh token: {}", e)))?;
        self.jwt_utils
            .generate_token_pair(&claims.sub, &claims.email, &claims.role)
            .map_err(|e| ServiceError::Internal(format!("JWT error: {}", e)))
    }
}
