use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::model::user::ROLE_ADMIN;

/// JWT token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID, ObjectId hex)
    pub sub: String,
    /// User email
    pub email: String,
    /// User role (customer, provider, admin)
    pub role: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Token type (access or refresh)
    pub token_type: String,
    /// Unique token id
    pub jti: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

#[derive(Debug, Clone)]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to encode JWT token: {0}")]
    EncodingFailed(String),
    #[error("Failed to decode JWT token: {0}")]
    DecodingFailed(String),
    #[error("Token has expired")]
    TokenExpired,
    #[error("Invalid token format")]
    InvalidToken,
    #[error("Invalid token type: expected {expected}, got {actual}")]
    InvalidTokenType { expected: String, actual: String },
}

pub trait JwtTokenUtils {
    fn generate_access_token(&self, user_id: &str, email: &str, role: &str)
        -> Result<String, JwtError>;
    fn generate_refresh_token(
        &self,
        user_id: &str,
        email: &str,
        role: &str,
    ) -> Result<String, JwtError>;
    fn generate_token_pair(&self, user_id: &str, email: &str, role: &str)
        -> Result<TokenPair, JwtError>;
    fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError>;
    fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError>;
    fn extract_token_from_header(&self, auth_header: &str) -> Result<String, JwtError>;
    fn check_role_permission(&self, user_role: &str, required_role: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct JwtTokenUtilsImpl {
    pub jwt_config: JwtConfig,
}

impl JwtTokenUtilsImpl {
    pub fn new(jwt_config: JwtConfig) -> Self {
        JwtTokenUtilsImpl { jwt_config }
    }

    fn generate_token(
        &self,
        user_id: &str,
        email: &str,
        role: &str,
        token_type: TokenType,
        expires_in_minutes: i64,
    ) -> Result<String, JwtError> {
        debug!(
            "Generating {} token for user: {} with role: {}",
            token_type.as_str(),
            user_id,
            role
        );

        let now = Utc::now();
        let expiration = now + Duration::minutes(expires_in_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            token_type: token_type.as_str().to_string(),
            jti: Uuid::new_v4().to_string(),
        };

        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(self.jwt_config.jwt_secret.as_ref());

        encode(&header, &claims, &encoding_key).map_err(|err| {
            error!("Failed to encode JWT token: {}", err);
            JwtError::EncodingFailed(err.to_string())
        })
    }

    pub fn validate_token(
        &self,
        token: &str,
        expected_token_type: Option<TokenType>,
    ) -> Result<Claims, JwtError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_config.jwt_secret.as_ref());
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|err| {
            debug!("Failed to decode JWT token: {}", err);
            JwtError::DecodingFailed(err.to_string())
        })?;
        let claims = token_data.claims;

        if claims.exp < Utc::now().timestamp() {
            warn!("Token has expired for user: {}", claims.sub);
            return Err(JwtError::TokenExpired);
        }

        if let Some(expected_type) = expected_token_type {
            if claims.token_type != expected_type.as_str() {
                return Err(JwtError::InvalidTokenType {
                    expected: expected_type.as_str().to_string(),
                    actual: claims.token_type.clone(),
                });
            }
        }

        Ok(claims)
    }
}

impl JwtTokenUtils for JwtTokenUtilsImpl {
    fn generate_access_token(
        &self,
        user_id: &str,
        email: &str,
        role: &str,
    ) -> Result<String, JwtError> {
        self.generate_token(
            user_id,
            email,
            role,
            TokenType::Access,
            self.jwt_config.access_token_expiration,
        )
    }

    fn generate_refresh_token(
        &self,
        user_id: &str,
        email: &str,
        role: &str,
    ) -> Result<String, JwtError> {
        self.generate_token(
            user_id,
            email,
            role,
            TokenType::Refresh,
            self.jwt_config.refresh_token_expiration,
        )
    }

    fn generate_token_pair(
        &self,
        user_id: &str,
        email: &str,
        role: &str,
    ) -> Result<TokenPair, JwtError> {
        let access_token = self.generate_access_token(user_id, email, role)?;
        let refresh_token = self.generate_refresh_token(user_id, email, role)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            // minutes to seconds
            expires_in: self.jwt_config.access_token_expiration * 60,
            token_type: "Bearer".to_string(),
        })
    }

    fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_token(token, Some(TokenType::Access))
    }

    fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_token(token, Some(TokenType::Refresh))
    }

    fn extract_token_from_header(&self, auth_header: &str) -> Result<String, JwtError> {
        if !auth_header.starts_with("Bearer ") {
            return Err(JwtError::InvalidToken);
        }

        let token = auth_header.trim_start_matches("Bearer ").trim();
        if token.is_empty() {
            return Err(JwtError::InvalidToken);
        }

        Ok(token.to_string())
    }

    fn check_role_permission(&self, user_role: &str, required_role: &str) -> bool {
        // Admin passes every gate; other roles must match exactly.
        user_role == ROLE_ADMIN || user_role == required_role
    }
}
