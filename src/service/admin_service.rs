use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument, warn};

use crate::model::audit::{AuditLogEntry, AuditSeverity};
use crate::model::provider::ProviderProfile;
use crate::repository::audit_repo::AuditLogRepository;
use crate::repository::provider_repo::ProviderRepository;
use crate::repository::settings_repo::SettingsRepository;
use crate::repository::user_repo::UserRepository;
use crate::service::user_service::UserWithoutPassword;
use crate::util::error::ServiceError;
use crate::util::jwt::Claims;

/// Moderation surface: user and provider oversight plus site
/// configuration. Role gating happens in the admin middleware; the
/// service records every action in the audit trail.
#[async_trait]
pub trait AdminService: Send + Sync {
    async fn list_users(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<Vec<UserWithoutPassword>, ServiceError>;
    async fn list_providers(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<Vec<ProviderProfile>, ServiceError>;
    async fn set_provider_verified(
        &self,
        claims: &Claims,
        provider_id: &str,
        verified: bool,
    ) -> Result<(), ServiceError>;
    async fn add_category(&self, claims: &Claims, name: &str) -> Result<(), ServiceError>;
    async fn list_audit_logs(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<Vec<AuditLogEntry>, ServiceError>;
}

pub struct AdminServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
    pub provider_repo: Arc<dyn ProviderRepository>,
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub audit: Arc<dyn AuditLogRepository>,
}

impl AdminServiceImpl {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        provider_repo: Arc<dyn ProviderRepository>,
        settings_repo: Arc<dyn SettingsRepository>,
        audit: Arc<dyn AuditLogRepository>,
    ) -> Self {
        AdminServiceImpl {
            user_repo,
            provider_repo,
            settings_repo,
            audit,
        }
    }

    async fn audit_entry(&self, claims: &Claims, action: &str, details: String) {
        let actor_id = match ObjectId::parse_str(&claims.sub) {
            Ok(id) => id,
            Err(_) => return,
        };
        if let Err(e) = self
            .audit
            .record(actor_id, action, &details, &claims.role, AuditSeverity::Info)
            .await
        {
            warn!("Audit record failed for {}: {}", action, e);
        }
    }
}

#[async_trait]
impl AdminService for AdminServiceImpl {
    async fn list_users(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<Vec<UserWithoutPassword>, ServiceError> {
        let users = self.user_repo.list(page, limit).await?;
        Ok(users.into_iter().map(UserWithoutPassword::from).collect())
    }

    async fn list_providers(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<Vec<ProviderProfile>, ServiceError> {
        let providers = self.provider_repo.list(page, limit).await?;
        Ok(providers)
    }

    #[instrument(skip(self, claims), fields(provider = %provider_id, verified = verified))]
    async fn set_provider_verified(
        &self,
        claims: &Claims,
        provider_id: &str,
        verified: bool,
    ) -> Result<(), ServiceError> {
        let id = ObjectId::parse_str(provider_id)
            .map_err(|_| ServiceError::InvalidInput(format!("Invalid provider id: {}", provider_id)))?;
        self.provider_repo.set_verified(id, verified).await?;
        info!("Provider verification flag updated");

        let details = format!("Set provider {} verified={}", provider_id, verified);
        self.audit_entry(claims, "provider.verify", details).await;
        Ok(())
    }

    #[instrument(skip(self, claims), fields(category = %name))]
    async fn add_category(&self, claims: &Claims, name: &str) -> Result<(), ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Category name cannot be empty".to_string(),
            ));
        }
        self.settings_repo.add_category(name).await?;
        info!("Category added to site settings");

        let details = format!("Added category {}", name);
        self.audit_entry(claims, "settings.add_category", details).await;
        Ok(())
    }

    async fn list_audit_logs(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<Vec<AuditLogEntry>, ServiceError> {
        let entries = self.audit.list(page, limit).await?;
        Ok(entries)
    }
}
