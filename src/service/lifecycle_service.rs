use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{Duration, Utc};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::marketplace_conf::MarketplaceConfig;
use crate::dto::request_dto::{CreateRequestRequest, SubmitQuoteRequest};
use crate::model::audit::AuditSeverity;
use crate::model::request::{Quote, QuoteStatus, RequestStatus, ServiceRequest};
use crate::model::user::{ROLE_ADMIN, ROLE_CUSTOMER, ROLE_PROVIDER};
use crate::repository::audit_repo::AuditLogRepository;
use crate::repository::notification_repo::NotificationRepository;
use crate::repository::provider_repo::ProviderRepository;
use crate::repository::request_repo::RequestRepository;
use crate::repository::settings_repo::SettingsRepository;
use crate::service::matching::{provider_matches_request, should_nudge_refinement};
use crate::util::error::ServiceError;
use crate::util::jwt::Claims;

/// Single point of truth for request/quote mutation. Enforces the
/// lifecycle state machine and the at-most-one-accepted-quote invariant;
/// audit and notification side effects are best-effort.
#[async_trait]
pub trait RequestLifecycleService: Send + Sync {
    async fn create_request(
        &self,
        claims: &Claims,
        dto: CreateRequestRequest,
    ) -> Result<ServiceRequest, ServiceError>;
    async fn submit_quote(
        &self,
        claims: &Claims,
        request_id: &str,
        dto: SubmitQuoteRequest,
    ) -> Result<ServiceRequest, ServiceError>;
    async fn accept_quote(
        &self,
        claims: &Claims,
        request_id: &str,
        quote_id: &str,
    ) -> Result<ServiceRequest, ServiceError>;
    async fn complete_order(
        &self,
        claims: &Claims,
        request_id: &str,
    ) -> Result<ServiceRequest, ServiceError>;
    async fn delete_request(&self, claims: &Claims, request_id: &str) -> Result<(), ServiceError>;

    async fn get_request(
        &self,
        claims: &Claims,
        request_id: &str,
    ) -> Result<ServiceRequest, ServiceError>;
    async fn list_my_requests(&self, claims: &Claims) -> Result<Vec<ServiceRequest>, ServiceError>;
    /// Open and quoted requests whose category matches the calling
    /// provider's service types.
    async fn matching_requests(&self, claims: &Claims)
        -> Result<Vec<ServiceRequest>, ServiceError>;
    /// The caller's requests that have sat open without quotes past the
    /// configured nudge window.
    async fn refinement_nudges(&self, claims: &Claims)
        -> Result<Vec<ServiceRequest>, ServiceError>;
}

pub struct LifecycleServiceImpl {
    pub request_repo: Arc<dyn RequestRepository>,
    pub provider_repo: Arc<dyn ProviderRepository>,
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub audit: Arc<dyn AuditLogRepository>,
    pub config: MarketplaceConfig,
}

impl LifecycleServiceImpl {
    pub fn new(
        request_repo: Arc<dyn RequestRepository>,
        provider_repo: Arc<dyn ProviderRepository>,
        settings_repo: Arc<dyn SettingsRepository>,
        notifications: Arc<dyn NotificationRepository>,
        audit: Arc<dyn AuditLogRepository>,
        config: MarketplaceConfig,
    ) -> Self {
        LifecycleServiceImpl {
            request_repo,
            provider_repo,
            settings_repo,
            notifications,
            audit,
            config,
        }
    }

    fn parse_id(hex: &str, what: &str) -> Result<ObjectId, ServiceError> {
        ObjectId::parse_str(hex)
            .map_err(|_| ServiceError::InvalidInput(format!("Invalid {} id: {}", what, hex)))
    }

    fn caller_id(claims: &Claims) -> Result<ObjectId, ServiceError> {
        Self::parse_id(&claims.sub, "user")
    }

    fn require_role(claims: &Claims, role: &str) -> Result<(), ServiceError> {
        if claims.role == role || claims.role == ROLE_ADMIN {
            Ok(())
        } else {
            Err(ServiceError::Unauthorized(format!(
                "Operation requires the {} role",
                role
            )))
        }
    }

    fn require_owner_or_admin(claims: &Claims, request: &ServiceRequest) -> Result<(), ServiceError> {
        if claims.role == ROLE_ADMIN || claims.sub == request.user_id.to_hex() {
            Ok(())
        } else {
            Err(ServiceError::Unauthorized(
                "Caller does not own this request".to_string(),
            ))
        }
    }

    /// Audit writes never fail the primary operation.
    async fn audit_entry(&self, claims: &Claims, action: &str, details: String, severity: AuditSeverity) {
        let actor_id = match ObjectId::parse_str(&claims.sub) {
            Ok(id) => id,
            Err(_) => return,
        };
        if let Err(e) = self
            .audit
            .record(actor_id, action, &details, &claims.role, severity)
            .await
        {
            warn!("Audit record failed for {}: {}", action, e);
        }
    }

    /// Notification writes never fail the primary operation.
    async fn notify_user(&self, user_id: ObjectId, title: &str, body: &str) {
        if let Err(e) = self.notifications.notify(user_id, title, body).await {
            warn!("Notification delivery failed: {}", e);
        }
    }

    /// Notify the user behind a provider profile, if the profile resolves.
    async fn notify_provider(&self, provider_id: ObjectId, title: &str, body: &str) {
        match self.provider_repo.get_by_id(provider_id).await {
            Ok(profile) => self.notify_user(profile.user_id, title, body).await,
            Err(e) => warn!("Could not resolve provider {} for notification: {}", provider_id, e),
        }
    }

    async fn category_is_recognized(&self, category: &str) -> Result<bool, ServiceError> {
        match self.settings_repo.get().await? {
            Some(settings) => Ok(settings.has_category(category)),
            None => Ok(self
                .config
                .default_categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(category.trim()))),
        }
    }
}

#[async_trait]
impl RequestLifecycleService for LifecycleServiceImpl {
    #[instrument(skip(self, claims, dto), fields(user = %claims.sub, category = %dto.category))]
    async fn create_request(
        &self,
        claims: &Claims,
        dto: CreateRequestRequest,
    ) -> Result<ServiceRequest, ServiceError> {
        Self::require_role(claims, ROLE_CUSTOMER)?;
        let user_id = Self::caller_id(claims)?;

        if !self.category_is_recognized(&dto.category).await? {
            return Err(ServiceError::InvalidInput(format!(
                "Unrecognized category: {}",
                dto.category
            )));
        }

        let request = ServiceRequest {
            id: None,
            user_id,
            category: dto.category,
            title: dto.title,
            description: dto.description,
            locality: dto.locality,
            status: RequestStatus::Open,
            created_at: Utc::now(),
            quotes: Vec::new(),
        };

        let created = self.request_repo.create(request).await?;
        info!("Service request created");

        let details = format!(
            "Created request {} in category {}",
            created.id.map(|id| id.to_hex()).unwrap_or_default(),
            created.category
        );
        self.audit_entry(claims, "request.create", details, AuditSeverity::Info)
            .await;

        Ok(created)
    }

    #[instrument(skip(self, claims, dto), fields(user = %claims.sub, request = %request_id))]
    async fn submit_quote(
        &self,
        claims: &Claims,
        request_id: &str,
        dto: SubmitQuoteRequest,
    ) -> Result<ServiceRequest, ServiceError> {
        Self::require_role(claims, ROLE_PROVIDER)?;
        let user_id = Self::caller_id(claims)?;
        let request_id = Self::parse_id(request_id, "request")?;

        let profile = self
            .provider_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Unauthorized("Caller has no provider profile".to_string())
            })?;
        let profile_id = profile
            .id
            .ok_or_else(|| ServiceError::Internal("Provider profile has no id".to_string()))?;

        let claimed_id = Self::parse_id(&dto.provider_id, "provider")?;
        if claimed_id != profile_id {
            error!("Provider id mismatch: caller owns {} but submitted {}", profile_id, claimed_id);
            return Err(ServiceError::Unauthorized(
                "Quote provider does not match caller identity".to_string(),
            ));
        }

        if self.config.single_quote_per_provider {
            let current = self.request_repo.get_by_id(request_id).await?;
            if current.has_quote_from(&profile_id) {
                return Err(ServiceError::InvalidInput(
                    "Provider has already quoted this request".to_string(),
                ));
            }
        }

        let quote = Quote {
            id: Uuid::new_v4().to_string(),
            provider_id: profile_id,
            provider_name: profile.name.clone(),
            price: dto.price,
            currency: dto.currency,
            timeline: dto.timeline,
            description: dto.description,
            rating: profile.rating,
            verified: profile.verified,
            status: QuoteStatus::Pending,
        };

        let matched = self.request_repo.push_quote(request_id, quote).await?;
        if !matched {
            // Either the request is gone or it no longer takes quotes;
            // a follow-up read tells the two apart.
            let current = self.request_repo.get_by_id(request_id).await?;
            return Err(ServiceError::InvalidStateTransition(format!(
                "Request is {} and no longer accepts quotes",
                current.status.as_str()
            )));
        }

        let updated = self.request_repo.get_by_id(request_id).await?;
        info!("Quote submitted");

        self.notify_user(
            updated.user_id,
            "New quote received",
            &format!("{} quoted on \"{}\"", profile.name, updated.title),
        )
        .await;
        let details = format!("Quote by provider {} on request {}", profile_id, request_id);
        self.audit_entry(claims, "quote.submit", details, AuditSeverity::Info)
            .await;

        Ok(updated)
    }

    #[instrument(skip(self, claims), fields(user = %claims.sub, request = %request_id, quote = %quote_id))]
    async fn accept_quote(
        &self,
        claims: &Claims,
        request_id: &str,
        quote_id: &str,
    ) -> Result<ServiceRequest, ServiceError> {
        let request_id = Self::parse_id(request_id, "request")?;
        let request = self.request_repo.get_by_id(request_id).await?;
        Self::require_owner_or_admin(claims, &request)?;

        if request.quote(quote_id).is_none() {
            return Err(ServiceError::NotFound(format!(
                "Quote {} not found on request {}",
                quote_id, request_id
            )));
        }

        let won = self.request_repo.accept_quote(request_id, quote_id).await?;
        if !won {
            let current = self.request_repo.get_by_id(request_id).await?;
            return Err(ServiceError::InvalidStateTransition(format!(
                "Cannot accept a quote on a {} request",
                current.status.as_str()
            )));
        }

        let updated = self.request_repo.get_by_id(request_id).await?;
        info!("Quote accepted");

        for quote in &updated.quotes {
            let (title, body) = if quote.id == quote_id {
                (
                    "Quote accepted",
                    format!("Your quote on \"{}\" was accepted", updated.title),
                )
            } else {
                (
                    "Quote not selected",
                    format!("Your quote on \"{}\" was not selected", updated.title),
                )
            };
            self.notify_provider(quote.provider_id, title, &body).await;
        }

        let details = format!("Accepted quote {} on request {}", quote_id, request_id);
        self.audit_entry(claims, "quote.accept", details, AuditSeverity::Info)
            .await;

        Ok(updated)
    }

    #[instrument(skip(self, claims), fields(user = %claims.sub, request = %request_id))]
    async fn complete_order(
        &self,
        claims: &Claims,
        request_id: &str,
    ) -> Result<ServiceRequest, ServiceError> {
        let request_id = Self::parse_id(request_id, "request")?;
        let request = self.request_repo.get_by_id(request_id).await?;
        Self::require_owner_or_admin(claims, &request)?;

        let moved = self
            .request_repo
            .set_status_if(request_id, RequestStatus::Accepted, RequestStatus::Closed)
            .await?;
        if !moved {
            let current = self.request_repo.get_by_id(request_id).await?;
            return Err(ServiceError::InvalidStateTransition(format!(
                "Cannot complete a {} request",
                current.status.as_str()
            )));
        }

        let updated = self.request_repo.get_by_id(request_id).await?;
        info!("Order completed");

        if let Some(winner) = updated.accepted_quote() {
            self.notify_provider(
                winner.provider_id,
                "Order completed",
                &format!("The order for \"{}\" was marked complete", updated.title),
            )
            .await;
        }

        let details = format!("Completed order on request {}", request_id);
        self.audit_entry(claims, "order.complete", details, AuditSeverity::Info)
            .await;

        Ok(updated)
    }

    #[instrument(skip(self, claims), fields(user = %claims.sub, request = %request_id))]
    async fn delete_request(&self, claims: &Claims, request_id: &str) -> Result<(), ServiceError> {
        let request_id = Self::parse_id(request_id, "request")?;
        let request = self.request_repo.get_by_id(request_id).await?;
        Self::require_owner_or_admin(claims, &request)?;

        self.request_repo.delete(request_id).await?;
        info!("Service request deleted");

        // Moderator deletions of someone else's content stand out in the trail.
        let severity = if claims.role == ROLE_ADMIN && claims.sub != request.user_id.to_hex() {
            AuditSeverity::Warning
        } else {
            AuditSeverity::Info
        };
        let details = format!("Deleted request {} ({})", request_id, request.title);
        self.audit_entry(claims, "request.delete", details, severity)
            .await;

        Ok(())
    }

    async fn get_request(
        &self,
        claims: &Claims,
        request_id: &str,
    ) -> Result<ServiceRequest, ServiceError> {
        let request_id = Self::parse_id(request_id, "request")?;
        let request = self.request_repo.get_by_id(request_id).await?;
        // Providers browse requests to quote them; customers only see
        // their own.
        if claims.role == ROLE_PROVIDER {
            return Ok(request);
        }
        Self::require_owner_or_admin(claims, &request)?;
        Ok(request)
    }

    async fn list_my_requests(&self, claims: &Claims) -> Result<Vec<ServiceRequest>, ServiceError> {
        let user_id = Self::caller_id(claims)?;
        let requests = self.request_repo.list_by_user(user_id).await?;
        Ok(requests)
    }

    async fn matching_requests(
        &self,
        claims: &Claims,
    ) -> Result<Vec<ServiceRequest>, ServiceError> {
        Self::require_role(claims, ROLE_PROVIDER)?;
        let user_id = Self::caller_id(claims)?;
        let profile = self
            .provider_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Unauthorized("Caller has no provider profile".to_string())
            })?;

        let candidates = self
            .request_repo
            .list_by_statuses(&[RequestStatus::Open, RequestStatus::Quoted])
            .await?;
        Ok(candidates
            .into_iter()
            .filter(|r| provider_matches_request(&profile, r))
            .collect())
    }

    async fn refinement_nudges(
        &self,
        claims: &Claims,
    ) -> Result<Vec<ServiceRequest>, ServiceError> {
        let user_id = Self::caller_id(claims)?;
        let window = Duration::hours(self.config.refine_nudge_hours);
        let now = Utc::now();
        let requests = self.request_repo.list_by_user(user_id).await?;
        Ok(requests
            .into_iter()
            .filter(|r| should_nudge_refinement(r, now, window))
            .collect())
    }
}
