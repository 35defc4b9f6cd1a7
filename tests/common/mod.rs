//! In-memory repository fakes for exercising the lifecycle service
//! without a running MongoDB. The request fake applies each conditional
//! update under one mutex, matching the atomicity of the real
//! single-document writes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;

use wasit_backend::config::marketplace_conf::MarketplaceConfig;
use wasit_backend::model::audit::{AuditLogEntry, AuditSeverity};
use wasit_backend::model::notification::Notification;
use wasit_backend::model::provider::ProviderProfile;
use wasit_backend::model::request::{Quote, QuoteStatus, RequestStatus, ServiceRequest};
use wasit_backend::model::settings::SiteSettings;
use wasit_backend::repository::audit_repo::AuditLogRepository;
use wasit_backend::repository::notification_repo::NotificationRepository;
use wasit_backend::repository::provider_repo::ProviderRepository;
use wasit_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use wasit_backend::repository::request_repo::RequestRepository;
use wasit_backend::repository::settings_repo::SettingsRepository;
use wasit_backend::service::lifecycle_service::LifecycleServiceImpl;
use wasit_backend::util::jwt::Claims;

#[derive(Default)]
pub struct InMemoryRequestRepository {
    requests: Mutex<HashMap<ObjectId, ServiceRequest>>,
}

#[async_trait]
impl RequestRepository for InMemoryRequestRepository {
    async fn create(&self, request: ServiceRequest) -> RepositoryResult<ServiceRequest> {
        let mut request = request;
        let id = ObjectId::new();
        request.id = Some(id);
        let mut map = self.requests.lock().unwrap();
        map.insert(id, request.clone());
        Ok(request)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<ServiceRequest> {
        let map = self.requests.lock().unwrap();
        map.get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Request {} not found", id)))
    }

    async fn push_quote(&self, id: ObjectId, quote: Quote) -> RepositoryResult<bool> {
        let mut map = self.requests.lock().unwrap();
        let request = match map.get_mut(&id) {
            Some(r) => r,
            None => return Ok(false),
        };
        match request.status {
            RequestStatus::Open | RequestStatus::Quoted => {
                request.quotes.push(quote);
                request.status = RequestStatus::Quoted;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn accept_quote(&self, id: ObjectId, quote_id: &str) -> RepositoryResult<bool> {
        let mut map = self.requests.lock().unwrap();
        let request = match map.get_mut(&id) {
            Some(r) => r,
            None => return Ok(false),
        };
        if request.status != RequestStatus::Quoted || request.quote(quote_id).is_none() {
            return Ok(false);
        }
        for q in &mut request.quotes {
            q.status = if q.id == quote_id {
                QuoteStatus::Accepted
            } else {
                QuoteStatus::Rejected
            };
        }
        request.status = RequestStatus::Accepted;
        Ok(true)
    }

    async fn set_status_if(
        &self,
        id: ObjectId,
        expected: RequestStatus,
        next: RequestStatus,
    ) -> RepositoryResult<bool> {
        let mut map = self.requests.lock().unwrap();
        let request = match map.get_mut(&id) {
            Some(r) => r,
            None => return Ok(false),
        };
        if request.status != expected {
            return Ok(false);
        }
        request.status = next;
        Ok(true)
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let mut map = self.requests.lock().unwrap();
        map.remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found(format!("Request {} not found", id)))
    }

    async fn list_by_user(&self, user_id: ObjectId) -> RepositoryResult<Vec<ServiceRequest>> {
        let map = self.requests.lock().unwrap();
        Ok(map
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_statuses(
        &self,
        statuses: &[RequestStatus],
    ) -> RepositoryResult<Vec<ServiceRequest>> {
        let map = self.requests.lock().unwrap();
        Ok(map
            .values()
            .filter(|r| statuses.contains(&r.status))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryProviderRepository {
    profiles: Mutex<Vec<ProviderProfile>>,
}

#[async_trait]
impl ProviderRepository for InMemoryProviderRepository {
    async fn create(&self, profile: ProviderProfile) -> RepositoryResult<ProviderProfile> {
        let mut profile = profile;
        profile.id = Some(ObjectId::new());
        let mut profiles = self.profiles.lock().unwrap();
        profiles.push(profile.clone());
        Ok(profile)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<ProviderProfile> {
        let profiles = self.profiles.lock().unwrap();
        profiles
            .iter()
            .find(|p| p.id == Some(id))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Provider {} not found", id)))
    }

    async fn find_by_user_id(
        &self,
        user_id: ObjectId,
    ) -> RepositoryResult<Option<ProviderProfile>> {
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn set_verified(&self, id: ObjectId, verified: bool) -> RepositoryResult<()> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == Some(id))
            .ok_or_else(|| RepositoryError::not_found(format!("Provider {} not found", id)))?;
        profile.verified = verified;
        Ok(())
    }

    async fn list(&self, _page: u32, _limit: u32) -> RepositoryResult<Vec<ProviderProfile>> {
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles.clone())
    }
}

pub struct InMemorySettingsRepository {
    settings: Mutex<Option<SiteSettings>>,
}

impl InMemorySettingsRepository {
    pub fn with_categories(categories: Vec<&str>) -> Self {
        let categories = categories.into_iter().map(String::from).collect();
        InMemorySettingsRepository {
            settings: Mutex::new(Some(SiteSettings::new(categories))),
        }
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn get(&self) -> RepositoryResult<Option<SiteSettings>> {
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn seed(&self, settings: SiteSettings) -> RepositoryResult<()> {
        let mut guard = self.settings.lock().unwrap();
        if guard.is_none() {
            *guard = Some(settings);
        }
        Ok(())
    }

    async fn add_category(&self, name: &str) -> RepositoryResult<()> {
        let mut guard = self.settings.lock().unwrap();
        let settings = guard
            .get_or_insert_with(|| SiteSettings::new(Vec::new()));
        if !settings.has_category(name) {
            settings.categories.push(name.to_string());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryNotificationRepository {
    pub notifications: Mutex<Vec<Notification>>,
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn notify(&self, user_id: ObjectId, title: &str, body: &str) -> RepositoryResult<()> {
        let mut notifications = self.notifications.lock().unwrap();
        notifications.push(Notification {
            id: Some(ObjectId::new()),
            user_id,
            title: title.to_string(),
            body: body.to_string(),
            read: false,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn list_for_user(&self, user_id: ObjectId) -> RepositoryResult<Vec<Notification>> {
        let notifications = self.notifications.lock().unwrap();
        Ok(notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: ObjectId, user_id: ObjectId) -> RepositoryResult<()> {
        let mut notifications = self.notifications.lock().unwrap();
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == Some(id) && n.user_id == user_id)
            .ok_or_else(|| RepositoryError::not_found(format!("Notification {} not found", id)))?;
        notification.read = true;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryAuditLogRepository {
    pub entries: Mutex<Vec<AuditLogEntry>>,
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
    async fn record(
        &self,
        actor_id: ObjectId,
        action: &str,
        details: &str,
        actor_role: &str,
        severity: AuditSeverity,
    ) -> RepositoryResult<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.push(AuditLogEntry {
            id: Some(ObjectId::new()),
            actor_id,
            action: action.to_string(),
            details: details.to_string(),
            actor_role: actor_role.to_string(),
            severity,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn list(&self, _page: u32, _limit: u32) -> RepositoryResult<Vec<AuditLogEntry>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.clone())
    }
}

/// Everything a lifecycle test needs, with handles kept on the fakes so
/// assertions can inspect side effects.
pub struct TestHarness {
    pub service: Arc<LifecycleServiceImpl>,
    pub requests: Arc<InMemoryRequestRepository>,
    pub providers: Arc<InMemoryProviderRepository>,
    pub notifications: Arc<InMemoryNotificationRepository>,
    pub audit: Arc<InMemoryAuditLogRepository>,
}

pub fn build_harness(config: MarketplaceConfig) -> TestHarness {
    let requests = Arc::new(InMemoryRequestRepository::default());
    let providers = Arc::new(InMemoryProviderRepository::default());
    let settings = Arc::new(InMemorySettingsRepository::with_categories(vec![
        "Visa Services",
        "Business Setup",
        "Travel Packages",
    ]));
    let notifications = Arc::new(InMemoryNotificationRepository::default());
    let audit = Arc::new(InMemoryAuditLogRepository::default());

    let service = Arc::new(LifecycleServiceImpl::new(
        requests.clone(),
        providers.clone(),
        settings,
        notifications.clone(),
        audit.clone(),
        config,
    ));

    TestHarness {
        service,
        requests,
        providers,
        notifications,
        audit,
    }
}

pub fn claims_for(user_id: &ObjectId, role: &str) -> Claims {
    Claims {
        sub: user_id.to_hex(),
        email: format!("{}@example.com", role),
        role: role.to_string(),
        iat: Utc::now().timestamp(),
        exp: Utc::now().timestamp() + 3600,
        token_type: "access".to_string(),
        jti: "test-token".to_string(),
    }
}

/// Registers a provider profile and returns its claims plus profile id.
pub async fn seed_provider(harness: &TestHarness, name: &str, service_types: Vec<&str>) -> (Claims, ObjectId) {
    let user_id = ObjectId::new();
    let profile = ProviderProfile {
        id: None,
        user_id,
        name: name.to_string(),
        service_types: service_types.into_iter().map(String::from).collect(),
        locality: None,
        rating: Some(4.5),
        verified: true,
        created_at: None,
        updated_at: None,
    };
    let created = harness
        .providers
        .create(profile)
        .await
        .expect("provider create");
    let profile_id = created.id.expect("profile id");
    (claims_for(&user_id, "provider"), profile_id)
}
