use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tracing::{error, info, warn};

use crate::config::admin_user_conf::AdminUserConfig;
use crate::config::app_conf::AppConfig;
use crate::config::jwt_conf::JwtConfig;
use crate::config::marketplace_conf::MarketplaceConfig;
use crate::config::mongo_conf::MongoConfig;
use crate::handler::admin_handler::AdminState;
use crate::middlewares::auth_middleware::AuthState;
use crate::model::settings::SiteSettings;
use crate::model::user::{User, ROLE_ADMIN};
use crate::repository::audit_repo::{AuditLogRepository, MongoAuditLogRepository};
use crate::repository::notification_repo::{MongoNotificationRepository, NotificationRepository};
use crate::repository::provider_repo::{MongoProviderRepository, ProviderRepository};
use crate::repository::request_repo::{MongoRequestRepository, RequestRepository};
use crate::repository::settings_repo::{MongoSettingsRepository, SettingsRepository};
use crate::repository::user_repo::{MongoUserRepository, UserRepository};
use crate::router::admin_router::admin_router;
use crate::router::notification_router::notification_router;
use crate::router::provider_router::provider_router;
use crate::router::request_router::request_router;
use crate::router::user_router::user_router;
use crate::service::admin_service::AdminServiceImpl;
use crate::service::lifecycle_service::LifecycleServiceImpl;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::jwt::JwtTokenUtilsImpl;

pub struct App {
    config: AppConfig,
    router: Router,
    pub user_service: Arc<UserServiceImpl>,
    pub lifecycle_service: Arc<LifecycleServiceImpl>,
    settings_repo: Arc<dyn SettingsRepository>,
    marketplace_config: MarketplaceConfig,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();
        let jwt_config = JwtConfig::from_env().expect("JWT config error");
        let mongo_config = MongoConfig::from_env().expect("Mongo config error");
        let marketplace_config =
            MarketplaceConfig::from_env().expect("Marketplace config error");

        let db = crate::repository::connect(&mongo_config)
            .await
            .expect("MongoDB connection error");

        let user_repo: Arc<dyn UserRepository> = Arc::new(MongoUserRepository::new(&db));
        let request_repo: Arc<dyn RequestRepository> = Arc::new(MongoRequestRepository::new(&db));
        let provider_repo: Arc<dyn ProviderRepository> =
            Arc::new(MongoProviderRepository::new(&db));
        let notification_repo: Arc<dyn NotificationRepository> =
            Arc::new(MongoNotificationRepository::new(&db));
        let audit_repo: Arc<dyn AuditLogRepository> = Arc::new(MongoAuditLogRepository::new(&db));
        let settings_repo: Arc<dyn SettingsRepository> =
            Arc::new(MongoSettingsRepository::new(&db));

        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        let user_service = Arc::new(UserServiceImpl::new(user_repo.clone(), jwt_utils.clone()));
        let lifecycle_service = Arc::new(LifecycleServiceImpl::new(
            request_repo,
            provider_repo.clone(),
            settings_repo.clone(),
            notification_repo.clone(),
            audit_repo.clone(),
            marketplace_config.clone(),
        ));
        let admin_service = Arc::new(AdminServiceImpl::new(
            user_repo,
            provider_repo.clone(),
            settings_repo.clone(),
            audit_repo,
        ));

        let auth_state = Arc::new(AuthState {
            jwt_utils: jwt_utils.clone(),
        });
        let admin_state = AdminState {
            admin_service,
            lifecycle_service: lifecycle_service.clone(),
        };

        let router = Router::new()
            .merge(user_router(user_service.clone()))
            .merge(request_router(lifecycle_service.clone(), auth_state.clone()))
            .merge(provider_router(provider_repo, auth_state.clone()))
            .merge(notification_router(notification_repo, auth_state.clone()))
            .merge(admin_router(admin_state, auth_state))
            .route("/health", get(|| async { "OK" }));

        let app = App {
            config,
            router,
            user_service,
            lifecycle_service,
            settings_repo,
            marketplace_config,
        };
        app.seed_site_settings().await;
        app.create_first_admin_user().await;
        app
    }

    pub async fn start(self) {
        let addr = SocketAddr::new(
            self.config.host.parse().expect("Invalid host"),
            self.config.port,
        );
        info!("Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind address");
        axum::serve(listener, self.router)
            .await
            .expect("Failed to start server");
    }

    /// Writes the default category list into site settings if the
    /// document is not there yet. Existing categories are left alone.
    async fn seed_site_settings(&self) {
        let settings = SiteSettings::new(self.marketplace_config.default_categories.clone());
        match self.settings_repo.seed(settings).await {
            Ok(()) => info!("Site settings seeded"),
            Err(e) => error!("Failed to seed site settings: {e}"),
        }
    }

    async fn create_first_admin_user(&self) {
        let admin_conf = match AdminUserConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Admin user config not loaded: {e}");
                return;
            }
        };

        let user_repo = self.user_service.user_repo.clone();
        match user_repo.find_by_email(&admin_conf.email).await {
            Ok(Some(_)) => {
                info!("Admin user already exists, skipping creation.");
                return;
            }
            Ok(None) => {}
            Err(e) => {
                error!("Failed to check for existing admin user: {e}");
                return;
            }
        }

        let user = User {
            id: None,
            username: admin_conf.username.clone(),
            first_name: admin_conf.first_name.clone(),
            last_name: admin_conf.last_name.clone(),
            email: admin_conf.email.clone(),
            password_hash: String::new(), // set by register
            role: ROLE_ADMIN.to_string(),
            created_at: None,
            updated_at: None,
        };
        match self
            .user_service
            .register(user, admin_conf.password.clone())
            .await
        {
            Ok(_) => info!("First admin user created."),
            Err(e) => error!("Failed to create admin user: {e}"),
        }
    }
}
