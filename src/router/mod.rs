pub mod admin_router;
pub mod notification_router;
pub mod provider_router;
pub mod request_router;
pub mod user_router;
