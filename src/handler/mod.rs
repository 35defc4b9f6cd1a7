pub mod admin_handler;
pub mod notification_handler;
pub mod provider_handler;
pub mod request_handler;
pub mod user_handler;
