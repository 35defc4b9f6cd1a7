pub mod admin_service;
pub mod lifecycle_service;
pub mod matching;
pub mod user_service;
