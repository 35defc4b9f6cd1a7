pub mod audit;
pub mod notification;
pub mod provider;
pub mod request;
pub mod settings;
pub mod user;
