pub mod admin_dto;
pub mod provider_dto;
pub mod request_dto;
pub mod user_dto;
