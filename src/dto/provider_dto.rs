use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProviderProfileRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: String,

    #[validate(length(min = 1))]
    pub service_types: Vec<String>,

    pub locality: Option<String>,
}
