use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddCategoryRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyProviderRequest {
    pub verified: bool,
}
