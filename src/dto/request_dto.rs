use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRequestRequest {
    #[validate(length(min = 2, max = 100))]
    pub category: String,

    #[validate(length(min = 3, max = 200))]
    pub title: String,

    #[validate(length(min = 10, max = 5000))]
    pub description: String,

    pub locality: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitQuoteRequest {
    /// Provider profile id (ObjectId hex); must belong to the caller
    #[validate(length(equal = 24))]
    pub provider_id: String,

    #[validate(range(min = 0.01))]
    pub price: f64,

    #[validate(length(min = 1, max = 10))]
    pub currency: String,

    #[validate(length(min = 2, max = 100))]
    pub timeline: String,

    #[validate(length(min = 2, max = 2000))]
    pub description: String,
}
