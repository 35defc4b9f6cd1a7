use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A provider's public profile: what they offer and where.
///
/// `service_types` holds category names; matching against requests is
/// case-insensitive. `locality` is informational only and never narrows
/// a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProfile {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub name: String,
    pub service_types: Vec<String>,
    pub locality: Option<String>,
    pub rating: Option<f64>,
    pub verified: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
