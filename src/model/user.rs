use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_PROVIDER: &str = "provider";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    /// "customer", "provider" or "admin"
    pub role: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
