use serde::{Deserialize, Serialize};

/// Site-wide settings document. Stored as a single document with a fixed
/// string id so reads and writes address it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(rename = "_id")]
    pub id: String,
    /// Recognized service categories. Seeded from config; admins may add.
    pub categories: Vec<String>,
}

pub const SITE_SETTINGS_ID: &str = "site";

impl SiteSettings {
    pub fn new(categories: Vec<String>) -> Self {
        SiteSettings {
            id: SITE_SETTINGS_ID.to_string(),
            categories,
        }
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(name.trim()))
    }
}
