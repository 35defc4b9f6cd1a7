use async_trait::async_trait;
use bson::doc;
use mongodb::options::UpdateOptions;
use mongodb::Database;
use tracing::info;

use crate::model::settings::{SiteSettings, SITE_SETTINGS_ID};
use crate::repository::repository_error::RepositoryResult;

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self) -> RepositoryResult<Option<SiteSettings>>;
    /// Seed settings on first start; leaves an existing document alone.
    async fn seed(&self, settings: SiteSettings) -> RepositoryResult<()>;
    async fn add_category(&self, name: &str) -> RepositoryResult<()>;
}

pub struct MongoSettingsRepository {
    collection: mongodb::Collection<SiteSettings>,
}

impl MongoSettingsRepository {
    pub fn new(db: &Database) -> Self {
        MongoSettingsRepository {
            collection: db.collection::<SiteSettings>("settings"),
        }
    }
}

#[async_trait]
impl SettingsRepository for MongoSettingsRepository {
    async fn get(&self) -> RepositoryResult<Option<SiteSettings>> {
        let filter = doc! { "_id": SITE_SETTINGS_ID };
        let settings = self.collection.find_one(filter, None).await?;
        Ok(settings)
    }

    async fn seed(&self, settings: SiteSettings) -> RepositoryResult<()> {
        // $setOnInsert with upsert keeps an existing category list intact.
        let filter = doc! { "_id": SITE_SETTINGS_ID };
        let update = doc! { "$setOnInsert": { "categories": settings.categories.clone() } };
        let options = UpdateOptions::builder().upsert(true).build();
        let result = self.collection.update_one(filter, update, options).await?;
        if result.upserted_id.is_some() {
            info!("Seeded site settings with default categories");
        }
        Ok(())
    }

    async fn add_category(&self, name: &str) -> RepositoryResult<()> {
        let filter = doc! { "_id": SITE_SETTINGS_ID };
        let update = doc! { "$addToSet": { "categories": name } };
        let options = UpdateOptions::builder().upsert(true).build();
        self.collection.update_one(filter, update, options).await?;
        Ok(())
    }
}
