use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Database;
use tracing::{error, info};

use crate::model::provider::ProviderProfile;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait ProviderRepository: Send + Sync {
    async fn create(&self, profile: ProviderProfile) -> RepositoryResult<ProviderProfile>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<ProviderProfile>;
    async fn find_by_user_id(&self, user_id: ObjectId)
        -> RepositoryResult<Option<ProviderProfile>>;
    async fn set_verified(&self, id: ObjectId, verified: bool) -> RepositoryResult<()>;
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<ProviderProfile>>;
}

pub struct MongoProviderRepository {
    collection: mongodb::Collection<ProviderProfile>,
}

impl MongoProviderRepository {
    pub fn new(db: &Database) -> Self {
        MongoProviderRepository {
            collection: db.collection::<ProviderProfile>("providers"),
        }
    }
}

#[async_trait]
impl ProviderRepository for MongoProviderRepository {
    #[tracing::instrument(skip(self, profile), fields(user_id = %profile.user_id))]
    async fn create(&self, profile: ProviderProfile) -> RepositoryResult<ProviderProfile> {
        info!("Creating provider profile");
        let mut new_profile = profile;
        new_profile.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        new_profile.created_at = Some(now.clone());
        new_profile.updated_at = Some(now);
        match self.collection.insert_one(new_profile.clone(), None).await {
            Ok(_) => Ok(new_profile),
            Err(e) => {
                error!("Failed to create provider profile: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<ProviderProfile> {
        let filter = doc! { "_id": id };
        match self.collection.find_one(filter, None).await? {
            Some(profile) => Ok(profile),
            None => Err(RepositoryError::not_found(format!(
                "Provider profile not found for ID: {}",
                id
            ))),
        }
    }

    async fn find_by_user_id(
        &self,
        user_id: ObjectId,
    ) -> RepositoryResult<Option<ProviderProfile>> {
        let filter = doc! { "user_id": user_id };
        let profile = self.collection.find_one(filter, None).await?;
        Ok(profile)
    }

    #[tracing::instrument(skip(self), fields(id = %id, verified = verified))]
    async fn set_verified(&self, id: ObjectId, verified: bool) -> RepositoryResult<()> {
        let filter = doc! { "_id": id };
        let update = doc! { "$set": {
            "verified": verified,
            "updated_at": chrono::Utc::now().to_rfc3339(),
        } };
        let result = self.collection.update_one(filter, update, None).await?;
        if result.matched_count > 0 {
            Ok(())
        } else {
            Err(RepositoryError::not_found(format!(
                "No provider profile found for ID: {}",
                id
            )))
        }
    }

    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<ProviderProfile>> {
        let skip = page.saturating_sub(1) as u64 * limit as u64;
        let options = FindOptions::builder()
            .skip(skip)
            .limit(limit as i64)
            .build();
        let mut cursor = self.collection.find(None, options).await?;
        let mut profiles = Vec::new();
        while let Some(profile) = cursor.next().await {
            profiles.push(profile.map_err(RepositoryError::from)?);
        }
        Ok(profiles)
    }
}
