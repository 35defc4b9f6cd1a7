use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Database;
use tracing::error;

use crate::model::user::User;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<User>>;
}

pub struct MongoUserRepository {
    collection: mongodb::Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        MongoUserRepository {
            collection: db.collection::<User>("users"),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        user.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        user.created_at = Some(now.clone());
        user.updated_at = Some(now);
        match self.collection.insert_one(user.clone(), None).await {
            Ok(_) => Ok(user),
            Err(e) => {
                error!("Failed to insert user: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let filter = doc! { "email": email };
        let user = self.collection.find_one(filter, None).await?;
        Ok(user)
    }

    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<User>> {
        let skip = page.saturating_sub(1) as u64 * limit as u64;
        let options = FindOptions::builder()
            .skip(skip)
            .limit(limit as i64)
            .build();
        let mut cursor = self.collection.find(None, options).await?;
        let mut users = Vec::new();
        while let Some(user) = cursor.next().await {
            users.push(user.map_err(RepositoryError::from)?);
        }
        Ok(users)
    }
}
