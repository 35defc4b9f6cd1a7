use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use futures::stream::StreamExt;
use mongodb::Database;
use tracing::error;

use crate::model::notification::Notification;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Notification sink. Lifecycle side effects go through this trait and
/// are best-effort: failures are logged by the caller, never propagated
/// into the primary mutation.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn notify(&self, user_id: ObjectId, title: &str, body: &str) -> RepositoryResult<()>;
    async fn list_for_user(&self, user_id: ObjectId) -> RepositoryResult<Vec<Notification>>;
    async fn mark_read(&self, id: ObjectId, user_id: ObjectId) -> RepositoryResult<()>;
}

pub struct MongoNotificationRepository {
    collection: mongodb::Collection<Notification>,
}

impl MongoNotificationRepository {
    pub fn new(db: &Database) -> Self {
        MongoNotificationRepository {
            collection: db.collection::<Notification>("notifications"),
        }
    }
}

#[async_trait]
impl NotificationRepository for MongoNotificationRepository {
    async fn notify(&self, user_id: ObjectId, title: &str, body: &str) -> RepositoryResult<()> {
        let notification = Notification {
            id: Some(ObjectId::new()),
            user_id,
            title: title.to_string(),
            body: body.to_string(),
            read: false,
            created_at: Utc::now(),
        };
        match self.collection.insert_one(notification, None).await {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Failed to insert notification: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn list_for_user(&self, user_id: ObjectId) -> RepositoryResult<Vec<Notification>> {
        let filter = doc! { "user_id": user_id };
        let mut cursor = self.collection.find(filter, None).await?;
        let mut notifications = Vec::new();
        while let Some(notification) = cursor.next().await {
            notifications.push(notification.map_err(RepositoryError::from)?);
        }
        Ok(notifications)
    }

    async fn mark_read(&self, id: ObjectId, user_id: ObjectId) -> RepositoryResult<()> {
        // The user_id filter keeps users from flipping each other's
        // notifications.
        let filter = doc! { "_id": id, "user_id": user_id };
        let update = doc! { "$set": { "read": true } };
        let result = self.collection.update_one(filter, update, None).await?;
        if result.matched_count > 0 {
            Ok(())
        } else {
            Err(RepositoryError::not_found(format!(
                "Notification not found for ID: {}",
                id
            )))
        }
    }
}
