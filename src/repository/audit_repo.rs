use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::Database;
use tracing::error;

use crate::model::audit::{AuditLogEntry, AuditSeverity};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Audit sink. Recording is best-effort from the caller's point of view:
/// a failed audit write never fails the operation being audited.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn record(
        &self,
        actor_id: ObjectId,
        action: &str,
        details: &str,
        actor_role: &str,
        severity: AuditSeverity,
    ) -> RepositoryResult<()>;
    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<AuditLogEntry>>;
}

pub struct MongoAuditLogRepository {
    collection: mongodb::Collection<AuditLogEntry>,
}

impl MongoAuditLogRepository {
    pub fn new(db: &Database) -> Self {
        MongoAuditLogRepository {
            collection: db.collection::<AuditLogEntry>("audit_logs"),
        }
    }
}

#[async_trait]
impl AuditLogRepository for MongoAuditLogRepository {
    async fn record(
        &self,
        actor_id: ObjectId,
        action: &str,
        details: &str,
        actor_role: &str,
        severity: AuditSeverity,
    ) -> RepositoryResult<()> {
        let entry = AuditLogEntry {
            id: Some(ObjectId::new()),
            actor_id,
            action: action.to_string(),
            details: details.to_string(),
            actor_role: actor_role.to_string(),
            severity,
            created_at: Utc::now(),
        };
        match self.collection.insert_one(entry, None).await {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Failed to record audit entry: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn list(&self, page: u32, limit: u32) -> RepositoryResult<Vec<AuditLogEntry>> {
        let skip = page.saturating_sub(1) as u64 * limit as u64;
        // Newest entries first; that is what a moderator reviews.
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit as i64)
            .build();
        let mut cursor = self.collection.find(None, options).await?;
        let mut entries = Vec::new();
        while let Some(entry) = cursor.next().await {
            entries.push(entry.map_err(RepositoryError::from)?);
        }
        Ok(entries)
    }
}
