use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::options::UpdateOptions;
use mongodb::Database;
use tracing::{error, info};

use crate::model::request::{Quote, QuoteStatus, RequestStatus, ServiceRequest};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Persistence seam for service requests.
///
/// The conditional mutations (`push_quote`, `accept_quote`,
/// `set_status_if`) return `Ok(false)` when no document matched the
/// expected current state; the caller decides whether that means the
/// request is missing or in the wrong status.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn create(&self, request: ServiceRequest) -> RepositoryResult<ServiceRequest>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<ServiceRequest>;
    /// Append a quote iff the request is still open or quoted, flipping
    /// the status to quoted in the same write.
    async fn push_quote(&self, id: ObjectId, quote: Quote) -> RepositoryResult<bool>;
    /// Accept one quote and reject all siblings in a single conditional
    /// write keyed on `status = quoted`. Exactly one of two concurrent
    /// callers can win.
    async fn accept_quote(&self, id: ObjectId, quote_id: &str) -> RepositoryResult<bool>;
    /// Compare-and-swap on the request status alone.
    async fn set_status_if(
        &self,
        id: ObjectId,
        expected: RequestStatus,
        next: RequestStatus,
    ) -> RepositoryResult<bool>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list_by_user(&self, user_id: ObjectId) -> RepositoryResult<Vec<ServiceRequest>>;
    async fn list_by_statuses(
        &self,
        statuses: &[RequestStatus],
    ) -> RepositoryResult<Vec<ServiceRequest>>;
}

pub struct MongoRequestRepository {
    collection: mongodb::Collection<ServiceRequest>,
}

impl MongoRequestRepository {
    pub fn new(db: &Database) -> Self {
        MongoRequestRepository {
            collection: db.collection::<ServiceRequest>("requests"),
        }
    }
}

#[async_trait]
impl RequestRepository for MongoRequestRepository {
    #[tracing::instrument(skip(self, request), fields(user_id = %request.user_id, category = %request.category))]
    async fn create(&self, request: ServiceRequest) -> RepositoryResult<ServiceRequest> {
        info!("Creating new service request");
        let mut new_request = request;
        new_request.id = Some(ObjectId::new());

        match self.collection.insert_one(new_request.clone(), None).await {
            Ok(_) => {
                info!("Service request created successfully");
                Ok(new_request)
            }
            Err(e) => {
                error!("Failed to create service request: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<ServiceRequest> {
        let filter = doc! { "_id": id };
        match self.collection.find_one(filter, None).await {
            Ok(Some(request)) => Ok(request),
            Ok(None) => {
                error!("Service request not found for ID: {}", id);
                Err(RepositoryError::not_found(format!(
                    "Service request not found for ID: {}",
                    id
                )))
            }
            Err(e) => {
                error!("Failed to fetch service request: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, quote), fields(id = %id, provider_id = %quote.provider_id))]
    async fn push_quote(&self, id: ObjectId, quote: Quote) -> RepositoryResult<bool> {
        info!("Appending quote to service request");
        let quote_doc = bson::to_bson(&quote)?;
        // The status filter makes the append atomic with the open/quoted
        // precondition: accepted or closed requests never match.
        let filter = doc! {
            "_id": id,
            "status": { "$in": [RequestStatus::Open.as_str(), RequestStatus::Quoted.as_str()] },
        };
        let update = doc! {
            "$push": { "quotes": quote_doc },
            "$set": { "status": RequestStatus::Quoted.as_str() },
        };
        let result = self.collection.update_one(filter, update, None).await?;
        Ok(result.modified_count > 0)
    }

    #[tracing::instrument(skip(self), fields(id = %id, quote_id = %quote_id))]
    async fn accept_quote(&self, id: ObjectId, quote_id: &str) -> RepositoryResult<bool> {
        info!("Accepting quote on service request");
        // One conditional write: winner accepted, every sibling rejected,
        // request moved to accepted. The `status: quoted` filter is the
        // compare-and-swap that gives two racing acceptances exactly one
        // winner.
        let filter = doc! {
            "_id": id,
            "status": RequestStatus::Quoted.as_str(),
            "quotes.id": quote_id,
        };
        let update = doc! {
            "$set": {
                "status": RequestStatus::Accepted.as_str(),
                "quotes.$[win].status": QuoteStatus::Accepted.as_str(),
                "quotes.$[lose].status": QuoteStatus::Rejected.as_str(),
            },
        };
        let options = UpdateOptions::builder()
            .array_filters(vec![
                doc! { "win.id": quote_id },
                doc! { "lose.id": { "$ne": quote_id } },
            ])
            .build();
        let result = self.collection.update_one(filter, update, options).await?;
        Ok(result.modified_count > 0)
    }

    #[tracing::instrument(skip(self), fields(id = %id, expected = expected.as_str(), next = next.as_str()))]
    async fn set_status_if(
        &self,
        id: ObjectId,
        expected: RequestStatus,
        next: RequestStatus,
    ) -> RepositoryResult<bool> {
        let filter = doc! { "_id": id, "status": expected.as_str() };
        let update = doc! { "$set": { "status": next.as_str() } };
        let result = self.collection.update_one(filter, update, None).await?;
        Ok(result.modified_count > 0)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        info!("Deleting service request");
        let filter = doc! { "_id": id };
        let result = self.collection.delete_one(filter, None).await?;
        if result.deleted_count > 0 {
            info!("Service request deleted for ID: {}", id);
            Ok(())
        } else {
            error!("No service request found to delete for ID: {}", id);
            Err(RepositoryError::not_found(format!(
                "No service request found to delete for ID: {}",
                id
            )))
        }
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn list_by_user(&self, user_id: ObjectId) -> RepositoryResult<Vec<ServiceRequest>> {
        let filter = doc! { "user_id": user_id };
        let mut cursor = self.collection.find(filter, None).await?;
        let mut requests = Vec::new();
        while let Some(request) = cursor.next().await {
            requests.push(request.map_err(RepositoryError::from)?);
        }
        Ok(requests)
    }

    #[tracing::instrument(skip(self, statuses))]
    async fn list_by_statuses(
        &self,
        statuses: &[RequestStatus],
    ) -> RepositoryResult<Vec<ServiceRequest>> {
        let wanted: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();
        let filter = doc! { "status": { "$in": wanted } };
        let mut cursor = self.collection.find(filter, None).await?;
        let mut requests = Vec::new();
        while let Some(request) = cursor.next().await {
            requests.push(request.map_err(RepositoryError::from)?);
        }
        Ok(requests)
    }
}
