//! End-to-end repository workflow against a live MongoDB instance.
//! Ignored by default; run with `cargo test -- --ignored` when a
//! database configured via MONGO_* env vars is available.

use bson::oid::ObjectId;
use chrono::Utc;

use wasit_backend::config::mongo_conf::MongoConfig;
use wasit_backend::model::request::{Quote, QuoteStatus, RequestStatus, ServiceRequest};
use wasit_backend::repository::request_repo::{MongoRequestRepository, RequestRepository};
use wasit_backend::repository::repository_error::{RepositoryError, RepositoryResult};

async fn setup_request_repository() -> RepositoryResult<MongoRequestRepository> {
    let _ = dotenv::dotenv();
    let config = MongoConfig::from_env()
        .map_err(|e| RepositoryError::database(format!("Failed to load MongoConfig: {}", e)))?;
    let db = wasit_backend::repository::connect(&config)
        .await
        .map_err(|e| RepositoryError::connection(format!("Failed to connect: {}", e)))?;
    Ok(MongoRequestRepository::new(&db))
}

fn sample_quote(provider_id: ObjectId, price: f64) -> Quote {
    Quote {
        id: uuid::Uuid::new_v4().to_string(),
        provider_id,
        provider_name: "Test Provider".to_string(),
        price,
        currency: "AED".to_string(),
        timeline: "5 days".to_string(),
        description: "Live workflow test quote".to_string(),
        rating: Some(4.0),
        verified: true,
        status: QuoteStatus::Pending,
    }
}

#[tokio::test]
#[ignore]
async fn test_request_repository_workflow() {
    let repo = setup_request_repository()
        .await
        .expect("Failed to setup request repository");

    let request = ServiceRequest {
        id: None,
        user_id: ObjectId::new(),
        category: "Visa Services".to_string(),
        title: "Live workflow test request".to_string(),
        description: "Created by the ignored live-database test".to_string(),
        locality: Some("Dubai".to_string()),
        status: RequestStatus::Open,
        created_at: Utc::now(),
        quotes: Vec::new(),
    };

    let created = repo.create(request).await.expect("Failed to insert request");
    let request_id = created.id.expect("Inserted request has no id");
    assert_eq!(created.status, RequestStatus::Open);

    // Two quotes; the first flips the status to quoted.
    let quote_a = sample_quote(ObjectId::new(), 500.0);
    let quote_a_id = quote_a.id.clone();
    assert!(repo
        .push_quote(request_id, quote_a)
        .await
        .expect("Failed to push quote A"));
    let quote_b = sample_quote(ObjectId::new(), 450.0);
    assert!(repo
        .push_quote(request_id, quote_b)
        .await
        .expect("Failed to push quote B"));

    let quoted = repo.get_by_id(request_id).await.expect("Failed to fetch");
    assert_eq!(quoted.status, RequestStatus::Quoted);
    assert_eq!(quoted.quotes.len(), 2);

    // Accept A; the conditional write must reject a second accept.
    assert!(repo
        .accept_quote(request_id, &quote_a_id)
        .await
        .expect("Failed to accept quote"));
    assert!(!repo
        .accept_quote(request_id, &quote_a_id)
        .await
        .expect("Second accept errored"));

    let accepted = repo.get_by_id(request_id).await.expect("Failed to fetch");
    assert_eq!(accepted.status, RequestStatus::Accepted);
    let winners = accepted
        .quotes
        .iter()
        .filter(|q| q.status == QuoteStatus::Accepted)
        .count();
    assert_eq!(winners, 1);

    // Close the order, then clean up.
    assert!(repo
        .set_status_if(request_id, RequestStatus::Accepted, RequestStatus::Closed)
        .await
        .expect("Failed to close"));
    let closed = repo.get_by_id(request_id).await.expect("Failed to fetch");
    assert_eq!(closed.status, RequestStatus::Closed);

    // A closed request takes no further quotes.
    assert!(!repo
        .push_quote(request_id, sample_quote(ObjectId::new(), 400.0))
        .await
        .expect("Push on closed request errored"));

    repo.delete(request_id).await.expect("Failed to delete");
    assert!(repo.get_by_id(request_id).await.is_err());
}
