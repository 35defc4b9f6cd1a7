use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request-level lifecycle status.
///
/// `open` means no quotes yet, `quoted` means at least one pending quote,
/// `accepted` means exactly one quote won, `closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Open,
    Quoted,
    Accepted,
    Closed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Open => "open",
            RequestStatus::Quoted => "quoted",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Pending,
    Accepted,
    Rejected,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
        }
    }
}

/// A provider's offer, embedded in `ServiceRequest.quotes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Stable id within the parent request (UUID v4 string)
    pub id: String,
    pub provider_id: ObjectId,
    pub provider_name: String,
    pub price: f64,
    pub currency: String,
    pub timeline: String,
    pub description: String,
    pub rating: Option<f64>,
    pub verified: bool,
    pub status: QuoteStatus,
}

/// A customer's service request with its embedded quotes.
///
/// The whole document is the unit of consistency: every mutation is a
/// single conditional update keyed on the current `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub category: String,
    pub title: String,
    pub description: String,
    pub locality: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub quotes: Vec<Quote>,
}

impl ServiceRequest {
    pub fn quote(&self, quote_id: &str) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.id == quote_id)
    }

    pub fn accepted_quote(&self) -> Option<&Quote> {
        self.quotes
            .iter()
            .find(|q| q.status == QuoteStatus::Accepted)
    }

    pub fn has_quote_from(&self, provider_id: &ObjectId) -> bool {
        self.quotes.iter().any(|q| &q.provider_id == provider_id)
    }

    /// Status implied by the quotes array alone. `closed` is not
    /// derivable (completion is an explicit action), so an already
    /// closed request stays closed.
    pub fn derived_status(&self) -> RequestStatus {
        if self.status == RequestStatus::Closed {
            return RequestStatus::Closed;
        }
        if self.quotes.is_empty() {
            RequestStatus::Open
        } else if self.accepted_quote().is_some() {
            RequestStatus::Accepted
        } else {
            RequestStatus::Quoted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(id: &str, status: QuoteStatus) -> Quote {
        Quote {
            id: id.to_string(),
            provider_id: ObjectId::new(),
            provider_name: "Falcon Visa Experts".to_string(),
            price: 5000.0,
            currency: "AED".to_string(),
            timeline: "10 days".to_string(),
            description: "Full processing".to_string(),
            rating: Some(4.5),
            verified: true,
            status,
        }
    }

    fn request(quotes: Vec<Quote>, status: RequestStatus) -> ServiceRequest {
        ServiceRequest {
            id: Some(ObjectId::new()),
            user_id: ObjectId::new(),
            category: "Visa Services".to_string(),
            title: "Employment visa renewal".to_string(),
            description: "Need renewal within two weeks".to_string(),
            locality: Some("Deira".to_string()),
            status,
            created_at: Utc::now(),
            quotes,
        }
    }

    #[test]
    fn test_open_iff_no_quotes() {
        let r = request(vec![], RequestStatus::Open);
        assert_eq!(r.derived_status(), RequestStatus::Open);

        let r = request(vec![quote("a", QuoteStatus::Pending)], RequestStatus::Quoted);
        assert_ne!(r.derived_status(), RequestStatus::Open);
    }

    #[test]
    fn test_accepted_when_one_quote_accepted() {
        let r = request(
            vec![
                quote("a", QuoteStatus::Accepted),
                quote("b", QuoteStatus::Rejected),
            ],
            RequestStatus::Accepted,
        );
        assert_eq!(r.derived_status(), RequestStatus::Accepted);
        assert_eq!(r.accepted_quote().map(|q| q.id.as_str()), Some("a"));
    }

    #[test]
    fn test_closed_is_terminal() {
        let r = request(
            vec![
                quote("a", QuoteStatus::Accepted),
                quote("b", QuoteStatus::Rejected),
            ],
            RequestStatus::Closed,
        );
        assert_eq!(r.derived_status(), RequestStatus::Closed);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let s = serde_json::to_string(&RequestStatus::Quoted).unwrap();
        assert_eq!(s, "\"quoted\"");
        let s = serde_json::to_string(&QuoteStatus::Rejected).unwrap();
        assert_eq!(s, "\"rejected\"");
    }
}
