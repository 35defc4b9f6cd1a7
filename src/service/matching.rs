//! Pure predicates over requests and provider profiles. No I/O, no side
//! effects; the lifecycle service and the UI surfaces call these.

use chrono::{DateTime, Duration, Utc};

use crate::model::provider::ProviderProfile;
use crate::model::request::{RequestStatus, ServiceRequest};

/// True iff the request's category appears in the provider's declared
/// service types, compared case-insensitively. Locality is part of the
/// request but never narrows the match.
pub fn provider_matches_request(profile: &ProviderProfile, request: &ServiceRequest) -> bool {
    let category = request.category.trim();
    profile
        .service_types
        .iter()
        .any(|t| t.trim().eq_ignore_ascii_case(category))
}

/// True iff the request is still open with zero quotes and strictly
/// older than the nudge window. Surfaces a "refine your criteria" hint
/// to the customer; carries no side effect.
pub fn should_nudge_refinement(
    request: &ServiceRequest,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    request.status == RequestStatus::Open
        && request.quotes.is_empty()
        && now - request.created_at > window
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use crate::model::request::{Quote, QuoteStatus};

    fn profile(service_types: &[&str]) -> ProviderProfile {
        ProviderProfile {
            id: Some(ObjectId::new()),
            user_id: ObjectId::new(),
            name: "Gulf Relocations".to_string(),
            service_types: service_types.iter().map(|s| s.to_string()).collect(),
            locality: Some("Bur Dubai".to_string()),
            rating: Some(4.2),
            verified: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn request(category: &str, created_at: DateTime<Utc>, quotes: Vec<Quote>) -> ServiceRequest {
        let status = if quotes.is_empty() {
            RequestStatus::Open
        } else {
            RequestStatus::Quoted
        };
        ServiceRequest {
            id: Some(ObjectId::new()),
            user_id: ObjectId::new(),
            category: category.to_string(),
            title: "Family visit visa".to_string(),
            description: "Two applicants, 60-day visas".to_string(),
            locality: None,
            status,
            created_at,
            quotes,
        }
    }

    fn pending_quote() -> Quote {
        Quote {
            id: "q-1".to_string(),
            provider_id: ObjectId::new(),
            provider_name: "Gulf Relocations".to_string(),
            price: 1200.0,
            currency: "AED".to_string(),
            timeline: "5 days".to_string(),
            description: "Standard processing".to_string(),
            rating: None,
            verified: false,
            status: QuoteStatus::Pending,
        }
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let p = profile(&["visa services", "Travel Packages"]);
        assert!(provider_matches_request(&p, &request("Visa Services", Utc::now(), vec![])));
        assert!(provider_matches_request(&p, &request("TRAVEL PACKAGES", Utc::now(), vec![])));
    }

    #[test]
    fn test_disjoint_categories_do_not_match() {
        let p = profile(&["Business Setup"]);
        assert!(!provider_matches_request(&p, &request("Visa Services", Utc::now(), vec![])));
    }

    #[test]
    fn test_locality_never_narrows_match() {
        let p = profile(&["Visa Services"]);
        let mut r = request("Visa Services", Utc::now(), vec![]);
        r.locality = Some("Jebel Ali".to_string());
        assert!(provider_matches_request(&p, &r));
    }

    #[test]
    fn test_nudge_requires_age_beyond_window() {
        let window = Duration::hours(24);
        let now = Utc::now();

        let fresh = request("Visa Services", now - Duration::hours(1), vec![]);
        assert!(!should_nudge_refinement(&fresh, now, window));

        let stale = request("Visa Services", now - Duration::hours(25), vec![]);
        assert!(should_nudge_refinement(&stale, now, window));
    }

    #[test]
    fn test_nudge_boundary_at_exact_window() {
        let window = Duration::hours(24);
        let now = Utc::now();

        // exactly 24h old: not yet
        let boundary = request("Visa Services", now - window, vec![]);
        assert!(!should_nudge_refinement(&boundary, now, window));

        // one second past: yes
        let past = request(
            "Visa Services",
            now - window - Duration::seconds(1),
            vec![],
        );
        assert!(should_nudge_refinement(&past, now, window));
    }

    #[test]
    fn test_no_nudge_once_quoted() {
        let window = Duration::hours(24);
        let now = Utc::now();
        let quoted = request(
            "Visa Services",
            now - Duration::hours(48),
            vec![pending_quote()],
        );
        assert!(!should_nudge_refinement(&quoted, now, window));
    }
}
