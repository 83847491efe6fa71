// Integration tests for Lifeline Algo
//
// The request lifecycle runs against an in-memory store that honors the
// same contract as the SQL schema: one row per (donor, receiver) pair,
// and status updates scoped to both the request id and the acting donor.

use lifeline_algo::core::{DonationStore, Matcher, RequestError, RequestService};
use lifeline_algo::models::{Coordinate, DonationRequest, Donor, RequestDecision, RequestStatus};
use std::collections::HashSet;
use std::sync::Mutex;

struct MemoryStore {
    donors: Vec<Donor>,
    requests: Mutex<Vec<DonationRequest>>,
}

impl MemoryStore {
    fn new(donors: Vec<Donor>) -> Self {
        Self {
            donors,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn status_of(&self, request_id: i64) -> Option<RequestStatus> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == request_id)
            .map(|r| r.status)
    }
}

impl DonationStore for MemoryStore {
    async fn donor_pool(&self) -> Result<Vec<Donor>, RequestError> {
        Ok(self.donors.clone())
    }

    async fn requested_donor_ids(&self, receiver_id: i64) -> Result<HashSet<i64>, RequestError> {
        let requests = self.requests.lock().unwrap();
        Ok(requests
            .iter()
            .filter(|r| r.receiver_id == receiver_id)
            .map(|r| r.donor_id)
            .collect())
    }

    async fn insert_request(&self, donor_id: i64, receiver_id: i64) -> Result<i64, RequestError> {
        let mut requests = self.requests.lock().unwrap();

        // Unique (donor, receiver) pair, any status
        if requests
            .iter()
            .any(|r| r.donor_id == donor_id && r.receiver_id == receiver_id)
        {
            return Err(RequestError::DuplicateRequest {
                donor_id,
                receiver_id,
            });
        }

        let id = requests.len() as i64 + 1;
        requests.push(DonationRequest {
            id,
            donor_id,
            receiver_id,
            status: RequestStatus::Pending,
            created_at: None,
        });

        Ok(id)
    }

    async fn update_request_status(
        &self,
        request_id: i64,
        donor_id: i64,
        status: RequestStatus,
    ) -> Result<u64, RequestError> {
        let mut requests = self.requests.lock().unwrap();
        let mut affected = 0;

        for request in requests.iter_mut() {
            if request.id == request_id && request.donor_id == donor_id {
                request.status = status;
                affected += 1;
            }
        }

        Ok(affected)
    }
}

fn create_donor(id: i64, lat: f64, lon: f64) -> Donor {
    Donor {
        id,
        name: format!("Donor {}", id),
        email: format!("donor{}@example.com", id),
        contact: "555-0100".to_string(),
        blood_group: "B+".to_string(),
        age: 32,
        latitude: lat,
        longitude: lon,
        last_donation_month: Some("March".to_string()),
        created_at: None,
    }
}

#[tokio::test]
async fn test_request_lifecycle_create_and_accept() {
    let store = MemoryStore::new(vec![]);
    let service = RequestService::new();

    let request_id = service.create(&store, 1, 10).await.unwrap();
    assert_eq!(store.status_of(request_id), Some(RequestStatus::Pending));

    service
        .decide(&store, request_id, 10, RequestDecision::Accepted)
        .await
        .unwrap();
    assert_eq!(store.status_of(request_id), Some(RequestStatus::Accepted));
}

#[tokio::test]
async fn test_duplicate_request_rejected() {
    let store = MemoryStore::new(vec![]);
    let service = RequestService::new();

    let first = service.create(&store, 1, 10).await;
    assert!(first.is_ok());

    let second = service.create(&store, 1, 10).await;
    assert!(matches!(
        second,
        Err(RequestError::DuplicateRequest {
            donor_id: 10,
            receiver_id: 1
        })
    ));
}

#[tokio::test]
async fn test_rerequest_after_rejection_still_duplicate() {
    let store = MemoryStore::new(vec![]);
    let service = RequestService::new();

    let request_id = service.create(&store, 1, 10).await.unwrap();
    service
        .decide(&store, request_id, 10, RequestDecision::Rejected)
        .await
        .unwrap();
    assert_eq!(store.status_of(request_id), Some(RequestStatus::Rejected));

    // A rejection does not free the pair for a new request
    let retry = service.create(&store, 1, 10).await;
    assert!(matches!(retry, Err(RequestError::DuplicateRequest { .. })));
}

#[tokio::test]
async fn test_non_owning_donor_decision_is_silent_noop() {
    let store = MemoryStore::new(vec![]);
    let service = RequestService::new();

    let request_id = service.create(&store, 1, 10).await.unwrap();

    // Donor 99 does not own the request: the call succeeds but nothing
    // changes. This is the current contract, not an oversight in the test.
    let result = service
        .decide(&store, request_id, 99, RequestDecision::Accepted)
        .await;
    assert!(result.is_ok());
    assert_eq!(store.status_of(request_id), Some(RequestStatus::Pending));
}

#[tokio::test]
async fn test_terminal_status_can_be_overwritten() {
    let store = MemoryStore::new(vec![]);
    let service = RequestService::new();

    let request_id = service.create(&store, 1, 10).await.unwrap();

    service
        .decide(&store, request_id, 10, RequestDecision::Accepted)
        .await
        .unwrap();
    assert_eq!(store.status_of(request_id), Some(RequestStatus::Accepted));

    // No pending-only guard: a later decision overwrites the outcome
    service
        .decide(&store, request_id, 10, RequestDecision::Rejected)
        .await
        .unwrap();
    assert_eq!(store.status_of(request_id), Some(RequestStatus::Rejected));
}

#[tokio::test]
async fn test_accepting_one_request_leaves_others_untouched() {
    let store = MemoryStore::new(vec![]);
    let service = RequestService::new();

    let from_receiver_1 = service.create(&store, 1, 10).await.unwrap();
    let from_receiver_2 = service.create(&store, 2, 10).await.unwrap();

    service
        .decide(&store, from_receiver_1, 10, RequestDecision::Accepted)
        .await
        .unwrap();

    assert_eq!(store.status_of(from_receiver_1), Some(RequestStatus::Accepted));
    assert_eq!(store.status_of(from_receiver_2), Some(RequestStatus::Pending));
}

#[tokio::test]
async fn test_invalid_donor_id_never_reaches_store() {
    let store = MemoryStore::new(vec![]);
    let service = RequestService::new();

    let result = service.create(&store, 1, 0).await;
    assert!(matches!(result, Err(RequestError::InvalidInput(_))));
    assert!(store.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_receiver_dashboard_flow_excludes_requested_donors() {
    // End-to-end receiver flow: request two donors, then rank the pool
    // the way the dashboard does.
    let receiver_origin = Coordinate::new(40.7128, -74.0060);
    let store = MemoryStore::new(vec![
        create_donor(10, 40.72, -74.01),
        create_donor(11, 40.73, -74.02),
        create_donor(12, 41.5, -74.0),
        create_donor(13, 34.0522, -118.2437),
    ]);
    let service = RequestService::new();
    let matcher = Matcher::new();

    service.create(&store, 1, 10).await.unwrap();
    service.create(&store, 1, 12).await.unwrap();

    let exclude = store.requested_donor_ids(1).await.unwrap();
    let pool = store.donor_pool().await.unwrap();
    let result = matcher.rank_donors(receiver_origin, pool, &exclude);

    assert_eq!(result.total_pool, 4);
    let ids: Vec<i64> = result.donors.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![11, 13]);

    for pair in result.donors.windows(2) {
        assert!(pair[0].distance_km <= pair[1].distance_km);
    }
}

#[tokio::test]
async fn test_hospital_dashboard_sees_full_pool() {
    // Hospitals rank everyone, request history notwithstanding
    let hospital_origin = Coordinate::new(40.7580, -73.9855);
    let store = MemoryStore::new(vec![
        create_donor(10, 40.72, -74.01),
        create_donor(11, 41.5, -74.0),
    ]);
    let service = RequestService::new();
    let matcher = Matcher::new();

    service.create(&store, 1, 10).await.unwrap();

    let pool = store.donor_pool().await.unwrap();
    let result = matcher.rank_donors(hospital_origin, pool, &HashSet::new());

    assert_eq!(result.donors.len(), 2);
    assert_eq!(result.donors[0].id, 10);
}
