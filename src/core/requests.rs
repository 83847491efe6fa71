use crate::models::{Donor, RequestDecision, RequestStatus};
use std::collections::HashSet;
use thiserror::Error;

/// Errors surfaced by the request lifecycle
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("receiver {receiver_id} already has a request for donor {donor_id}")]
    DuplicateRequest { donor_id: i64, receiver_id: i64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Storage collaborator behind the matching service
///
/// Uniqueness of the (donor, receiver) pair is the store's job: a
/// duplicate insert must fail atomically at the constraint and surface
/// as `DuplicateRequest`. There is no pre-check-then-insert here, so
/// concurrent creates race safely down to the constraint.
#[allow(async_fn_in_trait)]
pub trait DonationStore {
    /// Full donor pool snapshot at query time.
    async fn donor_pool(&self) -> Result<Vec<Donor>, RequestError>;

    /// Ids of every donor this receiver already has a request row for,
    /// regardless of status.
    async fn requested_donor_ids(&self, receiver_id: i64) -> Result<HashSet<i64>, RequestError>;

    /// Insert a pending request, returning its id.
    async fn insert_request(&self, donor_id: i64, receiver_id: i64) -> Result<i64, RequestError>;

    /// Set the status of the request matching BOTH `request_id` and
    /// `donor_id`, returning the number of rows touched.
    async fn update_request_status(
        &self,
        request_id: i64,
        donor_id: i64,
        status: RequestStatus,
    ) -> Result<u64, RequestError>;
}

/// Governs donation-request creation and state transitions
///
/// Requests start pending and move to accepted or rejected through a
/// donor action. The service validates inputs and issues transitions;
/// row ownership stays with the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestService;

impl RequestService {
    pub fn new() -> Self {
        Self
    }

    /// Create a pending request from `receiver_id` to `donor_id`
    ///
    /// Fails with `DuplicateRequest` if any request for the pair already
    /// exists — including one the donor previously rejected. A receiver
    /// cannot re-request a donor under any prior outcome.
    pub async fn create<S: DonationStore>(
        &self,
        store: &S,
        receiver_id: i64,
        donor_id: i64,
    ) -> Result<i64, RequestError> {
        if donor_id <= 0 {
            return Err(RequestError::InvalidInput(format!(
                "donor id must be positive, got {}",
                donor_id
            )));
        }
        if receiver_id <= 0 {
            return Err(RequestError::InvalidInput(format!(
                "receiver id must be positive, got {}",
                receiver_id
            )));
        }

        let request_id = store.insert_request(donor_id, receiver_id).await?;

        tracing::debug!(
            "Created request {} (receiver {} -> donor {})",
            request_id,
            receiver_id,
            donor_id
        );

        Ok(request_id)
    }

    /// Record a donor's decision on a request
    ///
    /// The update is scoped to rows matching both the request id and the
    /// acting donor, so a donor cannot act on another donor's request.
    /// When nothing matches — unknown request or non-owning donor — the
    /// call is a no-op that still reports success, mirroring the
    /// donor-scoped UPDATE it issues. The update is unconditional on the
    /// current status: deciding an already-terminal request overwrites
    /// the prior outcome. Other requests for the donor are unaffected.
    pub async fn decide<S: DonationStore>(
        &self,
        store: &S,
        request_id: i64,
        acting_donor_id: i64,
        decision: RequestDecision,
    ) -> Result<(), RequestError> {
        let affected = store
            .update_request_status(request_id, acting_donor_id, decision.status())
            .await?;

        if affected == 0 {
            tracing::debug!(
                "Decision on request {} by donor {} matched no rows",
                request_id,
                acting_donor_id
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store stub that fails the test if any storage call is reached
    struct UnreachableStore;

    impl DonationStore for UnreachableStore {
        async fn donor_pool(&self) -> Result<Vec<Donor>, RequestError> {
            panic!("store should not be touched");
        }

        async fn requested_donor_ids(&self, _receiver_id: i64) -> Result<HashSet<i64>, RequestError> {
            panic!("store should not be touched");
        }

        async fn insert_request(&self, _donor_id: i64, _receiver_id: i64) -> Result<i64, RequestError> {
            panic!("store should not be touched");
        }

        async fn update_request_status(
            &self,
            _request_id: i64,
            _donor_id: i64,
            _status: RequestStatus,
        ) -> Result<u64, RequestError> {
            panic!("store should not be touched");
        }
    }

    /// Store stub whose updates never match a row
    struct NoMatchStore;

    impl DonationStore for NoMatchStore {
        async fn donor_pool(&self) -> Result<Vec<Donor>, RequestError> {
            Ok(vec![])
        }

        async fn requested_donor_ids(&self, _receiver_id: i64) -> Result<HashSet<i64>, RequestError> {
            Ok(HashSet::new())
        }

        async fn insert_request(&self, _donor_id: i64, _receiver_id: i64) -> Result<i64, RequestError> {
            Ok(1)
        }

        async fn update_request_status(
            &self,
            _request_id: i64,
            _donor_id: i64,
            _status: RequestStatus,
        ) -> Result<u64, RequestError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_donor_id() {
        let service = RequestService::new();

        let err = service.create(&UnreachableStore, 1, 0).await.unwrap_err();
        assert!(matches!(err, RequestError::InvalidInput(_)));

        let err = service.create(&UnreachableStore, 1, -5).await.unwrap_err();
        assert!(matches!(err, RequestError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_receiver_id() {
        let service = RequestService::new();

        let err = service.create(&UnreachableStore, 0, 3).await.unwrap_err();
        assert!(matches!(err, RequestError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_decide_with_no_matching_row_is_ok() {
        let service = RequestService::new();

        let result = service
            .decide(&NoMatchStore, 42, 7, RequestDecision::Accepted)
            .await;
        assert!(result.is_ok());
    }
}
