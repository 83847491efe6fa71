// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Coordinate, DonationRequest, Donor, Hospital, RankedDonor, Receiver, RequestDecision, RequestStatus};
pub use requests::{
    DecisionRequest, IncomingRequestsQuery, NearbyDonorsQuery, RankedDonorsQuery,
    SendRequestRequest, SentRequestsQuery, UpdateDonorRequest,
};
pub use responses::{ErrorResponse, HealthResponse, RankedDonorsResponse, RequestCreatedResponse, TransitionResponse};
