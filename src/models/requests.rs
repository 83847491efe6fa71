use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for creating a donation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendRequestRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "receiver_id", rename = "receiverId")]
    pub receiver_id: i64,
    #[validate(range(min = 1))]
    #[serde(alias = "donor_id", rename = "donorId")]
    pub donor_id: i64,
}

/// Request body for a donor acting on an incoming request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DecisionRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "donor_id", rename = "donorId")]
    pub donor_id: i64,
}

/// Request body for a donor profile update
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateDonorRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "blood_group", rename = "bloodGroup")]
    pub blood_group: String,
    #[validate(length(min = 1))]
    pub contact: String,
    #[validate(range(min = 16, max = 120))]
    pub age: i16,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(alias = "last_donation_month", rename = "lastDonationMonth", default)]
    pub last_donation_month: Option<String>,
}

/// Query string for the receiver dashboard donor listing
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyDonorsQuery {
    #[serde(alias = "receiver_id", rename = "receiverId")]
    pub receiver_id: i64,
}

/// Query string for the hospital dashboard donor listing
#[derive(Debug, Clone, Deserialize)]
pub struct RankedDonorsQuery {
    #[serde(alias = "hospital_id", rename = "hospitalId")]
    pub hospital_id: i64,
}

/// Query string for a donor's incoming requests
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingRequestsQuery {
    #[serde(alias = "donor_id", rename = "donorId")]
    pub donor_id: i64,
}

/// Query string for a receiver's sent requests
#[derive(Debug, Clone, Deserialize)]
pub struct SentRequestsQuery {
    #[serde(alias = "receiver_id", rename = "receiverId")]
    pub receiver_id: i64,
}
