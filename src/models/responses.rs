use crate::models::domain::{RankedDonor, RequestStatus};
use serde::{Deserialize, Serialize};

/// Response for the donor ranking endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedDonorsResponse {
    pub donors: Vec<RankedDonor>,
    #[serde(rename = "totalPool")]
    pub total_pool: usize,
}

/// Response after creating a donation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestCreatedResponse {
    #[serde(rename = "requestId")]
    pub request_id: i64,
    pub status: RequestStatus,
}

/// Response after a donor decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionResponse {
    pub success: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
