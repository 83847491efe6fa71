use serde::{Deserialize, Serialize};

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check that the coordinate lies in the valid lat/lon ranges.
    ///
    /// Callers validate before handing coordinates to the distance
    /// engine; the engine itself accepts any finite pair.
    pub fn in_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Registered blood donor, as read from storage
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Donor {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub contact: String,
    #[serde(rename = "bloodGroup")]
    pub blood_group: String,
    pub age: i16,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "lastDonationMonth", default)]
    pub last_donation_month: Option<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Donor {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Registered receiver (patient-side account)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Receiver {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub contact: String,
    #[serde(rename = "hospitalName")]
    pub hospital_name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Receiver {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Registered hospital account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Hospital {
    pub id: i64,
    #[serde(rename = "hospitalCode")]
    pub hospital_code: String,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Hospital {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Donor annotated with the distance from the querying origin
///
/// Built per query by the matcher, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedDonor {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub contact: String,
    #[serde(rename = "bloodGroup")]
    pub blood_group: String,
    pub age: i16,
    #[serde(rename = "lastDonationMonth")]
    pub last_donation_month: Option<String>,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
}

/// Lifecycle state of a donation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Outcome a donor may record on an incoming request
///
/// Restricted to the two terminal statuses; a donor action can never
/// write a request back to pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestDecision {
    Accepted,
    Rejected,
}

impl RequestDecision {
    pub fn status(self) -> RequestStatus {
        match self {
            RequestDecision::Accepted => RequestStatus::Accepted,
            RequestDecision::Rejected => RequestStatus::Rejected,
        }
    }
}

/// A donation request relating one donor to one receiver
///
/// At most one row exists per (donor, receiver) pair; the storage layer
/// enforces this with a unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DonationRequest {
    pub id: i64,
    #[serde(rename = "donorId")]
    pub donor_id: i64,
    #[serde(rename = "receiverId")]
    pub receiver_id: i64,
    pub status: RequestStatus,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}
