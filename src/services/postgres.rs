use crate::core::requests::{DonationStore, RequestError};
use crate::models::{Donor, Hospital, Receiver, RequestStatus, UpdateDonorRequest};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// An incoming request as shown on the donor dashboard
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IncomingRequest {
    pub id: i64,
    pub status: RequestStatus,
    #[serde(rename = "receiverName")]
    pub receiver_name: String,
    #[serde(rename = "receiverEmail")]
    pub receiver_email: String,
    #[serde(rename = "receiverContact")]
    pub receiver_contact: String,
    #[serde(rename = "hospitalName")]
    pub hospital_name: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A sent request as shown on the receiver dashboard
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SentRequest {
    pub id: i64,
    pub status: RequestStatus,
    #[serde(rename = "donorName")]
    pub donor_name: String,
    #[serde(rename = "donorEmail")]
    pub donor_email: String,
    #[serde(rename = "donorContact")]
    pub donor_contact: String,
    #[serde(rename = "donorBloodGroup")]
    pub donor_blood_group: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// PostgreSQL client for donor, receiver, hospital and request rows
///
/// Owns every persistent row in the system. The matching core only reads
/// snapshots and issues transitions through the `DonationStore` trait;
/// the (donor, receiver) uniqueness constraint lives in the schema and
/// duplicate inserts are detected by the failed constraint, not by a
/// pre-check.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Fetch a donor profile by id
    pub async fn get_donor(&self, donor_id: i64) -> Result<Donor, PostgresError> {
        let query = r#"
            SELECT id, name, email, contact, blood_group, age,
                   latitude, longitude, last_donation_month, created_at
            FROM donors
            WHERE id = $1
        "#;

        sqlx::query_as::<_, Donor>(query)
            .bind(donor_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("donor {}", donor_id)))
    }

    /// Fetch a receiver profile by id
    pub async fn get_receiver(&self, receiver_id: i64) -> Result<Receiver, PostgresError> {
        let query = r#"
            SELECT id, name, email, contact, hospital_name,
                   latitude, longitude, created_at
            FROM receivers
            WHERE id = $1
        "#;

        sqlx::query_as::<_, Receiver>(query)
            .bind(receiver_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("receiver {}", receiver_id)))
    }

    /// Fetch a hospital profile by id
    pub async fn get_hospital(&self, hospital_id: i64) -> Result<Hospital, PostgresError> {
        let query = r#"
            SELECT id, hospital_code, name, email, contact,
                   latitude, longitude, created_at
            FROM hospitals
            WHERE id = $1
        "#;

        sqlx::query_as::<_, Hospital>(query)
            .bind(hospital_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("hospital {}", hospital_id)))
    }

    /// Update a donor's mutable profile fields
    pub async fn update_donor(
        &self,
        donor_id: i64,
        update: &UpdateDonorRequest,
    ) -> Result<(), PostgresError> {
        let query = r#"
            UPDATE donors
            SET blood_group = $1, contact = $2, age = $3,
                latitude = $4, longitude = $5, last_donation_month = $6
            WHERE id = $7
        "#;

        let result = sqlx::query(query)
            .bind(&update.blood_group)
            .bind(&update.contact)
            .bind(update.age)
            .bind(update.latitude)
            .bind(update.longitude)
            .bind(&update.last_donation_month)
            .bind(donor_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PostgresError::NotFound(format!("donor {}", donor_id)));
        }

        tracing::debug!("Updated donor {}", donor_id);

        Ok(())
    }

    /// Requests addressed to a donor, with receiver details, newest first
    pub async fn incoming_requests(
        &self,
        donor_id: i64,
    ) -> Result<Vec<IncomingRequest>, PostgresError> {
        let query = r#"
            SELECT r.id, r.status, r.created_at,
                   rec.name AS receiver_name, rec.email AS receiver_email,
                   rec.contact AS receiver_contact, rec.hospital_name
            FROM requests r
            JOIN receivers rec ON r.receiver_id = rec.id
            WHERE r.donor_id = $1
            ORDER BY r.created_at DESC
        "#;

        let requests = sqlx::query_as::<_, IncomingRequest>(query)
            .bind(donor_id)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Donor {} has {} incoming requests", donor_id, requests.len());

        Ok(requests)
    }

    /// Requests a receiver has sent, with donor details, newest first
    pub async fn sent_requests(&self, receiver_id: i64) -> Result<Vec<SentRequest>, PostgresError> {
        let query = r#"
            SELECT r.id, r.status, r.created_at,
                   d.name AS donor_name, d.email AS donor_email,
                   d.contact AS donor_contact, d.blood_group AS donor_blood_group
            FROM requests r
            JOIN donors d ON r.donor_id = d.id
            WHERE r.receiver_id = $1
            ORDER BY r.created_at DESC
        "#;

        let requests = sqlx::query_as::<_, SentRequest>(query)
            .bind(receiver_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(requests)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

impl DonationStore for PostgresClient {
    async fn donor_pool(&self) -> Result<Vec<Donor>, RequestError> {
        let query = r#"
            SELECT id, name, email, contact, blood_group, age,
                   latitude, longitude, last_donation_month, created_at
            FROM donors
            ORDER BY id
        "#;

        sqlx::query_as::<_, Donor>(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RequestError::Storage(e.to_string()))
    }

    async fn requested_donor_ids(&self, receiver_id: i64) -> Result<HashSet<i64>, RequestError> {
        let query = r#"
            SELECT donor_id
            FROM requests
            WHERE receiver_id = $1
        "#;

        let rows = sqlx::query(query)
            .bind(receiver_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RequestError::Storage(e.to_string()))?;

        let donor_ids: HashSet<i64> = rows.iter().map(|row| row.get("donor_id")).collect();

        tracing::debug!(
            "Receiver {} has requested {} donors",
            receiver_id,
            donor_ids.len()
        );

        Ok(donor_ids)
    }

    async fn insert_request(&self, donor_id: i64, receiver_id: i64) -> Result<i64, RequestError> {
        let query = r#"
            INSERT INTO requests (donor_id, receiver_id, status)
            VALUES ($1, $2, 'pending')
            RETURNING id
        "#;

        let result = sqlx::query(query)
            .bind(donor_id)
            .bind(receiver_id)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(row.get("id")),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(RequestError::DuplicateRequest {
                    donor_id,
                    receiver_id,
                })
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                Err(RequestError::InvalidInput(format!(
                    "no such donor or receiver ({} -> {})",
                    receiver_id, donor_id
                )))
            }
            Err(e) => Err(RequestError::Storage(e.to_string())),
        }
    }

    async fn update_request_status(
        &self,
        request_id: i64,
        donor_id: i64,
        status: RequestStatus,
    ) -> Result<u64, RequestError> {
        let query = r#"
            UPDATE requests
            SET status = $1
            WHERE id = $2 AND donor_id = $3
        "#;

        let result = sqlx::query(query)
            .bind(status)
            .bind(request_id)
            .bind(donor_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RequestError::Storage(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
