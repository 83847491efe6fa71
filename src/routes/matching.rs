use crate::core::requests::DonationStore;
use crate::core::{Matcher, RequestError, RequestService};
use crate::models::{
    DecisionRequest, ErrorResponse, HealthResponse, IncomingRequestsQuery, NearbyDonorsQuery,
    RankedDonorsQuery, RankedDonorsResponse, RequestCreatedResponse, RequestDecision,
    RequestStatus, SendRequestRequest, SentRequestsQuery, TransitionResponse, UpdateDonorRequest,
};
use crate::services::{PostgresClient, PostgresError};
use actix_web::{web, HttpResponse, Responder};
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub matcher: Matcher,
    pub requests: RequestService,
}

/// Configure all matching-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/donors/nearby", web::get().to(nearby_donors))
        .route("/donors/ranked", web::get().to(ranked_donors))
        .route("/donors/{id}", web::put().to(update_donor))
        .route("/requests", web::post().to(create_request))
        .route("/requests/{id}/accept", web::post().to(accept_request))
        .route("/requests/{id}/reject", web::post().to(reject_request))
        .route("/requests/incoming", web::get().to(incoming_requests))
        .route("/requests/sent", web::get().to(sent_requests));
}

fn request_error_response(err: &RequestError) -> HttpResponse {
    match err {
        RequestError::DuplicateRequest { .. } => HttpResponse::Conflict().json(ErrorResponse {
            error: "duplicate_request".to_string(),
            message: "You have already sent a request to this donor.".to_string(),
            status_code: 409,
        }),
        RequestError::InvalidInput(_) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_input".to_string(),
            message: err.to_string(),
            status_code: 400,
        }),
        RequestError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_found".to_string(),
            message: err.to_string(),
            status_code: 404,
        }),
        RequestError::Storage(_) => HttpResponse::InternalServerError().json(ErrorResponse {
            error: "storage_error".to_string(),
            message: err.to_string(),
            status_code: 500,
        }),
    }
}

fn postgres_error_response(err: &PostgresError) -> HttpResponse {
    match err {
        PostgresError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_found".to_string(),
            message: err.to_string(),
            status_code: 404,
        }),
        _ => HttpResponse::InternalServerError().json(ErrorResponse {
            error: "storage_error".to_string(),
            message: err.to_string(),
            status_code: 500,
        }),
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Receiver dashboard donor listing
///
/// GET /api/v1/donors/nearby?receiverId={id}
///
/// Returns the donor pool minus every donor this receiver already has a
/// request for (any status), ranked nearest first from the receiver's
/// coordinates.
async fn nearby_donors(
    state: web::Data<AppState>,
    query: web::Query<NearbyDonorsQuery>,
) -> impl Responder {
    let receiver = match state.postgres.get_receiver(query.receiver_id).await {
        Ok(receiver) => receiver,
        Err(e) => {
            tracing::info!("Receiver lookup failed for {}: {}", query.receiver_id, e);
            return postgres_error_response(&e);
        }
    };

    let exclude = match state.postgres.requested_donor_ids(receiver.id).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!("Failed to fetch requested donors for {}: {}", receiver.id, e);
            return request_error_response(&e);
        }
    };

    let pool = match state.postgres.donor_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to fetch donor pool: {}", e);
            return request_error_response(&e);
        }
    };

    let result = state
        .matcher
        .rank_donors(receiver.coordinate(), pool, &exclude);

    tracing::info!(
        "Returning {} donors for receiver {} (pool of {})",
        result.donors.len(),
        receiver.id,
        result.total_pool
    );

    HttpResponse::Ok().json(RankedDonorsResponse {
        donors: result.donors,
        total_pool: result.total_pool,
    })
}

/// Hospital dashboard donor listing
///
/// GET /api/v1/donors/ranked?hospitalId={id}
///
/// Hospitals see the full donor pool, ranked nearest first. No request
/// history filters the listing.
async fn ranked_donors(
    state: web::Data<AppState>,
    query: web::Query<RankedDonorsQuery>,
) -> impl Responder {
    let hospital = match state.postgres.get_hospital(query.hospital_id).await {
        Ok(hospital) => hospital,
        Err(e) => {
            tracing::info!("Hospital lookup failed for {}: {}", query.hospital_id, e);
            return postgres_error_response(&e);
        }
    };

    let pool = match state.postgres.donor_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to fetch donor pool: {}", e);
            return request_error_response(&e);
        }
    };

    let result = state
        .matcher
        .rank_donors(hospital.coordinate(), pool, &HashSet::new());

    HttpResponse::Ok().json(RankedDonorsResponse {
        donors: result.donors,
        total_pool: result.total_pool,
    })
}

/// Create a donation request
///
/// POST /api/v1/requests
///
/// Request body:
/// ```json
/// {
///   "receiverId": 1,
///   "donorId": 2
/// }
/// ```
async fn create_request(
    state: web::Data<AppState>,
    req: web::Json<SendRequestRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state
        .requests
        .create(state.postgres.as_ref(), req.receiver_id, req.donor_id)
        .await
    {
        Ok(request_id) => {
            tracing::info!(
                "Receiver {} sent request {} to donor {}",
                req.receiver_id,
                request_id,
                req.donor_id
            );
            HttpResponse::Created().json(RequestCreatedResponse {
                request_id,
                status: RequestStatus::Pending,
            })
        }
        Err(e) => {
            tracing::info!(
                "Request creation failed ({} -> {}): {}",
                req.receiver_id,
                req.donor_id,
                e
            );
            request_error_response(&e)
        }
    }
}

async fn decide_request(
    state: &AppState,
    request_id: i64,
    body: &DecisionRequest,
    decision: RequestDecision,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state
        .requests
        .decide(state.postgres.as_ref(), request_id, body.donor_id, decision)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(TransitionResponse { success: true }),
        Err(e) => {
            tracing::error!("Decision on request {} failed: {}", request_id, e);
            request_error_response(&e)
        }
    }
}

/// Donor accepts an incoming request
///
/// POST /api/v1/requests/{id}/accept
async fn accept_request(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<DecisionRequest>,
) -> impl Responder {
    decide_request(&state, path.into_inner(), &body, RequestDecision::Accepted).await
}

/// Donor rejects an incoming request
///
/// POST /api/v1/requests/{id}/reject
async fn reject_request(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<DecisionRequest>,
) -> impl Responder {
    decide_request(&state, path.into_inner(), &body, RequestDecision::Rejected).await
}

/// Requests addressed to a donor
///
/// GET /api/v1/requests/incoming?donorId={id}
async fn incoming_requests(
    state: web::Data<AppState>,
    query: web::Query<IncomingRequestsQuery>,
) -> impl Responder {
    match state.postgres.incoming_requests(query.donor_id).await {
        Ok(requests) => HttpResponse::Ok().json(serde_json::json!({
            "donorId": query.donor_id,
            "requests": requests,
            "count": requests.len(),
        })),
        Err(e) => {
            tracing::error!("Failed to fetch incoming requests for {}: {}", query.donor_id, e);
            postgres_error_response(&e)
        }
    }
}

/// Requests a receiver has sent
///
/// GET /api/v1/requests/sent?receiverId={id}
async fn sent_requests(
    state: web::Data<AppState>,
    query: web::Query<SentRequestsQuery>,
) -> impl Responder {
    match state.postgres.sent_requests(query.receiver_id).await {
        Ok(requests) => HttpResponse::Ok().json(serde_json::json!({
            "receiverId": query.receiver_id,
            "requests": requests,
            "count": requests.len(),
        })),
        Err(e) => {
            tracing::error!("Failed to fetch sent requests for {}: {}", query.receiver_id, e);
            postgres_error_response(&e)
        }
    }
}

/// Update a donor profile
///
/// PUT /api/v1/donors/{id}
async fn update_donor(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<UpdateDonorRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let donor_id = path.into_inner();

    match state.postgres.update_donor(donor_id, &req).await {
        Ok(()) => HttpResponse::Ok().json(TransitionResponse { success: true }),
        Err(e) => {
            tracing::info!("Donor update failed for {}: {}", donor_id, e);
            postgres_error_response(&e)
        }
    }
}
