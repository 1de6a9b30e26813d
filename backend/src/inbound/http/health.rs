//! Health endpoints.
//!
//! `GET /health` reports process status and whether MongoDB answers a ping
//! right now. `/health/ready` and `/health/live` are body-less probes for
//! orchestrators: readiness turns green once the listener is bound, liveness
//! answers while the process serves requests. None of them need the bearer
//! token.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::StoreHealth;

/// Reachability of the document store as reported by `GET /health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    Connected,
    Disconnected,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthReport {
    /// `ok` whenever the process answers.
    #[schema(example = "ok")]
    pub status: String,
    /// Check time in UTC, RFC 3339 with milliseconds.
    #[schema(example = "2025-02-18T09:30:00.000Z")]
    pub timestamp: String,
    pub mongodb: StoreStatus,
}

/// Shared probe state: the readiness flag and the store to ping.
#[derive(Default)]
pub struct HealthState {
    ready: AtomicBool,
    store: Option<Arc<dyn StoreHealth>>,
}

impl HealthState {
    /// Start not ready, with no store attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the reachability of `store` from `GET /health`.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn StoreHealth>) -> Self {
        self.store = Some(store);
        self
    }

    /// Mark the service as ready once the listener is bound.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    async fn store_status(&self) -> StoreStatus {
        match &self.store {
            Some(store) if store.is_reachable().await => StoreStatus::Connected,
            _ => StoreStatus::Disconnected,
        }
    }
}

fn no_store(mut response: actix_web::HttpResponseBuilder) -> actix_web::HttpResponseBuilder {
    response.insert_header((header::CACHE_CONTROL, "no-store"));
    response
}

/// Service status with a live MongoDB ping.
#[utoipa::path(
    get,
    path = "/health",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Service status", body = HealthReport)
    )
)]
#[get("/health")]
pub async fn health(state: web::Data<HealthState>) -> HttpResponse {
    let report = HealthReport {
        status: "ok".to_owned(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        mongodb: state.store_status().await,
    };
    no_store(HttpResponse::Ok()).json(report)
}

/// Readiness probe. 200 once the server accepts traffic, 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    let response = if state.is_ready() {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    no_store(response).finish()
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "Process is serving requests"))
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    no_store(HttpResponse::Ok()).finish()
}
