//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: `PersonService` and its wiring onto the in-memory store
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and request validation
//! - `errors.rs`: problem-detail error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use geocore_core::{Clock, DomainResult, SystemClock};
use geocore_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> DomainResult<Router> {
    build_app_with_clock(config, Arc::new(SystemClock))
}

/// Same as [`build_app`], with an explicit clock (tests pin "today").
pub fn build_app_with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> DomainResult<Router> {
    let services = Arc::new(services::build_services(clock, config.seed_sample_data)?);
    Ok(router_for(services))
}

/// Router over an already-built service.
pub fn router_for(services: Arc<services::AppServices>) -> Router {
    let app = Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services));

    middleware::with_request_tracing(app)
}
