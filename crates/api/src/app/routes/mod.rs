use axum::Router;

pub mod people;
pub mod system;

/// Router for all domain endpoints.
pub fn router() -> Router {
    Router::new().nest("/people", people::router())
}
