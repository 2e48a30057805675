use axum::Router;

pub mod media;
pub mod products;
pub mod system;

/// Router for every service-backed endpoint.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/media", media::router())
}
