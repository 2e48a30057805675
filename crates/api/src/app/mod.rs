//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store/media/credential wiring, opened once per process
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and boundary validation
//! - `errors.rs`: consistent `{message, status}` error responses

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::{Extension, Router, routing::get};
use tokio::net::TcpListener;
use tower::ServiceBuilder;

use catalog_products::CatalogStore;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: services::AppServices) -> Router {
    let services = Arc::new(services);

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router().layer(Extension(services)))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_logging)))
}

/// Serve until `shutdown` resolves, then close the store.
///
/// The store is closed even when the server fails; the server error wins.
pub async fn serve<F>(
    listener: TcpListener,
    services: services::AppServices,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let store = services.store().clone();

    let served = axum::serve(listener, build_app(services))
        .with_graceful_shutdown(shutdown)
        .await;
    let closed = store.close().await;

    served.context("http server failed")?;
    closed.context("failed to close catalog store")?;
    tracing::info!("catalog store closed");
    Ok(())
}
