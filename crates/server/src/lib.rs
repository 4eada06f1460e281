//! HTTP front end for the key router.
//!
//! Provides a [`LookupServer`] that exposes the [`Registry`] over axum:
//!
//! - `GET /service/` lists every service and its members
//! - `GET|POST /service/{name}` returns between `min` and `max` members for `key`
//!
//! Lookup arguments come from a JSON body when the request is sent with
//! `Content-Type: application/json`, otherwise from the query string and an
//! urlencoded form body. Successful lookups return a JSON array of members.
//! Failures return a plain-text message with a 4xx or 5xx status.

mod args;
mod error;
mod handlers;


use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use registry::Registry;

pub use args::LookupArgs;
pub use error::ServerError;

/// Shared state for all handlers.
#[derive(Clone)]
pub(crate) struct AppState {
    pub registry: Arc<Registry>,
}

/// HTTP lookup server backed by a shared [`Registry`].
pub struct LookupServer {
    router: Router,
}

impl LookupServer {
    pub fn new(registry: Arc<Registry>) -> Self {
        let router = Self::build_router(AppState { registry });
        Self { router }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/service/", get(handlers::list_services))
            // Service names may contain slashes.
            .route(
                "/service/{*name}",
                get(handlers::lookup).post(handlers::lookup),
            )
            .with_state(state)
    }

    /// Return the inner [`Router`] (useful for testing with `tower::ServiceExt`).
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve on the given TCP address until the process exits.
    pub async fn serve(self, addr: &str) -> Result<(), std::io::Error> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(addr, "lookup server listening");
        axum::serve(listener, self.router).await
    }

    /// Serve with graceful shutdown triggered by `shutdown`.
    ///
    /// In-flight requests are allowed to finish once `shutdown` completes.
    pub async fn serve_with_shutdown(
        self,
        addr: &str,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(addr, "lookup server listening");
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
