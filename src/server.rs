//! Request-driven delivery mode.
//!
//! Exposes the same domain events as the timer loop over a single read-only
//! endpoint, computed synchronously per request. Each request opens and
//! closes its own hypervisor connection, so no handle is shared across
//! requests and no locking is needed.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use snafu::prelude::*;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::collector::{collect_events, cycle_timestamp};
use crate::error::{BindSnafu, CollectorError, ConnectionSnafu, ServeSnafu, StartupError};
use crate::event::VmEvent;
use crate::hypervisor::Connector;

/// Serve `GET /v1/domains` until cancellation.
pub async fn run(
    addr: SocketAddr,
    connector: Arc<dyn Connector>,
    shutdown: CancellationToken,
) -> Result<(), StartupError> {
    let app = router(connector);
    let listener = TcpListener::bind(addr).await.context(BindSnafu {
        address: addr.to_string(),
    })?;
    info!(address = %addr, "Serving domain events on /v1/domains");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context(ServeSnafu)
}

/// Build the serve-mode router. Exposed for tests.
pub fn router(connector: Arc<dyn Connector>) -> Router {
    Router::new()
        .route("/v1/domains", get(list_domains))
        .with_state(connector)
}

async fn list_domains(State(connector): State<Arc<dyn Connector>>) -> Response {
    // Hypervisor calls are blocking RPCs; keep them off the async workers.
    let result = tokio::task::spawn_blocking(move || collect_once(connector.as_ref())).await;

    match result {
        Ok(Ok(events)) => Json(events).into_response(),
        Ok(Err(e)) => {
            error!(error = %e, "Request collection failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
        Err(e) => {
            error!(error = %e, "Collection task panicked");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}

/// One synchronous collection over a fresh connection.
fn collect_once(connector: &dyn Connector) -> Result<Vec<VmEvent>, CollectorError> {
    let hypervisor = connector.connect().context(ConnectionSnafu)?;
    let timestamp = cycle_timestamp();
    collect_events(hypervisor.as_ref(), &timestamp)
}
