//! Request handlers.

use std::collections::BTreeMap;

use axum::extract::{Path, RawQuery, State};
use axum::http::HeaderMap;
use axum::Json;
use bytes::Bytes;
use corelib::Member;
use tracing::debug;

use crate::args::LookupArgs;
use crate::error::ServerError;
use crate::AppState;

/// `GET|POST /service/{name}`
pub(crate) async fn lookup(
    State(state): State<AppState>,
    Path(name): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Vec<Member>>, ServerError> {
    // Unknown services are reported before the arguments are looked at.
    if !state.registry.contains(&name) {
        return Err(registry::Error::ServiceNotFound(name).into());
    }

    let args = LookupArgs::parse(&headers, query.as_deref(), &body)?;
    debug!(service = %name, key = %args.key, min = args.min, max = args.max, "lookup");

    let members = state
        .registry
        .lookup(&name, args.key.as_bytes(), args.min, args.max)?;
    Ok(Json(members))
}

/// `GET /service/`
pub(crate) async fn list_services(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, Vec<Member>>> {
    let services = state
        .registry
        .services()
        .into_iter()
        .map(|s| (s.name, s.members))
        .collect();
    Json(services)
}
