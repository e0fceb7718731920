//! HTTP handlers for the scope API.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use dealdesk_application::ResolvedAccess;
use dealdesk_core::{AppError, Identity};

use crate::dto::ScopeResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Header carrying the identity asserted by the fronting identity provider.
const IDENTITY_HEADER: &str = "x-authenticated-identity";

/// Liveness probe.
pub async fn health_handler() -> &'static str {
    "ok"
}

/// Resolves record scope and module access for the current identity.
///
/// A missing identity header is the unauthenticated case and yields the
/// denied result rather than an error, so unauthenticated dashboards render
/// empty data instead of failing.
pub async fn resolve_scope_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ScopeResponse>> {
    let Some(raw_identity) = headers.get(IDENTITY_HEADER) else {
        return Ok(Json(ScopeResponse::from(ResolvedAccess::denied())));
    };

    let raw_identity = raw_identity
        .to_str()
        .map_err(|_| AppError::Validation("identity header must be valid UTF-8".to_owned()))?;
    let identity = Identity::new(raw_identity)?;
    let access = state.scope_service.resolve(&identity).await?;

    Ok(Json(ScopeResponse::from(access)))
}
