//! Axum bindings: the request gate middleware and the wire renderings of
//! decisions. The host builds its own router and layers [`enforce`] with
//! `axum::middleware::from_fn_with_state` after its token/session layer
//! has attached a [`RequestIdentity`] extension.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::engine;
use crate::types::{Decision, Policy};

/// Identity material the host's auth layer attaches to the request before
/// the gate runs: decoded-credential claims and/or session claims, each
/// optionally carrying a `role` string field.
#[derive(Clone, Debug, Default)]
pub struct RequestIdentity {
    pub decoded: Option<serde_json::Value>,
    pub session: Option<serde_json::Value>,
}

/// Shared gate state. The policy is immutable; hot reload means
/// validating a fresh document and swapping in a new `Arc`.
#[derive(Clone)]
pub struct AclState {
    pub policy: Arc<Policy>,
    pub base_url: Option<String>,
}

/// Request gate for `axum::middleware::from_fn_with_state`. Allowed
/// requests continue down the stack; every other decision is rendered
/// here, and engine errors surface as server errors.
pub async fn enforce(State(state): State<AclState>, req: Request, next: Next) -> Response {
    let identity = req
        .extensions()
        .get::<RequestIdentity>()
        .cloned()
        .unwrap_or_default();

    match engine::authorize(
        &state.policy,
        identity.decoded.as_ref(),
        identity.session.as_ref(),
        req.uri().path(),
        req.method().as_str(),
        state.base_url.as_deref(),
    ) {
        Ok(Decision::Allow) => next.run(req).await,
        Ok(decision) => decision.into_response(),
        Err(e) => e.into_response(),
    }
}

impl IntoResponse for Decision {
    fn into_response(self) -> Response {
        match self {
            // The gate never renders Allow; it is here so the enum is
            // total as a response.
            Decision::Allow => StatusCode::OK.into_response(),
            Decision::Deny => (
                StatusCode::FORBIDDEN,
                Json(json!({ "status": 403, "success": false, "error": "ACCESS DENIED" })),
            )
                .into_response(),
            Decision::RoleNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "role not found" })),
            )
                .into_response(),
            Decision::GroupNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "group not found" })),
            )
                .into_response(),
        }
    }
}
