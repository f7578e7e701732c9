use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::IntoResponse,
};

use crate::error::{ApiError, ErrorVerbosityProvider, MethodNotAllowedError};

/// Replaces axum's empty 405 with an [`ApiError`], keeping the `Allow` header axum computed.
pub async fn method_not_allowed<S: ErrorVerbosityProvider>(
    State(state): State<S>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let method = req.method().clone();
    let resp = next.run(req).await;

    if resp.status() != StatusCode::METHOD_NOT_ALLOWED {
        return Ok(resp);
    }

    let allow = resp.headers().get(header::ALLOW).cloned();
    tracing::debug!(%method, ?allow, "Method not allowed");

    Err(MethodNotAllowedError::new(state.error_verbosity(), allow).into())
}
