use axum::{
    extract::State,
    http::{Method, Uri},
};

use crate::{
    error::{ApiError, ErrorVerbosityProvider, NotFoundError},
    state::ApiState,
};

/// Fallback for requests no route matches.
pub async fn not_found(State(state): State<ApiState>, method: Method, uri: Uri) -> ApiError {
    tracing::debug!(%method, %uri, "No route matched");

    NotFoundError::new(state.error_verbosity()).into()
}
