use axum::extract::FromRequest;

use crate::error::ApiError;

/// An extractor that consumes the request and exposes what it extracted,
/// so that wrappers like [`super::validated::Validated`] can inspect it.
pub trait ExtractorFromRequest<S>: FromRequest<S, Rejection = ApiError> {
    type Extracted;

    fn extracted(&self) -> &Self::Extracted;
}
