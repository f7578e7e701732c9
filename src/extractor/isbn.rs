use axum::{
    async_trait,
    extract::{FromRequestParts, Path as AxumPath},
    http::request::Parts,
};

use crate::error::{ApiError, ErrorVerbosityProvider, PathError};

/// Extracts the `:id` segment of a book route as an isbn.
///
/// Surrounding whitespace is trimmed; a blank segment is rejected with a [`PathError`].
#[derive(Debug)]
pub struct Isbn(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Isbn
where
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "isbn_extractor", skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verbosity = state.error_verbosity();

        let AxumPath(id) = AxumPath::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::warn!(?rejection, "Rejection");

                PathError::from_path_rejection(verbosity, rejection)
            })?;

        let isbn = id.trim();

        if isbn.is_empty() {
            tracing::warn!(%id, "Blank isbn");

            return Err(PathError::new(verbosity, String::from("Isbn must not be blank")).into());
        }

        tracing::trace!(%isbn, "Extracted");

        Ok(Isbn(isbn.to_owned()))
    }
}
