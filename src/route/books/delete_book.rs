use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{ErrorVerbosityProvider, ResourceError},
    extractor::isbn::Isbn,
    server_error,
    state::ApiState,
};

use super::{BookError, BookErrorType};

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteBookResponse {
    #[schema(example = "Book deleted")]
    pub message: String,
}

impl IntoResponse for DeleteBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Isbn of the book")),
    responses(
        (status = 200, description = "Book deleted", body = DeleteBookResponse),
        (status = 404, description = "No book with this isbn")
    )
)]
pub async fn delete_book(
    State(state): State<ApiState>,
    Isbn(isbn): Isbn,
) -> Result<DeleteBookResponse, BookError> {
    let deleted = state
        .books()
        .delete(&isbn)
        .await
        .map_err(server_error!(state))?;

    match deleted {
        true => Ok(DeleteBookResponse {
            message: "Book deleted".to_string(),
        }),
        false => Err(ResourceError::new(
            state.error_verbosity(),
            BookErrorType::NotFound { isbn },
        )
        .into()),
    }
}
