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
    extractor::{isbn::Isbn, json::ApiJson, validated::Validated},
    model::Book,
    server_error,
    state::ApiState,
};

use super::{BookError, BookErrorType};

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateBookResponse {
    pub book: Book,
}

impl IntoResponse for UpdateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Replaces the book as a whole. The body is validated before the isbn is looked up,
/// and the isbn of the path wins over the one in the body.
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Isbn of the book")),
    request_body = Book,
    responses(
        (status = 200, description = "Book updated", body = UpdateBookResponse),
        (status = 400, description = "Body is missing fields, has unknown fields or fails validation"),
        (status = 404, description = "No book with this isbn")
    )
)]
pub async fn update_book(
    State(state): State<ApiState>,
    Isbn(isbn): Isbn,
    Validated(ApiJson(book)): Validated<ApiJson<Book>>,
) -> Result<UpdateBookResponse, BookError> {
    let updated = state
        .books()
        .update(&isbn, &book)
        .await
        .map_err(server_error!(state))?;

    match updated {
        Some(book) => Ok(UpdateBookResponse { book }),
        None => Err(ResourceError::new(
            state.error_verbosity(),
            BookErrorType::NotFound { isbn },
        )
        .into()),
    }
}
