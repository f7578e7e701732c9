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
    model::Book,
    server_error,
    state::ApiState,
};

use super::{BookError, BookErrorType};

#[derive(Debug, Serialize, ToSchema)]
pub struct GetBookResponse {
    pub book: Book,
}

impl IntoResponse for GetBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Isbn of the book")),
    responses(
        (status = 200, description = "The book", body = GetBookResponse),
        (status = 404, description = "No book with this isbn")
    )
)]
pub async fn get_book(
    State(state): State<ApiState>,
    Isbn(isbn): Isbn,
) -> Result<GetBookResponse, BookError> {
    let book = state.books().get(&isbn).await.map_err(server_error!(state))?;

    match book {
        Some(book) => Ok(GetBookResponse { book }),
        None => Err(ResourceError::new(
            state.error_verbosity(),
            BookErrorType::NotFound { isbn },
        )
        .into()),
    }
}
