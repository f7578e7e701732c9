use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ErrorVerbosityProvider, InternalServerError, ResourceError},
    extractor::{json::ApiJson, validated::Validated},
    model::Book,
    state::ApiState,
    store::StoreError,
};

use super::{BookError, BookErrorType};

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBookResponse {
    pub book: Book,
}

impl IntoResponse for CreateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = Book,
    responses(
        (status = 201, description = "Book created", body = CreateBookResponse),
        (status = 400, description = "Body is missing fields, has unknown fields or fails validation"),
        (status = 409, description = "A book with the same isbn already exists")
    )
)]
pub async fn create_book(
    State(state): State<ApiState>,
    Validated(ApiJson(book)): Validated<ApiJson<Book>>,
) -> Result<CreateBookResponse, BookError> {
    match state.books().create(&book).await {
        Ok(book) => {
            tracing::debug!(isbn = %book.isbn, "Book created");

            Ok(CreateBookResponse { book })
        }
        Err(StoreError::Duplicate { isbn }) => Err(ResourceError::new(
            state.error_verbosity(),
            BookErrorType::AlreadyExists { isbn },
        )
        .into()),
        Err(err) => Err(ApiError::from(InternalServerError::from_generic_error(
            state.error_verbosity(),
            err,
        ))
        .into()),
    }
}
