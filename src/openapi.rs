use axum::Json;
use utoipa::OpenApi;

use crate::{
    model::Book,
    route::books::{
        create_book::{self, CreateBookResponse},
        delete_book::{self, DeleteBookResponse},
        get_book::{self, GetBookResponse},
        list_books::{self, ListBooksResponse},
        update_book::{self, UpdateBookResponse},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        list_books::list_books,
        create_book::create_book,
        get_book::get_book,
        update_book::update_book,
        delete_book::delete_book
    ),
    components(schemas(
        Book,
        CreateBookResponse,
        ListBooksResponse,
        GetBookResponse,
        UpdateBookResponse,
        DeleteBookResponse
    )),
    tags((name = "books", description = "Create, read, replace and delete books"))
)]
pub struct ApiDoc;

/// Serves the OpenAPI document of the book endpoints.
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
