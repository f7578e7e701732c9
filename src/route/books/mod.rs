use axum::http::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::error::{ResourceErrorProvider, RouteError};

pub mod app;
pub mod create_book;
pub mod delete_book;
pub mod get_book;
pub mod list_books;
pub mod update_book;

pub type BookError = RouteError<BookErrorType, BookErrorContext>;

#[derive(Debug, Serialize)]
#[serde(tag = "error_type")]
pub enum BookErrorType {
    NotFound {
        #[serde(skip)]
        isbn: String,
    },
    AlreadyExists {
        #[serde(skip)]
        isbn: String,
    },
}

#[derive(Debug, Serialize)]
pub struct BookErrorContext {
    pub reason: String,
}

impl ResourceErrorProvider for BookErrorType {
    type Context = BookErrorContext;

    fn headers(&self) -> Option<HeaderMap> {
        None
    }

    fn status_code(&self) -> StatusCode {
        match self {
            BookErrorType::NotFound { .. } => StatusCode::NOT_FOUND,
            BookErrorType::AlreadyExists { .. } => StatusCode::CONFLICT,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            BookErrorType::NotFound { .. } => "Book not found",
            BookErrorType::AlreadyExists { .. } => "Book already exists",
        }
    }

    fn context(&self) -> Self::Context {
        match self {
            BookErrorType::NotFound { isbn } => BookErrorContext {
                reason: format!("There is no book with isbn {isbn}"),
            },
            BookErrorType::AlreadyExists { isbn } => BookErrorContext {
                reason: format!("A book with isbn {isbn} already exists"),
            },
        }
    }
}
