use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A row of the `books` table.
///
/// Used both as the request body for create and update (validated at the
/// boundary, every field required, unknown fields rejected) and as the
/// response representation.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    ToSchema,
    Validate,
    sqlx::FromRow,
)]
#[serde(deny_unknown_fields)]
pub struct Book {
    /// Primary key. Ignored on update, where the path selects the book.
    #[validate(length(min = 1, message = "Must not be empty"))]
    #[schema(example = "0691161518")]
    pub isbn: String,
    #[validate(url(message = "Must be a valid URL"))]
    #[schema(example = "http://a.co/eobPtX2")]
    pub amazon_url: String,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub language: String,
    #[validate(range(min = 1, message = "Must be at least 1"))]
    pub pages: i32,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub publisher: String,
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub title: String,
    pub year: i32,
}
