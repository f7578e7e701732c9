use std::sync::Arc;

use axum::{
    body::Body,
    http::{
        header::{ALLOW, CONTENT_TYPE},
        HeaderMap, Method, Request, StatusCode,
    },
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{
    error::ErrorVerbosity,
    model::Book,
    server::{self, ServerConfig},
    state::ApiState,
    store::{BookStore, SqliteBookStore},
};

#[tokio::test]
async fn example_config_is_valid() {
    ServerConfig::from_config_file("config.example.yaml")
        .await
        .expect("Example config is not parsable");
}

const SEEDED_ISBN: &str = "123432122";

/// The router over a fresh in-memory database holding one seeded book.
struct TestApp {
    app: Router,
    store: Arc<SqliteBookStore>,
}

impl TestApp {
    async fn setup() -> Self {
        Self::setup_with_verbosity(ErrorVerbosity::Full).await
    }

    async fn setup_with_verbosity(error_verbosity: ErrorVerbosity) -> Self {
        let store = Arc::new(
            SqliteBookStore::in_memory()
                .await
                .expect("Failed to open in-memory store"),
        );

        let seeded = store
            .create(&Book {
                isbn: SEEDED_ISBN.to_string(),
                amazon_url: "https://amazon.com/taco".to_string(),
                author: "Elie".to_string(),
                language: "English".to_string(),
                pages: 100,
                publisher: "Nothing publishers".to_string(),
                title: "my first book".to_string(),
                year: 2008,
            })
            .await
            .expect("Failed to seed book");
        assert_eq!(seeded.isbn, SEEDED_ISBN);

        let state = ApiState::new(error_verbosity, store.clone());

        Self {
            app: server::app(state),
            store,
        }
    }

    async fn teardown(self) {
        sqlx::query("DELETE FROM books")
            .execute(self.store.pool())
            .await
            .expect("Failed to clear books");

        self.store.close().await;
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, _, body) = self.request_with_headers(method, uri, body).await;

        (status, body)
    }

    async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        let body = match bytes.is_empty() {
            true => Value::Null,
            false => serde_json::from_slice(&bytes).expect("Body is not JSON"),
        };

        (status, headers, body)
    }

    async fn book_count(&self) -> usize {
        self.store.list().await.expect("Failed to list").len()
    }
}

fn new_book(isbn: &str) -> Value {
    json!({
        "isbn": isbn,
        "amazon_url": "https://google.com",
        "author": "Testy McTestface",
        "language": "english",
        "pages": 69,
        "publisher": "Tester",
        "title": "how to be incredibly sick af",
        "year": 2024,
    })
}

#[tokio::test]
async fn create_book_returns_created_book() {
    let app = TestApp::setup().await;

    let (status, body) = app
        .request(Method::POST, "/books", Some(new_book("42069420")))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["book"]["isbn"], "42069420");
    assert_eq!(body["book"]["title"], "how to be incredibly sick af");
    assert_eq!(app.book_count().await, 2);

    app.teardown().await;
}

#[tokio::test]
async fn create_book_without_required_fields_is_rejected() {
    let app = TestApp::setup().await;

    let (status, body) = app
        .request(Method::POST, "/books", Some(json!({ "pages": 69 })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "Body");
    assert_eq!(app.book_count().await, 1);

    app.teardown().await;
}

#[tokio::test]
async fn create_book_with_invalid_fields_is_rejected() {
    let app = TestApp::setup().await;

    let mut book = new_book("42069420");
    book["amazon_url"] = json!("not a url");
    book["pages"] = json!(0);

    let (status, body) = app.request(Method::POST, "/books", Some(book)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "Validation");
    assert!(body["error"]["validation_errors"]["amazon_url"].is_array());
    assert!(body["error"]["validation_errors"]["pages"].is_array());
    assert_eq!(app.book_count().await, 1);

    app.teardown().await;
}

#[tokio::test]
async fn create_book_with_wrong_types_is_rejected() {
    let app = TestApp::setup().await;

    let mut book = new_book("42069420");
    book["pages"] = json!("sixty-nine");

    let (status, _) = app.request(Method::POST, "/books", Some(book)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.book_count().await, 1);

    app.teardown().await;
}

#[tokio::test]
async fn create_book_with_existing_isbn_conflicts() {
    let app = TestApp::setup().await;

    let (status, body) = app
        .request(Method::POST, "/books", Some(new_book(SEEDED_ISBN)))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_type"], "AlreadyExists");
    assert_eq!(app.book_count().await, 1);

    app.teardown().await;
}

#[tokio::test]
async fn list_books_returns_seeded_book() {
    let app = TestApp::setup().await;

    let (status, body) = app.request(Method::GET, "/books", None).await;

    assert_eq!(status, StatusCode::OK);

    let books = body["books"].as_array().expect("books is not an array");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["isbn"], SEEDED_ISBN);
    assert_eq!(books[0]["title"], "my first book");

    app.teardown().await;
}

#[tokio::test]
async fn get_book_returns_book_or_not_found() {
    let app = TestApp::setup().await;

    let (status, body) = app
        .request(Method::GET, &format!("/books/{SEEDED_ISBN}"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["author"], "Elie");

    let (status, body) = app.request(Method::GET, "/books/00000000", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "NotFound");
    assert_eq!(
        body["context"]["reason"],
        "There is no book with isbn 00000000"
    );

    app.teardown().await;
}

#[tokio::test]
async fn update_book_replaces_all_fields() {
    let app = TestApp::setup().await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/books/{SEEDED_ISBN}"),
            Some(new_book(SEEDED_ISBN)),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["isbn"], SEEDED_ISBN);
    assert_eq!(body["book"]["title"], "how to be incredibly sick af");
    assert_eq!(body["book"]["pages"], 69);

    app.teardown().await;
}

#[tokio::test]
async fn update_book_with_unknown_field_is_rejected() {
    let app = TestApp::setup().await;

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/books/{SEEDED_ISBN}"),
            Some(json!({ "badField": "DO NOT ADD ME!" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut book = new_book(SEEDED_ISBN);
    book["badField"] = json!("DO NOT ADD ME!");

    let (status, _) = app
        .request(Method::PUT, &format!("/books/{SEEDED_ISBN}"), Some(book))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.teardown().await;
}

#[tokio::test]
async fn update_book_validates_before_looking_up_isbn() {
    let app = TestApp::setup().await;

    let (status, _) = app
        .request(Method::PUT, "/books/00000000", Some(json!({ "pages": 1 })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.teardown().await;
}

#[tokio::test]
async fn update_missing_book_is_not_found() {
    let app = TestApp::setup().await;

    let (status, _) = app
        .request(Method::PUT, "/books/00000000", Some(new_book(SEEDED_ISBN)))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);

    app.teardown().await;
}

#[tokio::test]
async fn delete_book_removes_it() {
    let app = TestApp::setup().await;

    let (status, body) = app
        .request(Method::DELETE, &format!("/books/{SEEDED_ISBN}"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Book deleted" }));
    assert_eq!(app.book_count().await, 0);

    let (status, _) = app
        .request(Method::DELETE, &format!("/books/{SEEDED_ISBN}"), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);

    app.teardown().await;
}

#[tokio::test]
async fn unknown_routes_and_methods_are_api_errors() {
    let app = TestApp::setup().await;

    let (status, body) = app.request(Method::GET, "/authors", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "NotFound");

    let (status, headers, body) = app
        .request_with_headers(Method::PATCH, "/books", None)
        .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error_type"], "MethodNotAllowed");

    let allow = headers
        .get(ALLOW)
        .and_then(|allow| allow.to_str().ok())
        .expect("Allow header is missing");
    assert!(allow.contains("GET"));
    assert!(allow.contains("POST"));

    app.teardown().await;
}

#[tokio::test]
async fn openapi_document_lists_book_routes() {
    let app = TestApp::setup().await;

    let (status, body) = app
        .request(Method::GET, "/api-docs/openapi.json", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/books"]["post"].is_object());
    assert!(body["paths"]["/books/{id}"]["put"].is_object());

    app.teardown().await;
}

#[tokio::test]
async fn isbn_in_path_is_trimmed_and_must_not_be_blank() {
    let app = TestApp::setup().await;

    let (status, body) = app
        .request(Method::GET, &format!("/books/%20{SEEDED_ISBN}%20"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["isbn"], SEEDED_ISBN);

    let (status, body) = app.request(Method::DELETE, "/books/%20%20", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "Path");
    assert_eq!(body["error"]["path_error_reason"], "Isbn must not be blank");
    assert_eq!(app.book_count().await, 1);

    app.teardown().await;
}

/// Error responses of one app for each kind of failure.
struct ErrorResponses {
    invalid_body: (StatusCode, Value),
    missing_book: (StatusCode, Value),
    missing_route: (StatusCode, Value),
    internal: (StatusCode, Value),
}

impl ErrorResponses {
    async fn collect(error_verbosity: ErrorVerbosity) -> Self {
        let app = TestApp::setup_with_verbosity(error_verbosity).await;

        let invalid_body = app
            .request(Method::POST, "/books", Some(json!({ "pages": 1 })))
            .await;
        let missing_book = app
            .request(Method::PUT, "/books/00000000", Some(new_book("00000000")))
            .await;
        let missing_route = app.request(Method::GET, "/authors", None).await;

        assert_eq!(app.book_count().await, 1);

        // Every query fails once the pool is closed.
        app.store.close().await;
        let internal = app.request(Method::GET, "/books", None).await;

        Self {
            invalid_body,
            missing_book,
            missing_route,
            internal,
        }
    }

    fn all(&self) -> [&(StatusCode, Value); 4] {
        [
            &self.invalid_body,
            &self.missing_book,
            &self.missing_route,
            &self.internal,
        ]
    }

    fn assert_statuses(&self) {
        assert_eq!(self.invalid_body.0, StatusCode::BAD_REQUEST);
        assert_eq!(self.missing_book.0, StatusCode::NOT_FOUND);
        assert_eq!(self.missing_route.0, StatusCode::NOT_FOUND);
        assert_eq!(self.internal.0, StatusCode::INTERNAL_SERVER_ERROR);
    }
}

#[tokio::test]
async fn verbosity_none_keeps_status_and_drops_body() {
    let responses = ErrorResponses::collect(ErrorVerbosity::None).await;

    responses.assert_statuses();
    for (_, body) in responses.all() {
        assert_eq!(body, &Value::Null);
    }
}

#[tokio::test]
async fn verbosity_status_code_keeps_status_and_drops_body() {
    let responses = ErrorResponses::collect(ErrorVerbosity::StatusCode).await;

    responses.assert_statuses();
    for (_, body) in responses.all() {
        assert_eq!(body, &Value::Null);
    }
}

#[tokio::test]
async fn verbosity_message_returns_only_the_message() {
    let responses = ErrorResponses::collect(ErrorVerbosity::Message).await;

    responses.assert_statuses();
    assert_eq!(
        responses.invalid_body.1,
        json!({ "message": "Failed to parse request body" })
    );
    assert_eq!(responses.missing_book.1, json!({ "message": "Book not found" }));
    assert_eq!(
        responses.missing_route.1,
        json!({ "message": "The requested resource was not found" })
    );
    assert_eq!(
        responses.internal.1,
        json!({ "message": "An internal server error has occurred" })
    );
}

#[tokio::test]
async fn verbosity_type_returns_error_types_without_reasons() {
    let responses = ErrorResponses::collect(ErrorVerbosity::Type).await;

    responses.assert_statuses();

    let (_, body) = &responses.invalid_body;
    assert_eq!(body["error_type"], "Body");
    assert!(body["error"]["body_error_reason"].is_null());
    assert!(body["error"]["body_expected_schema"].is_null());

    let (_, body) = &responses.missing_book;
    assert_eq!(body["error_type"], "NotFound");
    assert_eq!(body["message"], "Book not found");
    assert!(body.get("context").is_none());

    let (_, body) = &responses.missing_route;
    assert_eq!(body["error_type"], "NotFound");

    let (_, body) = &responses.internal;
    assert_eq!(body["error_type"], "InternalServerError");
    assert!(body["error"]["internal_server_error"].is_null());
}

#[tokio::test]
async fn verbosity_full_returns_reasons_and_context() {
    let responses = ErrorResponses::collect(ErrorVerbosity::Full).await;

    responses.assert_statuses();

    let (_, body) = &responses.invalid_body;
    assert_eq!(body["error_type"], "Body");
    assert!(body["error"]["body_error_reason"].is_string());
    assert!(body["error"]["body_expected_schema"].is_string());

    let (_, body) = &responses.missing_book;
    assert_eq!(
        body["context"]["reason"],
        "There is no book with isbn 00000000"
    );

    let (_, body) = &responses.internal;
    assert!(body["error"]["internal_server_error"].is_string());
}
