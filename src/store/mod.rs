//! Persistence of [`Book`]s.
//!
//! Every operation maps to a single SQL statement against the `books` table.
//! The backend is picked from the scheme of the configured database URL.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;

use crate::{model::Book, server::DatabaseConfig};

pub mod postgres;
pub mod sqlite;

pub use postgres::PgBookStore;
pub use sqlite::SqliteBookStore;

const CREATE_BOOKS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        isbn TEXT PRIMARY KEY,
        amazon_url TEXT NOT NULL,
        author TEXT NOT NULL,
        language TEXT NOT NULL,
        pages INTEGER NOT NULL,
        publisher TEXT NOT NULL,
        title TEXT NOT NULL,
        year INTEGER NOT NULL
    )
"#;

const BOOK_COLUMNS: &str = "isbn, amazon_url, author, language, pages, publisher, title, year";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Book with isbn {isbn} already exists")]
    Duplicate { isbn: String },
    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Turns a unique violation on insert into [`StoreError::Duplicate`].
    fn from_insert_error(err: sqlx::Error, isbn: &str) -> Self {
        let is_unique_violation = err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());

        match is_unique_violation {
            true => StoreError::Duplicate {
                isbn: isbn.to_owned(),
            },
            false => StoreError::Database(err),
        }
    }
}

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Inserts a new book and returns the stored row.
    async fn create(&self, book: &Book) -> Result<Book, StoreError>;

    /// Returns all books ordered by title.
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    async fn get(&self, isbn: &str) -> Result<Option<Book>, StoreError>;

    /// Replaces every field but the isbn of the book identified by `isbn`.
    ///
    /// Returns `None` if no such book exists.
    async fn update(&self, isbn: &str, book: &Book) -> Result<Option<Book>, StoreError>;

    /// Returns `false` if no such book exists.
    async fn delete(&self, isbn: &str) -> Result<bool, StoreError>;

    /// Closes the underlying connection pool.
    async fn close(&self);
}

/// Connects to the configured database and makes sure the `books` table exists.
pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn BookStore>> {
    let url = config.url.as_str();

    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        let store = PgBookStore::connect(url, config.max_connections)
            .await
            .context("Failed to connect to postgres")?;

        return Ok(Arc::new(store));
    }

    if url.starts_with("sqlite:") {
        let store = SqliteBookStore::connect(url, config.max_connections)
            .await
            .context("Failed to connect to sqlite")?;

        return Ok(Arc::new(store));
    }

    anyhow::bail!("Unsupported database url scheme: {url}")
}
