use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::model::Book;

use super::{BookStore, StoreError, BOOK_COLUMNS, CREATE_BOOKS_TABLE};

pub struct SqliteBookStore {
    pool: SqlitePool,
}

impl SqliteBookStore {
    /// Every connection to `sqlite::memory:` opens its own database, so an
    /// in-memory store is limited to one connection that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool_options = match url.contains(":memory:") {
            true => SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
            false => SqlitePoolOptions::new().max_connections(max_connections),
        };

        let pool = pool_options.connect_with(options).await?;

        Self::from_pool(pool).await
    }

    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:", 1).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(CREATE_BOOKS_TABLE).execute(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl BookStore for SqliteBookStore {
    #[tracing::instrument(name = "sqlite_create_book", skip_all, fields(isbn = %book.isbn))]
    async fn create(&self, book: &Book) -> Result<Book, StoreError> {
        let sql = format!(
            "INSERT INTO books ({BOOK_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {BOOK_COLUMNS}"
        );

        sqlx::query_as::<_, Book>(&sql)
            .bind(&book.isbn)
            .bind(&book.amazon_url)
            .bind(&book.author)
            .bind(&book.language)
            .bind(book.pages)
            .bind(&book.publisher)
            .bind(&book.title)
            .bind(book.year)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| StoreError::from_insert_error(err, &book.isbn))
    }

    #[tracing::instrument(name = "sqlite_list_books", skip_all)]
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY title");

        let books = sqlx::query_as::<_, Book>(&sql).fetch_all(&self.pool).await?;

        Ok(books)
    }

    #[tracing::instrument(name = "sqlite_get_book", skip(self))]
    async fn get(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE isbn = ?");

        let book = sqlx::query_as::<_, Book>(&sql)
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    #[tracing::instrument(name = "sqlite_update_book", skip(self, book))]
    async fn update(&self, isbn: &str, book: &Book) -> Result<Option<Book>, StoreError> {
        let sql = format!(
            "UPDATE books SET amazon_url = ?, author = ?, language = ?, pages = ?, publisher = ?, title = ?, year = ? WHERE isbn = ? RETURNING {BOOK_COLUMNS}"
        );

        let book = sqlx::query_as::<_, Book>(&sql)
            .bind(&book.amazon_url)
            .bind(&book.author)
            .bind(&book.language)
            .bind(book.pages)
            .bind(&book.publisher)
            .bind(&book.title)
            .bind(book.year)
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    #[tracing::instrument(name = "sqlite_delete_book", skip(self))]
    async fn delete(&self, isbn: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
