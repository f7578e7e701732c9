use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::model::Book;

use super::{BookStore, StoreError, BOOK_COLUMNS, CREATE_BOOKS_TABLE};

pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: PgPool) -> Result<Self, StoreError> {
        sqlx::query(CREATE_BOOKS_TABLE).execute(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    #[tracing::instrument(name = "pg_create_book", skip_all, fields(isbn = %book.isbn))]
    async fn create(&self, book: &Book) -> Result<Book, StoreError> {
        let sql = format!(
            "INSERT INTO books ({BOOK_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {BOOK_COLUMNS}"
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

    #[tracing::instrument(name = "pg_list_books", skip_all)]
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY title");

        let books = sqlx::query_as::<_, Book>(&sql).fetch_all(&self.pool).await?;

        Ok(books)
    }

    #[tracing::instrument(name = "pg_get_book", skip(self))]
    async fn get(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE isbn = $1");

        let book = sqlx::query_as::<_, Book>(&sql)
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    #[tracing::instrument(name = "pg_update_book", skip(self, book))]
    async fn update(&self, isbn: &str, book: &Book) -> Result<Option<Book>, StoreError> {
        let sql = format!(
            "UPDATE books SET amazon_url = $1, author = $2, language = $3, pages = $4, publisher = $5, title = $6, year = $7 WHERE isbn = $8 RETURNING {BOOK_COLUMNS}"
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

    #[tracing::instrument(name = "pg_delete_book", skip(self))]
    async fn delete(&self, isbn: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
