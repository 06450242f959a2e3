use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{Article, ClickEvent, SizeCategory, User},
};

use super::DataStore;

/// Rows per multi-row INSERT, well under the Postgres bind parameter limit
const INSERT_CHUNK: usize = 5_000;

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

#[derive(FromRow)]
struct ClickRow {
    user_id: i64,
    click_article_id: i64,
}

#[derive(FromRow)]
struct ArticleRow {
    article_id: i64,
    words_count: i64,
    id_cluster_embedding: i64,
    article_size: String,
}

impl TryFrom<ArticleRow> for Article {
    type Error = AppError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        let size_category = row.article_size.parse::<SizeCategory>().map_err(|e| {
            AppError::Internal(format!("article {}: {}", row.article_id, e))
        })?;

        Ok(Article {
            article_id: row.article_id,
            words_count: row.words_count,
            cluster_id: row.id_cluster_embedding,
            size_category,
        })
    }
}

/// Data store backed by the `clicks`, `articles` and `users` tables
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled schema migrations
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DataStore for PostgresStore {
    async fn load_clicks(&self) -> AppResult<Vec<ClickEvent>> {
        let rows: Vec<ClickRow> =
            sqlx::query_as("SELECT user_id, click_article_id FROM clicks ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|row| ClickEvent::new(row.user_id, row.click_article_id))
            .collect())
    }

    async fn load_articles(&self) -> AppResult<Vec<Article>> {
        let rows: Vec<ArticleRow> = sqlx::query_as(
            r#"
            SELECT article_id, words_count, id_cluster_embedding, article_size
            FROM articles
            ORDER BY position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Article::try_from).collect()
    }

    async fn load_users(&self) -> AppResult<Vec<User>> {
        let ids: Vec<(i64,)> = sqlx::query_as("SELECT user_id FROM users ORDER BY position")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().map(|(user_id,)| User { user_id }).collect())
    }

    async fn save_articles(&self, articles: &[Article]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM articles").execute(&mut *tx).await?;

        for (chunk_index, chunk) in articles.chunks(INSERT_CHUNK).enumerate() {
            let offset = (chunk_index * INSERT_CHUNK) as i64;
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO articles (position, article_id, words_count, id_cluster_embedding, article_size) ",
            );
            builder.push_values(chunk.iter().enumerate(), |mut b, (i, article)| {
                b.push_bind(offset + i as i64)
                    .push_bind(article.article_id)
                    .push_bind(article.words_count)
                    .push_bind(article.cluster_id)
                    .push_bind(article.size_category.as_str());
            });
            builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        tracing::info!(rows = articles.len(), "Persisted articles table");
        Ok(())
    }

    async fn save_users(&self, users: &[User]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM users").execute(&mut *tx).await?;

        for (chunk_index, chunk) in users.chunks(INSERT_CHUNK).enumerate() {
            let offset = (chunk_index * INSERT_CHUNK) as i64;
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO users (position, user_id) ");
            builder.push_values(chunk.iter().enumerate(), |mut b, (i, user)| {
                b.push_bind(offset + i as i64).push_bind(user.user_id);
            });
            builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        tracing::info!(rows = users.len(), "Persisted users table");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
