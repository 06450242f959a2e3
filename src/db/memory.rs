use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{Article, ClickEvent, Tables, User},
};

use super::DataStore;

/// Process-local data store, optionally seeded from a JSON file
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Reads `{"clicks": [...], "articles": [...], "users": [...]}` from disk
    pub async fn from_json_file(path: &Path) -> AppResult<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Internal(format!("failed to read seed file {}: {}", path.display(), e))
        })?;
        let tables: Tables = serde_json::from_str(&raw).map_err(|e| {
            AppError::Internal(format!("failed to parse seed file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            clicks = tables.clicks.len(),
            articles = tables.articles.len(),
            users = tables.users.len(),
            "Seeded memory store"
        );

        Ok(Self::with_tables(tables))
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn load_clicks(&self) -> AppResult<Vec<ClickEvent>> {
        Ok(self.tables.read().await.clicks.clone())
    }

    async fn load_articles(&self) -> AppResult<Vec<Article>> {
        Ok(self.tables.read().await.articles.clone())
    }

    async fn load_users(&self) -> AppResult<Vec<User>> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn save_articles(&self, articles: &[Article]) -> AppResult<()> {
        self.tables.write().await.articles = articles.to_vec();
        Ok(())
    }

    async fn save_users(&self, users: &[User]) -> AppResult<()> {
        self.tables.write().await.users = users.to_vec();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
