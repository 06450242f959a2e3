use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::instrument;

use crate::{
    db::{DataStore, Table},
    error::{AppError, AppResult},
    models::{ArticleId, ClusterId, Dataset, Recommendation, SizeCategory, Tables, UserId},
};

use super::catalog;
use super::recommender::Recommender;

/// Owns the loaded dataset and mediates every read and write against the store
///
/// Reads share an immutable snapshot that is loaded lazily and dropped by
/// `invalidate`. Mutations are serialized by a writer lock, persisted
/// synchronously, then invalidate the snapshot so the next read reloads.
pub struct Repository {
    store: Arc<dyn DataStore>,
    top_n: usize,
    snapshot: RwLock<Option<Arc<Dataset>>>,
    writer: Mutex<()>,
}

impl Repository {
    pub fn new(store: Arc<dyn DataStore>, top_n: usize) -> Self {
        Self {
            store,
            top_n,
            snapshot: RwLock::new(None),
            writer: Mutex::new(()),
        }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Returns the current snapshot, loading it from the store if needed
    pub async fn snapshot(&self) -> AppResult<Arc<Dataset>> {
        if let Some(dataset) = self.snapshot.read().await.as_ref() {
            return Ok(Arc::clone(dataset));
        }

        let mut slot = self.snapshot.write().await;
        if let Some(dataset) = slot.as_ref() {
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(self.load().await?);
        *slot = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drops the snapshot; the next read reloads from the store
    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
        tracing::debug!("Dataset snapshot invalidated");
    }

    /// Discards the snapshot and loads a fresh one
    pub async fn reload(&self) -> AppResult<Arc<Dataset>> {
        self.invalidate().await;
        self.snapshot().await
    }

    async fn load(&self) -> AppResult<Dataset> {
        let store = self.store.name();

        let clicks = self
            .store
            .load_clicks()
            .await
            .map_err(|e| unavailable(store, Table::Clicks, e))?;
        let articles = self
            .store
            .load_articles()
            .await
            .map_err(|e| unavailable(store, Table::Articles, e))?;
        let users = self
            .store
            .load_users()
            .await
            .map_err(|e| unavailable(store, Table::Users, e))?;

        tracing::info!(
            store,
            clicks = clicks.len(),
            articles = articles.len(),
            users = users.len(),
            "Dataset loaded"
        );

        Ok(Dataset::new(Tables {
            clicks,
            articles,
            users,
        }))
    }

    /// Recommends up to `top_n` articles for a user known to the log or registry
    #[instrument(skip(self))]
    pub async fn recommend(&self, user_id: UserId) -> AppResult<Recommendation> {
        let dataset = self.snapshot().await?;

        if !dataset.is_known_user(user_id) {
            return Err(AppError::UnknownUser {
                user_id,
                last_user_id: dataset.last_user_id(),
            });
        }

        let recommendation = Recommender::new(&dataset, self.top_n).recommend(user_id);

        tracing::info!(
            strategy = u8::from(recommendation.strategy),
            count = recommendation.article_ids.len(),
            "Recommendations served"
        );

        Ok(recommendation)
    }

    /// Registers a user with the next free id and persists the registry
    #[instrument(skip(self))]
    pub async fn add_user(&self) -> AppResult<UserId> {
        let _guard = self.writer.lock().await;
        let dataset = self.snapshot().await?;

        let mut users = dataset.tables.users.clone();
        let user_id = catalog::add_user(&mut users)?;

        self.store.save_users(&users).await.map_err(|e| {
            tracing::error!(error = %e, table = %Table::Users, "Failed to persist table");
            e
        })?;
        self.invalidate().await;

        tracing::info!(user_id, "User added");
        Ok(user_id)
    }

    /// Adds an article with a derived size category and persists the catalog
    #[instrument(skip(self))]
    pub async fn add_article(
        &self,
        words_count: i64,
        cluster_id: ClusterId,
    ) -> AppResult<(ArticleId, SizeCategory)> {
        let _guard = self.writer.lock().await;
        let dataset = self.snapshot().await?;

        let mut articles = dataset.tables.articles.clone();
        let (article_id, size_category) =
            catalog::add_article(&mut articles, words_count, cluster_id)?;

        self.store.save_articles(&articles).await.map_err(|e| {
            tracing::error!(error = %e, table = %Table::Articles, "Failed to persist table");
            e
        })?;
        self.invalidate().await;

        tracing::info!(article_id, size = %size_category, "Article added");
        Ok((article_id, size_category))
    }
}

fn unavailable(store: &str, table: Table, err: AppError) -> AppError {
    tracing::error!(store, table = %table, error = %err, "Failed to load table");
    AppError::DataUnavailable(table.to_string())
}
