use std::fmt::Display;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Article, ClickEvent, User},
};

/// Named tables exchanged with a data store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Clicks,
    Articles,
    Users,
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Table::Clicks => write!(f, "clicks"),
            Table::Articles => write!(f, "articles"),
            Table::Users => write!(f, "users"),
        }
    }
}

/// Source and sink for the recommender tables
///
/// Implementations must make `save_*` durable before returning: the caller
/// treats a successful save as the commit point of a mutation. A save always
/// receives the whole table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn load_clicks(&self) -> AppResult<Vec<ClickEvent>>;

    async fn load_articles(&self) -> AppResult<Vec<Article>>;

    async fn load_users(&self) -> AppResult<Vec<User>>;

    async fn save_articles(&self, articles: &[Article]) -> AppResult<()>;

    async fn save_users(&self, users: &[User]) -> AppResult<()>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}
