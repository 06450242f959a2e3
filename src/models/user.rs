use serde::{Deserialize, Serialize};

use super::{ArticleId, UserId};

/// A registered user. Users may exist without any clicks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
}

/// One click of a user on an article. Click order carries no meaning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClickEvent {
    pub user_id: UserId,
    #[serde(alias = "click_article_id")]
    pub article_id: ArticleId,
}

impl ClickEvent {
    pub fn new(user_id: UserId, article_id: ArticleId) -> Self {
        Self {
            user_id,
            article_id,
        }
    }
}
