use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Article, ClickEvent, User, UserId};

/// The three tables the recommender works from
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tables {
    #[serde(default)]
    pub clicks: Vec<ClickEvent>,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// An immutable snapshot of the tables as loaded from the data store
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    #[serde(flatten)]
    pub tables: Tables,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(tables: Tables) -> Self {
        Self {
            tables,
            loaded_at: Utc::now(),
        }
    }

    /// A user is known if they are registered or appear in the click log
    pub fn is_known_user(&self, user_id: UserId) -> bool {
        self.tables.users.iter().any(|u| u.user_id == user_id)
            || self.tables.clicks.iter().any(|c| c.user_id == user_id)
    }

    /// Highest registered user id, if any
    pub fn last_user_id(&self) -> Option<UserId> {
        self.tables.users.iter().map(|u| u.user_id).max()
    }
}
