use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use super::{ArticleId, ClusterId};

/// Length bucket of an article, derived from its word count relative to the
/// catalog-wide mean plus or minus one standard deviation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SizeCategory {
    Small,
    Medium,
    Long,
}

impl SizeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeCategory::Small => "small",
            SizeCategory::Medium => "medium",
            SizeCategory::Long => "long",
        }
    }
}

impl Display for SizeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(SizeCategory::Small),
            "medium" => Ok(SizeCategory::Medium),
            "long" => Ok(SizeCategory::Long),
            other => Err(format!("unknown article size '{}'", other)),
        }
    }
}

/// A row of the article catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub article_id: ArticleId,
    pub words_count: i64,
    /// Embedding cluster the article belongs to
    #[serde(alias = "id_cluster_embedding")]
    pub cluster_id: ClusterId,
    /// Never set independently; see `services::catalog::SizeThresholds::categorize`
    #[serde(alias = "article_size")]
    pub size_category: SizeCategory,
}
