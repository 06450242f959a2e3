use std::collections::{HashMap, HashSet};

use crate::models::{Article, ArticleId, ClusterId, SizeCategory};

/// Content-based candidate selection over the article catalog
///
/// Articles are indexed by cluster once, keeping catalog order inside each
/// cluster. That order is the only ranking signal.
pub struct ContentMatcher<'a> {
    by_cluster: HashMap<ClusterId, Vec<&'a Article>>,
    top_n: usize,
}

impl<'a> ContentMatcher<'a> {
    pub fn new(articles: &'a [Article], top_n: usize) -> Self {
        let mut by_cluster: HashMap<ClusterId, Vec<&'a Article>> = HashMap::new();
        for article in articles {
            by_cluster.entry(article.cluster_id).or_default().push(article);
        }

        Self { by_cluster, top_n }
    }

    /// Returns up to `top_n` articles of `cluster_id` that are not excluded
    ///
    /// With a preferred size, matching articles come first. When fewer than
    /// `top_n` of them exist, the size-matched list is followed by the full
    /// cluster list before truncation, so an article may appear twice.
    pub fn match_articles(
        &self,
        cluster_id: ClusterId,
        exclude: &HashSet<ArticleId>,
        preferred_size: Option<SizeCategory>,
    ) -> Vec<ArticleId> {
        let candidates: Vec<&Article> = self
            .by_cluster
            .get(&cluster_id)
            .map(|articles| {
                articles
                    .iter()
                    .copied()
                    .filter(|a| !exclude.contains(&a.article_id))
                    .collect()
            })
            .unwrap_or_default();

        let Some(size) = preferred_size else {
            return Self::first_ids(candidates.into_iter(), self.top_n);
        };

        let sized: Vec<&Article> = candidates
            .iter()
            .copied()
            .filter(|a| a.size_category == size)
            .collect();

        if sized.len() < self.top_n {
            Self::first_ids(sized.into_iter().chain(candidates), self.top_n)
        } else {
            Self::first_ids(sized.into_iter(), self.top_n)
        }
    }

    fn first_ids<'b>(articles: impl Iterator<Item = &'b Article>, n: usize) -> Vec<ArticleId> {
        articles.take(n).map(|a| a.article_id).collect()
    }
}
