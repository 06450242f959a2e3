use std::collections::{HashMap, HashSet};

use crate::models::{
    Article, ArticleId, ClusterId, Dataset, Recommendation, SizeCategory, Strategy, UserId,
};

use super::content::ContentMatcher;
use super::popularity;

/// A click of the user joined with the clicked article's metadata
///
/// Clicks on articles missing from the catalog have no cluster or size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    pub article_id: ArticleId,
    pub cluster_id: Option<ClusterId>,
    pub size_category: Option<SizeCategory>,
}

/// Hybrid popularity / content recommender over one dataset snapshot
///
/// All indices are built once at construction; `recommend` is a pure read.
pub struct Recommender<'a> {
    top_n: usize,
    top_clicked: Vec<ArticleId>,
    articles: HashMap<ArticleId, &'a Article>,
    clicks_by_user: HashMap<UserId, Vec<ArticleId>>,
    matcher: ContentMatcher<'a>,
}

impl<'a> Recommender<'a> {
    pub fn new(dataset: &'a Dataset, top_n: usize) -> Self {
        let tables = &dataset.tables;

        let mut articles = HashMap::with_capacity(tables.articles.len());
        for article in &tables.articles {
            articles.entry(article.article_id).or_insert(article);
        }

        let mut clicks_by_user: HashMap<UserId, Vec<ArticleId>> = HashMap::new();
        for click in &tables.clicks {
            clicks_by_user
                .entry(click.user_id)
                .or_default()
                .push(click.article_id);
        }

        Self {
            top_n,
            top_clicked: popularity::top_clicked(&tables.clicks, top_n),
            articles,
            clicks_by_user,
            matcher: ContentMatcher::new(&tables.articles, top_n),
        }
    }

    /// The most clicked articles across all users
    pub fn top_clicked(&self) -> &[ArticleId] {
        &self.top_clicked
    }

    /// All clicks of `user_id`, left-joined with article metadata
    pub fn user_interactions(&self, user_id: UserId) -> Vec<Interaction> {
        self.clicks_by_user
            .get(&user_id)
            .map(|clicked| {
                clicked
                    .iter()
                    .map(|article_id| {
                        let article = self.articles.get(article_id);
                        Interaction {
                            article_id: *article_id,
                            cluster_id: article.map(|a| a.cluster_id),
                            size_category: article.map(|a| a.size_category),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Selects a strategy from the user's history and ranks up to `top_n` articles
    pub fn recommend(&self, user_id: UserId) -> Recommendation {
        let interactions = self.user_interactions(user_id);

        let (strategy, article_ids) = match interactions.as_slice() {
            [] => (Strategy::Popular, self.top_clicked.clone()),
            [only] if self.top_clicked.contains(&only.article_id) => (
                Strategy::PopularExcludingRead,
                self.top_clicked
                    .iter()
                    .copied()
                    .filter(|id| *id != only.article_id)
                    .collect(),
            ),
            [only] => (Strategy::SingleClickContent, self.similar_to(only)),
            _ => {
                let clusters = clusters_by_engagement(&interactions);
                let strategy = if clusters.len() == 1 {
                    Strategy::SingleCluster
                } else {
                    Strategy::MultiCluster
                };
                (strategy, self.from_clusters(&interactions, &clusters))
            }
        };

        tracing::debug!(
            user_id,
            interactions = interactions.len(),
            strategy = u8::from(strategy),
            count = article_ids.len(),
            "Recommendation computed"
        );

        Recommendation {
            article_ids,
            strategy,
        }
    }

    /// Same cluster as the single clicked article, preferring its size
    fn similar_to(&self, interaction: &Interaction) -> Vec<ArticleId> {
        let Some(cluster_id) = interaction.cluster_id else {
            return Vec::new();
        };

        let exclude: HashSet<ArticleId> = [interaction.article_id].into_iter().collect();
        self.matcher
            .match_articles(cluster_id, &exclude, interaction.size_category)
    }

    /// Walks clusters in order, appending matches until `top_n` is reached
    fn from_clusters(&self, interactions: &[Interaction], clusters: &[ClusterId]) -> Vec<ArticleId> {
        let exclude: HashSet<ArticleId> = interactions.iter().map(|i| i.article_id).collect();

        let mut recommendations = Vec::new();
        for cluster_id in clusters {
            let preferred_size = size_preference(interactions, *cluster_id);
            recommendations.extend(self.matcher.match_articles(
                *cluster_id,
                &exclude,
                preferred_size,
            ));
            if recommendations.len() >= self.top_n {
                break;
            }
        }

        recommendations.truncate(self.top_n);
        recommendations
    }
}

/// Distinct known clusters ordered by descending interaction count
///
/// Equal counts keep the order in which the clusters were first clicked.
fn clusters_by_engagement(interactions: &[Interaction]) -> Vec<ClusterId> {
    let mut counts: HashMap<ClusterId, usize> = HashMap::new();
    let mut clusters: Vec<ClusterId> = Vec::new();

    for cluster_id in interactions.iter().filter_map(|i| i.cluster_id) {
        let count = counts.entry(cluster_id).or_insert(0);
        if *count == 0 {
            clusters.push(cluster_id);
        }
        *count += 1;
    }

    clusters.sort_by(|a, b| counts[b].cmp(&counts[a]));
    clusters
}

/// Most frequent size among the interactions in `cluster_id`
///
/// Ties resolve to the alphabetically first size name (long, medium, small).
fn size_preference(interactions: &[Interaction], cluster_id: ClusterId) -> Option<SizeCategory> {
    let mut counts: HashMap<SizeCategory, usize> = HashMap::new();
    for size in interactions
        .iter()
        .filter(|i| i.cluster_id == Some(cluster_id))
        .filter_map(|i| i.size_category)
    {
        *counts.entry(size).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|(size_a, count_a), (size_b, count_b)| {
            count_a
                .cmp(count_b)
                .then_with(|| size_b.as_str().cmp(size_a.as_str()))
        })
        .map(|(size, _)| size)
}
