use crate::{
    error::{AppError, AppResult},
    models::{Article, ArticleId, ClusterId, SizeCategory, User, UserId},
};

/// Word-count bounds separating small, medium and long articles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeThresholds {
    pub small: f64,
    pub medium: f64,
}

impl SizeThresholds {
    /// Mean minus / plus one population standard deviation of `word_counts`
    pub fn from_word_counts(word_counts: &[i64]) -> Self {
        if word_counts.is_empty() {
            return Self {
                small: 0.0,
                medium: 0.0,
            };
        }

        let n = word_counts.len() as f64;
        let mean = word_counts.iter().map(|w| *w as f64).sum::<f64>() / n;
        let variance = word_counts
            .iter()
            .map(|w| (*w as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        Self {
            small: mean - std_dev,
            medium: mean + std_dev,
        }
    }

    pub fn categorize(&self, words_count: i64) -> SizeCategory {
        let words = words_count as f64;
        if words <= self.small {
            SizeCategory::Small
        } else if words <= self.medium {
            SizeCategory::Medium
        } else {
            SizeCategory::Long
        }
    }
}

/// Registers a new user with id `max + 1`
pub fn add_user(users: &mut Vec<User>) -> AppResult<UserId> {
    let last = users
        .iter()
        .map(|u| u.user_id)
        .max()
        .ok_or(AppError::EmptyRegistry)?;

    let user_id = next_id(last, "user")?;
    users.push(User { user_id });
    Ok(user_id)
}

fn next_id(last: i64, kind: &str) -> AppResult<i64> {
    last.checked_add(1)
        .ok_or_else(|| AppError::Internal(format!("{} id space exhausted after {}", kind, last)))
}

/// Appends an article with id `max + 1`, deriving its size category
///
/// Thresholds are computed over the catalog including the new article.
/// An empty catalog starts at id 0.
pub fn add_article(
    articles: &mut Vec<Article>,
    words_count: i64,
    cluster_id: ClusterId,
) -> AppResult<(ArticleId, SizeCategory)> {
    if words_count < 0 {
        return Err(AppError::InvalidParameter(format!(
            "words_count must be a non-negative integer, got {}",
            words_count
        )));
    }
    if cluster_id < 0 {
        return Err(AppError::InvalidParameter(format!(
            "cluster_choice must be a non-negative integer, got {}",
            cluster_id
        )));
    }

    let article_id = match articles.iter().map(|a| a.article_id).max() {
        Some(last) => next_id(last, "article")?,
        None => 0,
    };

    let word_counts: Vec<i64> = articles
        .iter()
        .map(|a| a.words_count)
        .chain(std::iter::once(words_count))
        .collect();
    let thresholds = SizeThresholds::from_word_counts(&word_counts);
    let size_category = thresholds.categorize(words_count);

    tracing::debug!(
        article_id,
        words_count,
        small_threshold = thresholds.small,
        medium_threshold = thresholds.medium,
        size = %size_category,
        "Categorized new article"
    );

    articles.push(Article {
        article_id,
        words_count,
        cluster_id,
        size_category,
    });

    Ok((article_id, size_category))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(article_id: i64, words_count: i64) -> Article {
        Article {
            article_id,
            words_count,
            cluster_id: 1,
            size_category: SizeCategory::Medium,
        }
    }

    #[test]
    fn test_add_user_increments_max() {
        let mut users = vec![User { user_id: 7 }, User { user_id: 42 }, User { user_id: 3 }];
        let id = add_user(&mut users).unwrap();

        assert_eq!(id, 43);
        assert_eq!(users.iter().filter(|u| u.user_id == 43).count(), 1);
        assert_eq!(users.len(), 4);
    }

    #[test]
    fn test_add_user_empty_registry_fails() {
        let mut users = Vec::new();
        assert!(matches!(add_user(&mut users), Err(AppError::EmptyRegistry)));
        assert!(users.is_empty());
    }

    #[test]
    fn test_thresholds_population_std() {
        let thresholds = SizeThresholds::from_word_counts(&[200, 400]);
        assert_eq!(thresholds.small, 200.0);
        assert_eq!(thresholds.medium, 400.0);
    }

    #[test]
    fn test_add_article_includes_new_row_in_thresholds() {
        // pre-insert mean 300, std 100
        let mut articles = vec![article(0, 200), article(1, 400)];

        let (id, size) = add_article(&mut articles, 500, 2).unwrap();

        // with 500 included: mean ~366.7, std ~124.7, medium bound ~491.4
        assert_eq!(id, 2);
        assert_eq!(size, SizeCategory::Long);
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[2].cluster_id, 2);
        assert_eq!(articles[2].size_category, SizeCategory::Long);
    }

    #[test]
    fn test_add_article_inclusion_changes_outcome() {
        // pre-insert bounds [300, 500] would make 510 long; with it
        // included the upper bound moves to ~533.4
        let mut articles = vec![article(0, 300), article(1, 500)];
        let (_, size) = add_article(&mut articles, 510, 1).unwrap();
        assert_eq!(size, SizeCategory::Medium);

        let (_, size) = add_article(&mut articles, 100, 1).unwrap();
        assert_eq!(size, SizeCategory::Small);
    }

    #[test]
    fn test_add_article_to_empty_catalog() {
        let mut articles = Vec::new();
        let (id, size) = add_article(&mut articles, 250, 4).unwrap();
        assert_eq!(id, 0);
        // single row: mean equals the count and std is zero
        assert_eq!(size, SizeCategory::Small);
    }

    #[test]
    fn test_add_article_rejects_negative_values() {
        let mut articles = vec![article(0, 200)];
        assert!(matches!(
            add_article(&mut articles, -1, 1),
            Err(AppError::InvalidParameter(_))
        ));
        assert!(matches!(
            add_article(&mut articles, 10, -3),
            Err(AppError::InvalidParameter(_))
        ));
        assert_eq!(articles.len(), 1);
    }

    #[test]
    fn test_add_user_at_max_id_fails_without_appending() {
        let mut users = vec![User { user_id: i64::MAX }];
        assert!(matches!(add_user(&mut users), Err(AppError::Internal(_))));
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_add_article_at_max_id_fails_without_appending() {
        let mut articles = vec![article(i64::MAX, 200)];
        assert!(matches!(
            add_article(&mut articles, 100, 1),
            Err(AppError::Internal(msg)) if msg.contains("article")
        ));
        assert_eq!(articles.len(), 1);
    }

    #[test]
    fn test_add_article_uses_max_id() {
        let mut articles = vec![article(10, 200), article(4, 300)];
        let (id, _) = add_article(&mut articles, 250, 1).unwrap();
        assert_eq!(id, 11);
    }
}
