use std::collections::HashMap;

use crate::models::{ArticleId, ClickEvent};

/// Returns the `n` most clicked article ids, most clicked first
///
/// Articles with equal click counts keep the order in which they first
/// appear in the log, so the ranking is stable for a fixed log.
pub fn top_clicked(clicks: &[ClickEvent], n: usize) -> Vec<ArticleId> {
    let mut counts: HashMap<ArticleId, usize> = HashMap::new();
    let mut first_seen: Vec<ArticleId> = Vec::new();

    for click in clicks {
        let count = counts.entry(click.article_id).or_insert(0);
        if *count == 0 {
            first_seen.push(click.article_id);
        }
        *count += 1;
    }

    // sort_by is stable: ties stay in first-seen order
    first_seen.sort_by(|a, b| counts[b].cmp(&counts[a]));
    first_seen.truncate(n);
    first_seen
}
