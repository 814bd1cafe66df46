use anyhow::Result;

use crate::models::ArticleViews;
use crate::store::LogStore;

use super::article_view_totals;

pub const TOP_ARTICLE_LIMIT: usize = 3;

/// The three most-viewed articles of all time, most viewed first; ties
/// break on title so repeated runs order identically. Articles without a
/// single matching request never appear, so a store with fewer than three
/// viewed articles yields a shorter sequence.
pub fn top_articles(store: &LogStore) -> Result<Vec<ArticleViews>> {
    let mut ranked: Vec<ArticleViews> = article_view_totals(store)?
        .into_iter()
        .filter(|(_, views)| *views > 0)
        .map(|(article, views)| ArticleViews {
            title: article.title,
            views,
        })
        .collect();

    ranked.sort_by(|left, right| {
        right
            .views
            .cmp(&left.views)
            .then_with(|| left.title.cmp(&right.title))
    });
    ranked.truncate(TOP_ARTICLE_LIMIT);
    Ok(ranked)
}
