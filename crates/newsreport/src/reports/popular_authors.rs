use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Result, bail};

use crate::models::{Author, AuthorViews};
use crate::store::LogStore;

use super::article_view_totals;

/// Every author with at least one viewed article, ranked by total views
/// across all of their articles, descending, without truncation.
///
/// Grouping is by author id, never by display name: two authors who happen
/// to share a name stay separate rows. Authors whose articles drew no
/// matching requests are excluded outright.
pub fn popular_authors(store: &LogStore) -> Result<Vec<AuthorViews>> {
    let authors = store.authors()?;
    let known_ids: BTreeSet<i64> = authors.iter().map(|author| author.id).collect();

    let mut totals: BTreeMap<i64, u64> = BTreeMap::new();
    for (article, views) in article_view_totals(store)? {
        if !known_ids.contains(&article.author_id) {
            bail!(
                "article `{}` references unknown author id {}",
                article.slug,
                article.author_id
            );
        }
        if views > 0 {
            *totals.entry(article.author_id).or_default() += views;
        }
    }

    let mut ranked: Vec<(u64, Author)> = authors
        .into_iter()
        .filter_map(|author| totals.remove(&author.id).map(|views| (views, author)))
        .collect();
    ranked.sort_by(|(left_views, left), (right_views, right)| {
        right_views
            .cmp(left_views)
            .then_with(|| left.name.cmp(&right.name))
            .then_with(|| left.id.cmp(&right.id))
    });

    Ok(ranked
        .into_iter()
        .map(|(views, author)| AuthorViews {
            name: author.name,
            views,
        })
        .collect())
}
