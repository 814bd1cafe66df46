use std::fmt::{Display, Formatter};

use anyhow::Result;

use crate::models::{Article, ReportKind};
use crate::store::LogStore;

pub mod error_days;
pub mod popular_authors;
pub mod top_articles;
pub mod uri_index;

pub use error_days::high_error_days;
pub use popular_authors::popular_authors;
pub use top_articles::top_articles;
pub use uri_index::ArticleUriIndex;

/// Attached to a failed report's error chain so callers can tell which of
/// the three reports failed and distinguish a failure from a legitimately
/// empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportFailure {
    kind: ReportKind,
}

impl ReportFailure {
    #[must_use]
    pub const fn new(kind: ReportKind) -> Self {
        Self { kind }
    }

    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        self.kind
    }
}

impl Display for ReportFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} report failed", self.kind.as_str())
    }
}

impl std::error::Error for ReportFailure {}

/// Matched view total per article, shared by the article and author
/// rankings. Unmatched log paths attribute no views; unmatched articles
/// keep a zero total.
pub(crate) fn article_view_totals(store: &LogStore) -> Result<Vec<(Article, u64)>> {
    let articles = store.articles()?;
    let index = ArticleUriIndex::build(&articles)?;

    let mut totals = vec![0u64; articles.len()];
    for hit in store.path_hits()? {
        if let Some(position) = index.resolve(&hit.path) {
            totals[position] += hit.hits;
        }
    }

    Ok(articles.into_iter().zip(totals).collect())
}
