use std::collections::BTreeMap;

use anyhow::{Result, bail};

use crate::models::Article;

pub const ARTICLE_URI_PREFIX: &str = "/article/";

/// The derived URI an article is served under.
#[must_use]
pub fn article_uri(slug: &str) -> String {
    format!("{ARTICLE_URI_PREFIX}{slug}")
}

/// The derived join between log paths and articles, built once per report
/// run as an explicit lookup instead of string matching inside query text.
///
/// Matching is whole-path equality: `/article/<slug>` refers to the
/// article; `/article/<slug>/comments`, or a path for a longer slug that
/// merely contains this one, does not.
#[derive(Debug, Default)]
pub struct ArticleUriIndex {
    by_uri: BTreeMap<String, usize>,
}

impl ArticleUriIndex {
    /// Indexes articles by derived URI, keyed back to their position in the
    /// input slice. A duplicate slug violates the store's uniqueness
    /// invariant and is rejected.
    pub fn build(articles: &[Article]) -> Result<Self> {
        let mut by_uri = BTreeMap::new();
        for (position, article) in articles.iter().enumerate() {
            if by_uri.insert(article_uri(&article.slug), position).is_some() {
                bail!("duplicate article slug `{}` in log store", article.slug);
            }
        }
        Ok(Self { by_uri })
    }

    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<usize> {
        self.by_uri.get(path).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{ArticleUriIndex, article_uri};
    use crate::models::Article;

    fn article(slug: &str) -> Article {
        Article {
            slug: slug.to_string(),
            title: format!("Title {slug}"),
            author_id: 1,
        }
    }

    #[test]
    fn resolves_exact_article_paths() {
        let articles = vec![article("candidate-is-jerk"), article("bears-love-berries")];
        let index = ArticleUriIndex::build(&articles).expect("index should build");

        assert_eq!(index.resolve("/article/candidate-is-jerk"), Some(0));
        assert_eq!(index.resolve("/article/bears-love-berries"), Some(1));
        assert_eq!(index.resolve("/about"), None);
    }

    #[test]
    fn slug_prefix_of_a_longer_slug_never_matches_the_longer_path() {
        // Regression for the substring-matching defect: with slugs `a` and
        // `ab`, requests for `/article/ab` must count only toward `ab`.
        let articles = vec![article("a"), article("ab")];
        let index = ArticleUriIndex::build(&articles).expect("index should build");

        assert_eq!(index.resolve("/article/ab"), Some(1));
        assert_eq!(index.resolve("/article/a"), Some(0));
    }

    #[test]
    fn embedded_article_uri_does_not_match() {
        let articles = vec![article("a1")];
        let index = ArticleUriIndex::build(&articles).expect("index should build");

        assert_eq!(index.resolve("/article/a1/comments"), None);
        assert_eq!(index.resolve("/archive/article/a1"), None);
        assert_eq!(index.resolve("/article/a1?ref=feed"), None);
    }

    #[test]
    fn rejects_duplicate_slugs() {
        let articles = vec![article("dup"), article("dup")];
        let error = ArticleUriIndex::build(&articles).expect_err("duplicate slug must fail");
        assert!(
            error.to_string().contains("duplicate article slug"),
            "unexpected error: {error}"
        );
    }

    #[test]
    fn derived_uri_uses_the_article_prefix() {
        assert_eq!(article_uri("so-water-used-to-be-free"), "/article/so-water-used-to-be-free");
    }
}
