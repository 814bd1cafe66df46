use serde::{Deserialize, Serialize};
use time::Date;

/// One content author as recorded by the news database service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

/// One article; `slug` is unique and appears in request paths as
/// `/article/<slug>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub slug: String,
    pub title: String,
    pub author_id: i64,
}

/// Aggregated request count for one distinct log path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathHits {
    pub path: String,
    pub hits: u64,
}

/// Aggregated request count for one (UTC calendar day, status line) pair.
/// `unix_day` counts whole days since 1970-01-01.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayStatusCount {
    pub unix_day: i64,
    pub status: String,
    pub count: u64,
}

/// One row of the top-articles report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleViews {
    pub title: String,
    pub views: u64,
}

/// One row of the popular-authors report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorViews {
    pub name: String,
    pub views: u64,
}

/// One row of the high-error-rate-days report. `error_fraction` is the
/// unrounded ratio in [0, 1] that the threshold was compared against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDay {
    pub date: Date,
    pub total_requests: u64,
    pub error_requests: u64,
    pub error_fraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    TopArticles,
    PopularAuthors,
    ErrorDays,
}

impl ReportKind {
    /// The three reports in presentation order.
    pub const ALL: [Self; 3] = [Self::TopArticles, Self::PopularAuthors, Self::ErrorDays];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopArticles => "top-articles",
            Self::PopularAuthors => "popular-authors",
            Self::ErrorDays => "error-days",
        }
    }
}
