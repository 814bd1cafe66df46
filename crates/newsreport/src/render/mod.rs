use anyhow::{Context, Result};
use num_format::{Locale, ToFormattedString};
use serde::Serialize;
use serde_json::json;

use crate::models::{ArticleViews, AuthorViews, ErrorDay, ReportKind};
use crate::utils::time::format_long_date;

const BANNER: &str = "----------------------------------------------------------";

#[must_use]
pub const fn section_heading(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::TopArticles => "I. TOP THREE ARTICLES OF ALL TIME",
        ReportKind::PopularAuthors => "II. POPULAR AUTHORS OF ALL TIME",
        ReportKind::ErrorDays => "III. DAYS IN WHICH MORE THAN 1% OF REQUESTS LEAD TO ERRORS",
    }
}

fn section(kind: ReportKind) -> Vec<String> {
    vec![
        BANNER.to_string(),
        format!("        {}", section_heading(kind)),
        BANNER.to_string(),
    ]
}

/// Thousands-grouped view count, e.g. `1,234,567`.
#[must_use]
pub fn format_views(views: u64) -> String {
    views.to_formatted_string(&Locale::en)
}

/// Display-time rounding only; the threshold comparison upstream uses the
/// unrounded fraction.
#[must_use]
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

#[must_use]
pub fn render_top_articles(rows: &[ArticleViews]) -> Vec<String> {
    let mut lines = section(ReportKind::TopArticles);
    for (position, row) in rows.iter().enumerate() {
        lines.push(format!(
            "  {}. \"{}\" — {} views.",
            position + 1,
            row.title,
            format_views(row.views)
        ));
    }
    lines
}

#[must_use]
pub fn render_popular_authors(rows: &[AuthorViews]) -> Vec<String> {
    let mut lines = section(ReportKind::PopularAuthors);
    for (position, row) in rows.iter().enumerate() {
        lines.push(format!(
            "  {}. {} — {} views.",
            position + 1,
            row.name,
            format_views(row.views)
        ));
    }
    lines
}

#[must_use]
pub fn render_error_days(rows: &[ErrorDay]) -> Vec<String> {
    let mut lines = section(ReportKind::ErrorDays);
    for row in rows {
        lines.push(format!(
            "   {} — {} errors",
            format_long_date(row.date),
            format_percent(row.error_fraction)
        ));
    }
    lines
}

/// One JSON document per report for `--json` mode.
pub fn report_json<T: Serialize>(kind: ReportKind, rows: &[T]) -> Result<String> {
    let rows = serde_json::to_value(rows)
        .with_context(|| format!("failed to encode {} report rows", kind.as_str()))?;
    let document = json!({ "report": kind.as_str(), "rows": rows });
    serde_json::to_string(&document)
        .with_context(|| format!("failed to encode {} report document", kind.as_str()))
}
