use anyhow::{Error, Result};
use clap::Args;

use crate::config::RuntimePaths;
use crate::models::ReportKind;
use crate::render;
use crate::reports::{self, ReportFailure};
use crate::store::LogStore;

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Emit each report as one JSON document instead of text lines.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Continue with the remaining reports when one fails; the run still
    /// exits non-zero.
    #[arg(long, default_value_t = false)]
    pub keep_going: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    /// Emit the report as one JSON document instead of text lines.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// All three reports against one store handle, acquired here and released
/// when the run finishes, whichever report finishes last or fails first.
pub fn run_all(args: &RunArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    let store = LogStore::open(&runtime_paths.database)?;

    let mut first_failure: Option<Error> = None;
    let mut failed_reports = 0usize;
    for kind in ReportKind::ALL {
        match execute(kind, &store, args.json) {
            Ok(()) => {}
            Err(error) if args.keep_going => {
                eprintln!("newsreport: {error:#}");
                failed_reports += 1;
                if first_failure.is_none() {
                    first_failure = Some(error);
                }
            }
            Err(error) => return Err(error),
        }
    }

    match first_failure {
        Some(error) => Err(error.context(format!(
            "{failed_reports} of {} reports failed",
            ReportKind::ALL.len()
        ))),
        None => Ok(()),
    }
}

pub fn run_single(kind: ReportKind, args: &ReportArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    let store = LogStore::open(&runtime_paths.database)?;
    execute(kind, &store, args.json)
}

fn execute(kind: ReportKind, store: &LogStore, json: bool) -> Result<()> {
    print_report(kind, store, json).map_err(|error| error.context(ReportFailure::new(kind)))
}

fn print_report(kind: ReportKind, store: &LogStore, json: bool) -> Result<()> {
    let output = match kind {
        ReportKind::TopArticles => {
            let rows = reports::top_articles(store)?;
            if json {
                render::report_json(kind, &rows)?
            } else {
                render::render_top_articles(&rows).join("\n")
            }
        }
        ReportKind::PopularAuthors => {
            let rows = reports::popular_authors(store)?;
            if json {
                render::report_json(kind, &rows)?
            } else {
                render::render_popular_authors(&rows).join("\n")
            }
        }
        ReportKind::ErrorDays => {
            let rows = reports::high_error_days(store)?;
            if json {
                render::report_json(kind, &rows)?
            } else {
                render::render_error_days(&rows).join("\n")
            }
        }
    };

    println!("{output}");
    Ok(())
}
