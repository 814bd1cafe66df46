use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands::report::{ReportArgs, RunArgs};

#[derive(Debug, Parser)]
#[command(
    name = "newsreport",
    version,
    about = "Fixed analytical reports over a news-site access log"
)]
pub struct Cli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct RuntimeArgs {
    /// Log store database file (defaults to ~/.newsreport/news.db).
    #[arg(long, global = true, value_name = "PATH")]
    pub database: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub home_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub cwd: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run all three reports in order.
    Run(RunArgs),
    /// The three most-viewed articles of all time.
    TopArticles(ReportArgs),
    /// All authors ranked by total article views.
    PopularAuthors(ReportArgs),
    /// Days on which more than 1% of requests led to errors.
    ErrorDays(ReportArgs),
}
