#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use clap::error::ErrorKind;
use newsreport::cli::app::{Cli, Command, RuntimeArgs};
use newsreport::cli::commands;
use newsreport::config::RuntimePaths;
use newsreport::models::ReportKind;
use newsreport::reports::ReportFailure;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_REPORT_FAILURE: i32 = 2;
const EXIT_USAGE_ERROR: i32 = 64;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_code_for_parse_error(error),
    };
    let command_name = command_name(&cli.command);
    println!("newsreport: starting `{command_name}`");

    match execute(cli) {
        Ok(()) => {
            println!("newsreport: completed `{command_name}` (exit_code={EXIT_SUCCESS})");
            EXIT_SUCCESS
        }
        Err(error) => {
            let exit_code = classify_runtime_error(&error);
            eprintln!("newsreport: failed `{command_name}` (exit_code={exit_code})");
            eprintln!("{error:#}");
            exit_code
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
    match cli.command {
        Command::Run(args) => commands::report::run_all(&args, &runtime_paths),
        Command::TopArticles(args) => {
            commands::report::run_single(ReportKind::TopArticles, &args, &runtime_paths)
        }
        Command::PopularAuthors(args) => {
            commands::report::run_single(ReportKind::PopularAuthors, &args, &runtime_paths)
        }
        Command::ErrorDays(args) => {
            commands::report::run_single(ReportKind::ErrorDays, &args, &runtime_paths)
        }
    }
}

fn classify_runtime_error(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<ReportFailure>().is_some() {
        EXIT_REPORT_FAILURE
    } else {
        EXIT_RUNTIME_FAILURE
    }
}

fn exit_code_for_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            EXIT_SUCCESS
        }
        _ => {
            let _ = error.print();
            EXIT_USAGE_ERROR
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Run(_) => "run",
        Command::TopArticles(_) => ReportKind::TopArticles.as_str(),
        Command::PopularAuthors(_) => ReportKind::PopularAuthors.as_str(),
        Command::ErrorDays(_) => ReportKind::ErrorDays.as_str(),
    }
}

fn resolve_runtime_paths(args: &RuntimeArgs) -> Result<RuntimePaths> {
    let home_dir = match &args.home_dir {
        Some(path) => path.clone(),
        None => std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("HOME is not set; pass --home-dir"))?,
    };

    let cwd = match &args.cwd {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    newsreport::config::resolve_runtime_paths(&home_dir, &cwd, args.database.as_deref())
}
