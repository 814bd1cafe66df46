#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod models;
pub mod render;
pub mod reports;
pub mod store;
pub mod utils;

pub use cli::app::{Cli, Command};
