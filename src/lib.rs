pub mod calc;
pub mod calendar;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;
pub mod platform;

use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, ValueEnum, Debug, Default, Serialize)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
