//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for nbexport using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// nbexport - tagged notebook variant exporter
#[derive(Parser, Debug)]
#[command(name = "nbexport")]
#[command(version, about, long_about = None)]
#[command(author = "nbexport Contributors")]
pub struct Cli {
    /// Path to configuration file (built-in defaults are used if it does not exist)
    #[arg(short, long, default_value = "nbexport.toml", env = "NBEXPORT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "NBEXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the tagged notebooks of a lab into one notebook per variant
    Export(commands::export::ExportArgs),

    /// Validate configuration file and show the variant matrix
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
