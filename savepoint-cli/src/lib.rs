//! # Savepoint CLI
//!
//! Command-line host for savepoint files.
//!
//! ## Usage
//!
//! ```bash
//! # Upgrade an old savepoint in place
//! savepoint migrate lobby.json
//!
//! # Load a savepoint into a fresh workspace and summarize it
//! savepoint inspect lobby.json
//!
//! # Export through the conversion backend
//! savepoint --backend-url https://convert.example --license-key KEY export lobby.json
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `ExportConfig` - Backend, license key and output directory for exports
//! - `commands` - One function per subcommand

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line arguments for savepoint.
#[derive(Debug, Clone, Parser)]
#[command(name = "savepoint")]
#[command(about = "Migrate, inspect and export layout editor savepoints")]
#[command(version)]
pub struct CliArgs {
    /// Conversion backend base URL (e.g., <https://convert.example>)
    #[arg(long, global = true, env = "SAVEPOINT_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// License key sent to the conversion backend
    #[arg(long, global = true, env = "SAVEPOINT_LICENSE_KEY", hide_env_values = true)]
    pub license_key: Option<String>,

    /// Directory export artifacts are written to
    #[arg(long, global = true, default_value = ".")]
    pub out_dir: PathBuf,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Upgrade a savepoint to the current format version
    Migrate {
        /// Savepoint to read
        input: PathBuf,
        /// Where to write the upgraded savepoint (defaults to the input)
        output: Option<PathBuf>,
    },
    /// Load a savepoint and print a summary
    Inspect {
        /// Savepoint to read
        file: PathBuf,
    },
    /// Load a savepoint and export it through the conversion backend
    Export {
        /// Savepoint to read
        file: PathBuf,
    },
}

/// Export configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Conversion backend base URL.
    pub backend_url: Option<String>,
    /// License key for the backend.
    pub license_key: Option<String>,
    /// Directory artifacts are written to.
    pub out_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportConfig {
    /// Create a configuration with no backend, writing to the current directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend_url: None,
            license_key: None,
            out_dir: PathBuf::from("."),
        }
    }
}

impl From<CliArgs> for ExportConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            backend_url: args.backend_url,
            license_key: args.license_key,
            out_dir: args.out_dir,
        }
    }
}
