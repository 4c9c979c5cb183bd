//! # Savepoint Export
//!
//! Turns the live workspace into a downloadable export artifact with the help
//! of a remote conversion service.
//!
//! ## Architecture
//!
//! ```text
//! Workspace ──bundle──▶ Project ─┐
//!     │                          ├─▶ merged artifact ──▶ ArtifactSink
//!     └─strip tree──▶ ConvertClient ──POST /convert──┘
//! ```
//!
//! Failures never propagate out of [`Exporter`]; they become notifications on
//! the workspace's notifier, with a license-key action when the backend
//! complains about the key.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]

pub mod client;
pub mod error;
pub mod pipeline;
pub mod sink;

pub use client::{ConvertClient, ConvertRequest, ConvertResponse, ConvertSavepoint};
pub use error::{ExportError, ExportResult};
pub use pipeline::{mentions_license, ExportOutcome, Exporter};
pub use sink::{ArtifactSink, DirectorySink, MemorySink};
