//! Subcommand implementations.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use savepoint_core::migrate::{self, Migration};
use savepoint_core::{FormatVersion, LoadReport, Workspace, CURRENT_VERSION};
use savepoint_export::{ConvertClient, DirectorySink, ExportOutcome, Exporter};
use serde_json::Value;

use crate::ExportConfig;

async fn read_document(path: &Path) -> anyhow::Result<Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

async fn load_workspace(path: &Path) -> anyhow::Result<(Workspace, LoadReport)> {
    let document = read_document(path).await?;
    let mut workspace = Workspace::default();
    let report = workspace
        .load_project_from_json(document, false)
        .await
        .with_context(|| format!("failed to load {}", path.display()))?;
    Ok((workspace, report))
}

/// Upgrade a savepoint file to the current format version.
///
/// Writes to `output`, or back to `input` when no output is given. A file that
/// is already current is left alone and `None` is returned.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, migrated or written.
pub async fn migrate_file(input: &Path, output: Option<&Path>) -> anyhow::Result<Option<Migration>> {
    let document = read_document(input).await?;
    let version = migrate::document_version(&document)?;
    if version == CURRENT_VERSION {
        tracing::info!("{} is already on format version {version}", input.display());
        return Ok(None);
    }

    let migration = migrate::migrate(document)?;
    let target = output.unwrap_or(input);
    let text = serde_json::to_string_pretty(&migration.document)?;
    tokio::fs::write(target, text)
        .await
        .with_context(|| format!("failed to write {}", target.display()))?;
    tracing::info!(
        "Migrated {} from format version {} to {}",
        target.display(),
        migration.from,
        migration.to
    );
    Ok(Some(migration))
}

/// What `inspect` found in a savepoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Project name.
    pub name: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Version the file was migrated from, if it was.
    pub migrated_from: Option<FormatVersion>,
    /// Root components.
    pub roots: usize,
    /// All components, descendants included.
    pub components: usize,
    /// Hidden component ids.
    pub invisible: usize,
    /// Registered fonts.
    pub fonts: usize,
    /// Registered images and gifs.
    pub images: usize,
    /// Resources that failed to decode.
    pub resource_failures: Vec<String>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}x{})", self.name, self.width, self.height)?;
        if let Some(from) = self.migrated_from {
            writeln!(f, "  migrated from format version {from}")?;
        }
        writeln!(
            f,
            "  components: {} ({} at root), {} invisible",
            self.components, self.roots, self.invisible
        )?;
        write!(f, "  fonts: {}, images: {}", self.fonts, self.images)?;
        for failure in &self.resource_failures {
            write!(f, "\n  failed: {failure}")?;
        }
        Ok(())
    }
}

/// Load a savepoint into a fresh workspace and summarize it.
///
/// # Errors
///
/// Returns an error if the file cannot be read or loaded.
pub async fn inspect_file(path: &Path) -> anyhow::Result<Summary> {
    let (workspace, report) = load_workspace(path).await?;
    Ok(Summary {
        name: workspace.settings.project_name.clone(),
        width: workspace.settings.width,
        height: workspace.settings.height,
        migrated_from: report.migrated_from,
        roots: workspace.tree.len(),
        components: workspace.tree.registered_count(),
        invisible: workspace.invisible.len(),
        fonts: workspace.fonts.len(),
        images: workspace.images.len(),
        resource_failures: report
            .resource_failures
            .iter()
            .map(ToString::to_string)
            .collect(),
    })
}

/// Load a savepoint and export it into the configured output directory.
///
/// Returns the path of the written artifact.
///
/// # Errors
///
/// Returns an error if the backend or license key is not configured, the file
/// cannot be loaded, or the export fails.
pub async fn export_file(path: &Path, config: &ExportConfig) -> anyhow::Result<PathBuf> {
    let Some(backend_url) = config.backend_url.as_deref() else {
        bail!("no conversion backend configured (--backend-url or SAVEPOINT_BACKEND_URL)");
    };
    let Some(license_key) = config.license_key.as_deref() else {
        bail!("no license key configured (--license-key or SAVEPOINT_LICENSE_KEY)");
    };

    let (workspace, _) = load_workspace(path).await?;
    let exporter = Exporter::new(
        ConvertClient::new(backend_url)?,
        Arc::new(DirectorySink::new(&config.out_dir)),
    );

    match exporter
        .download_current_project_file(&workspace, license_key)
        .await
    {
        ExportOutcome::Delivered { file_name } => Ok(config.out_dir.join(file_name)),
        ExportOutcome::Failed { message, .. } => bail!(message),
    }
}
