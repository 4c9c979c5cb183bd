//! Export pipeline: convert the live tree remotely and deliver the merged
//! savepoint.
//!
//! Exports never return an error to the caller. Every failure is turned into a
//! user notification, and the workspace's loading flag is lowered on every
//! path because it is held through a guard.

use std::sync::Arc;

use savepoint_core::{CodecMode, Notification, NotificationAction, Project, Workspace};

use crate::client::{ConvertClient, ConvertRequest};
use crate::error::ExportResult;
use crate::sink::ArtifactSink;

/// How an export ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The artifact was handed to the sink.
    Delivered {
        /// File name the artifact was delivered under.
        file_name: String,
    },
    /// The export failed and the user was notified.
    Failed {
        /// Message shown to the user.
        message: String,
        /// Whether the failure was attributed to the license key.
        license_problem: bool,
    },
}

impl ExportOutcome {
    /// Whether the artifact was delivered.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Runs exports against one conversion backend and one sink.
#[derive(Clone)]
pub struct Exporter {
    client: ConvertClient,
    sink: Arc<dyn ArtifactSink>,
}

impl Exporter {
    /// Create an exporter.
    #[must_use]
    pub fn new(client: ConvertClient, sink: Arc<dyn ArtifactSink>) -> Self {
        Self { client, sink }
    }

    /// Bundle the workspace and export it.
    pub async fn download_current_project_file(
        &self,
        workspace: &Workspace,
        license_key: &str,
    ) -> ExportOutcome {
        let _loading = workspace.loading().acquire();
        let project = workspace.bundle();
        self.download_project_file(workspace, project, license_key)
            .await
    }

    /// Export `project`, taking the tree and invisible ids sent for
    /// conversion from the live workspace.
    ///
    /// The delivered artifact is `project` with `invisible` replaced by the
    /// backend's and `exportedTree` set to the converted tree.
    pub async fn download_project_file(
        &self,
        workspace: &Workspace,
        project: Project,
        license_key: &str,
    ) -> ExportOutcome {
        let _loading = workspace.loading().acquire();
        match self.export(workspace, project, license_key).await {
            Ok(file_name) => {
                tracing::info!("Exported savepoint as {file_name}");
                ExportOutcome::Delivered { file_name }
            }
            Err(e) => {
                let message = format!("Error during export: {e}");
                tracing::error!("{message}");
                let license_problem = mentions_license(&message);
                let notification = if license_problem {
                    Notification::error(message.clone())
                        .with_action(NotificationAction::ChangeLicenseKey)
                } else {
                    Notification::error(message.clone())
                };
                workspace.notify(notification);
                ExportOutcome::Failed {
                    message,
                    license_problem,
                }
            }
        }
    }

    async fn export(
        &self,
        workspace: &Workspace,
        mut project: Project,
        license_key: &str,
    ) -> ExportResult<String> {
        let tree = workspace.tree.to_value(CodecMode::Strip)?;
        let request = ConvertRequest::new(license_key, &workspace.invisible, tree);
        let converted = self.client.convert(&request).await?;

        project.invisible = converted.invisible;
        project.exported_tree = Some(converted.component_tree);

        let file_name = project.file_name();
        let contents = project.to_json_pretty()?;
        self.sink.deliver(&file_name, contents.as_bytes())?;
        Ok(file_name)
    }
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

/// Whether a failure message points at the license key.
#[must_use]
pub fn mentions_license(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("licence") || lower.contains("license")
}
