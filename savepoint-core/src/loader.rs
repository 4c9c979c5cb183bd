//! Restoring savepoints into the live workspace.
//!
//! Loading replaces the workspace contents; importing merges a single group or
//! template into it. Both validate and migrate the document before touching
//! any live state, and both pause rendering for the duration of the mutation.
//!
//! Resource registration is best effort: payloads are decoded as one joined
//! batch with per-entry results, and an entry that fails to decode is logged
//! and reported in the [`LoadReport`] without failing the load.

use futures::future::join_all;
use serde_json::Value;

use crate::component::{ComponentId, GROUP_TYPE, TEMPLATE_TYPE};
use crate::error::{LayoutError, LayoutResult, ResourceError};
use crate::fonts::Font;
use crate::images::ImageAsset;
use crate::migrate;
use crate::notify::Notification;
use crate::project::{FormatVersion, Project, ResourceEntry, CURRENT_VERSION};
use crate::workspace::Workspace;

const IMPORT_PRECONDITION: &str = "You can only import layout files as a component if they contain exactly one group or template component.";

/// Result of loading a savepoint.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Version the document was migrated from, if it was migrated.
    pub migrated_from: Option<FormatVersion>,
    /// Resources that could not be registered.
    pub resource_failures: Vec<ResourceError>,
}

impl LoadReport {
    /// Whether every resource in the document was registered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.resource_failures.is_empty()
    }
}

/// Result of importing a component.
#[derive(Debug)]
pub struct ImportReport {
    /// Version the document was migrated from, if it was migrated.
    pub migrated_from: Option<FormatVersion>,
    /// Id of the imported root component.
    pub component: ComponentId,
}

/// A document resource waiting to be decoded.
enum PendingResource {
    Font(ResourceEntry),
    Image(ResourceEntry),
    Gif(ResourceEntry),
}

/// A decoded resource ready to be registered.
enum DecodedResource {
    Font(Font),
    Image(ImageAsset),
}

impl PendingResource {
    fn decode(self) -> Result<DecodedResource, ResourceError> {
        match self {
            Self::Font(entry) => Font::decode(&entry.name, &entry.data).map(DecodedResource::Font),
            Self::Image(entry) => {
                ImageAsset::decode(&entry.name, &entry.data, false).map(DecodedResource::Image)
            }
            Self::Gif(entry) => {
                ImageAsset::decode(&entry.name, &entry.data, true).map(DecodedResource::Image)
            }
        }
    }
}

impl Workspace {
    /// Replace the workspace with a raw savepoint document, migrating it first
    /// if it was written by an older format version.
    ///
    /// With `keep_resources` the registered fonts and images are left alone and
    /// the document's resources are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be migrated or parsed. Nothing
    /// in the workspace has changed when an error is returned.
    pub async fn load_project_from_json(
        &mut self,
        document: Value,
        keep_resources: bool,
    ) -> LayoutResult<LoadReport> {
        let (project, migrated_from) = self.upgrade(document)?;
        let mut report = self.apply_project(project, keep_resources).await;
        report.migrated_from = migrated_from;
        Ok(report)
    }

    /// Replace the workspace with a parsed savepoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the project is on an older version and cannot be
    /// migrated. Nothing in the workspace has changed when an error is returned.
    pub async fn load_project(
        &mut self,
        project: Project,
        keep_resources: bool,
    ) -> LayoutResult<LoadReport> {
        if project.is_current() {
            return Ok(self.apply_project(project, keep_resources).await);
        }
        self.load_project_from_json(project.to_value()?, keep_resources)
            .await
    }

    /// Merge a single group or template from a raw savepoint into the tree.
    ///
    /// The document's invisible ids are appended to the workspace's.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Validation`] if the document does not hold exactly
    /// one group or template component, or a migration/parse error. Nothing in
    /// the workspace has changed when an error is returned.
    pub fn import_component_from_json(&mut self, document: Value) -> LayoutResult<ImportReport> {
        if !is_importable(&document) {
            return Err(self.reject_import());
        }

        let (project, migrated_from) = self.upgrade(document)?;
        let mut components = project.component_tree.components.into_iter();
        let component = match (components.next(), components.next()) {
            (Some(component), None) if component.is_container() => component,
            _ => return Err(self.reject_import()),
        };

        let _paused = self.pause_rendering();
        let id = component.id.clone();
        self.invisible.extend(project.invisible);
        self.tree.insert_roots([component]);
        tracing::info!("Imported component {id}");

        Ok(ImportReport {
            migrated_from,
            component: id,
        })
    }

    /// Tell the user why an import was refused.
    fn reject_import(&self) -> LayoutError {
        self.notify(Notification::error(IMPORT_PRECONDITION));
        LayoutError::Validation(IMPORT_PRECONDITION.to_string())
    }

    /// Migrate if needed and parse. Notifies the user when a migration ran.
    fn upgrade(&self, document: Value) -> LayoutResult<(Project, Option<FormatVersion>)> {
        let version = migrate::document_version(&document)?;
        if version == CURRENT_VERSION {
            return Ok((Project::from_value(document)?, None));
        }

        let migration = migrate::migrate(document)?;
        let project = Project::from_value(migration.document)?;
        tracing::info!(
            "Migrated savepoint {:?} from format {} to {}",
            project.display_name(),
            migration.from,
            migration.to
        );
        self.notify(Notification::info(format!(
            "Your savepoint was still on format-version {} and got migrated to the new format-version {}",
            migration.from, migration.to
        )));
        Ok((project, Some(migration.from)))
    }

    async fn apply_project(&mut self, project: Project, keep_resources: bool) -> LoadReport {
        let _paused = self.pause_rendering();

        if !keep_resources {
            self.fonts.unregister_user_fonts();
            self.images.unregister_user_images();
        }

        self.selection = None;
        self.tree.clear();

        self.settings.project_name = project.display_name().to_string();
        self.settings.width = project.width;
        self.settings.height = project.height;
        self.invisible = project.invisible;

        self.tree.insert_roots(project.component_tree.components);

        let mut report = LoadReport::default();
        if !keep_resources {
            report.resource_failures = self
                .register_resources(project.fonts, project.images, project.gifs)
                .await;
        }

        tracing::info!(
            "Loaded savepoint {:?}: {} root components, {} fonts, {} images",
            self.settings.project_name,
            self.tree.len(),
            self.fonts.len(),
            self.images.len()
        );
        report
    }

    /// Decode every pending resource as one joined batch, then register the
    /// ones that decoded. Failures are logged and returned.
    ///
    /// Decoding does not yield, so the batch runs to completion in order. It
    /// is joined so each entry's result is captured on its own and one failure
    /// never stops its siblings.
    async fn register_resources(
        &mut self,
        fonts: Vec<ResourceEntry>,
        images: Vec<ResourceEntry>,
        gifs: Vec<ResourceEntry>,
    ) -> Vec<ResourceError> {
        let mut pending = Vec::with_capacity(fonts.len() + images.len() + gifs.len());
        pending.extend(
            fonts
                .into_iter()
                .filter(|font| !self.fonts.is_default(&font.name))
                .map(PendingResource::Font),
        );
        pending.extend(
            images
                .into_iter()
                .filter(|image| !self.images.is_default(&image.name))
                .map(PendingResource::Image),
        );
        pending.extend(gifs.into_iter().map(PendingResource::Gif));

        let decoded = join_all(
            pending
                .into_iter()
                .map(|resource| async move { resource.decode() }),
        )
        .await;

        let mut failures = Vec::new();
        for result in decoded {
            match result {
                Ok(DecodedResource::Font(font)) => self.fonts.insert(font),
                Ok(DecodedResource::Image(image)) => self.images.insert(image),
                Err(e) => {
                    tracing::error!("Failed to register {}: {e}", e.resource_name());
                    failures.push(e);
                }
            }
        }
        failures
    }
}

/// Whether a raw document holds exactly one group or template component.
fn is_importable(document: &Value) -> bool {
    let Some(components) = document
        .pointer("/componentTree/components")
        .and_then(Value::as_array)
    else {
        return false;
    };
    match components.as_slice() {
        [only] => matches!(
            only.get("type").and_then(Value::as_str),
            Some(GROUP_TYPE | TEMPLATE_TYPE)
        ),
        _ => false,
    }
}
