//! Live editor state.

use std::sync::Arc;

use crate::activity::{ActivityFlag, ActivityGuard};
use crate::component::ComponentId;
use crate::fonts::FontRegistry;
use crate::images::ImageRegistry;
use crate::notify::{LogNotifier, Notification, Notifier};
use crate::project::DEFAULT_PROJECT_NAME;
use crate::tree::ComponentTree;

/// Project-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Project display name.
    pub project_name: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Everything the editor is currently working on.
///
/// All savepoint operations take the workspace explicitly; nothing here is
/// global. The render-pause and loading flags are shared handles that other
/// subsystems may clone and observe.
pub struct Workspace {
    /// Project settings.
    pub settings: Settings,
    /// The component forest.
    pub tree: ComponentTree,
    /// Ids of components hidden in the editor.
    pub invisible: Vec<ComponentId>,
    /// Registered fonts.
    pub fonts: FontRegistry,
    /// Registered images and gifs.
    pub images: ImageRegistry,
    /// Currently selected component.
    pub selection: Option<ComponentId>,
    render_pause: ActivityFlag,
    loading: ActivityFlag,
    notifier: Arc<dyn Notifier>,
}

impl Workspace {
    /// Create an empty workspace around the given registries.
    #[must_use]
    pub fn new(fonts: FontRegistry, images: ImageRegistry) -> Self {
        Self {
            settings: Settings::default(),
            tree: ComponentTree::new(),
            invisible: Vec::new(),
            fonts,
            images,
            selection: None,
            render_pause: ActivityFlag::new(),
            loading: ActivityFlag::new(),
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Route notifications to the given surface.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Flag the renderer checks before drawing a frame.
    #[must_use]
    pub fn render_pause(&self) -> &ActivityFlag {
        &self.render_pause
    }

    /// Pause rendering until the returned guard is dropped.
    #[must_use = "rendering resumes as soon as the guard is dropped"]
    pub fn pause_rendering(&self) -> ActivityGuard {
        self.render_pause.acquire()
    }

    /// Flag driving the UI's loading indicator.
    #[must_use]
    pub fn loading(&self) -> &ActivityFlag {
        &self.loading
    }

    /// Show a notification to the user.
    pub fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Select a component.
    pub fn select(&mut self, id: ComponentId) {
        self.selection = Some(id);
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Whether the component is hidden in the editor.
    #[must_use]
    pub fn is_invisible(&self, id: &ComponentId) -> bool {
        self.invisible.contains(id)
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(FontRegistry::default(), ImageRegistry::default())
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("settings", &self.settings)
            .field("tree", &self.tree)
            .field("invisible", &self.invisible)
            .field("fonts", &self.fonts)
            .field("images", &self.images)
            .field("selection", &self.selection)
            .field("render_pause", &self.render_pause)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}
