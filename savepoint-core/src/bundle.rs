//! Bundling live workspace state into a savepoint document.

use std::collections::HashSet;

use crate::project::{Project, ResourceEntry, CURRENT_VERSION};
use crate::workspace::Workspace;

impl Workspace {
    /// Snapshot the workspace as a current-version savepoint.
    ///
    /// Built-in fonts are left out. Built-in still images are only included
    /// when an image component references them. Gifs are written as-is.
    #[must_use]
    pub fn bundle(&self) -> Project {
        let mut used_images = HashSet::new();
        self.tree.traverse(|component| {
            if let Some(name) = component.image_name() {
                used_images.insert(name);
            }
        });

        let images: Vec<ResourceEntry> = self
            .images
            .stills()
            .filter(|image| {
                !self.images.is_default(&image.name) || used_images.contains(image.name.as_str())
            })
            .map(ResourceEntry::from)
            .collect();

        let gifs: Vec<ResourceEntry> = self.images.gifs().map(ResourceEntry::from).collect();

        let fonts: Vec<ResourceEntry> = self.fonts.user_fonts().map(ResourceEntry::from).collect();

        tracing::debug!(
            "Bundled {} fonts, {} images, {} gifs, {} root components",
            fonts.len(),
            images.len(),
            gifs.len(),
            self.tree.len()
        );

        Project {
            name: self.settings.project_name.clone(),
            version: CURRENT_VERSION,
            invisible: self.invisible.clone(),
            fonts,
            width: self.settings.width,
            height: self.settings.height,
            images,
            gifs,
            component_tree: self.tree.to_document(),
            exported_tree: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::component::{Component, ComponentId, ComponentKind};
    use crate::fixtures;
    use crate::fonts::FontRegistry;
    use crate::images::ImageRegistry;
    use crate::project::{ResourceEntry, CURRENT_VERSION};
    use crate::workspace::Workspace;
    use serde_json::json;

    fn image_node(id: &str, image: &str) -> Component {
        Component::with_id(
            id,
            ComponentKind::Image {
                image: image.to_string(),
            },
        )
    }

    fn workspace() -> Workspace {
        let mut fonts = FontRegistry::new(["Arial"]);
        fonts
            .register_base64("Arial", &fixtures::ttf_base64())
            .expect("default font");
        let mut images = ImageRegistry::new(["background", "frame"]);
        images
            .register_base64("background", &fixtures::png_data_uri(), false)
            .expect("default image");
        images
            .register_base64("frame", &fixtures::png_data_uri(), false)
            .expect("default image");
        Workspace::new(fonts, images)
    }

    #[test]
    fn test_bundle_example_workspace() {
        let mut ws = workspace();
        let brand = fixtures::otf_base64();
        ws.fonts.register_base64("Brand", &brand).expect("font");

        let project = ws.bundle();
        assert_eq!(project.fonts, vec![ResourceEntry::new("Brand", brand)]);
        assert!(project.images.is_empty());
        assert!(project.gifs.is_empty());
        assert_eq!((project.width, project.height), (800, 600));
        assert_eq!(project.version, CURRENT_VERSION);

        let value = project.to_value().expect("serialize");
        assert_eq!(value["componentTree"]["components"], json!([]));
    }

    #[test]
    fn test_unreferenced_default_image_pruned() {
        let mut ws = workspace();
        ws.tree.insert_roots(vec![Component::with_id(
            "g",
            ComponentKind::Group {
                components: vec![image_node("bg", "background")],
            },
        )]);
        ws.images
            .register_base64("logo", &fixtures::png_data_uri(), false)
            .expect("image");

        let project = ws.bundle();
        let names: Vec<_> = project.images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["background", "logo"]);
    }

    #[test]
    fn test_gifs_are_separate_and_unfiltered() {
        let mut images = ImageRegistry::new(["loading"]);
        images
            .register_base64("loading", &fixtures::gif_data_uri(), true)
            .expect("gif");
        images
            .register_base64("still", &fixtures::png_data_uri(), false)
            .expect("png");
        let ws = Workspace::new(FontRegistry::default(), images);

        let project = ws.bundle();
        let gif_names: Vec<_> = project.gifs.iter().map(|i| i.name.as_str()).collect();
        let image_names: Vec<_> = project.images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(gif_names, vec!["loading"]);
        assert_eq!(image_names, vec!["still"]);
    }

    #[test]
    fn test_bundle_copies_settings_and_invisible() {
        let mut ws = workspace();
        ws.settings.project_name = "Shop".to_string();
        ws.settings.width = 1024;
        ws.tree.insert_roots(vec![image_node("a", "logo")]);
        ws.invisible.push("a".into());

        let project = ws.bundle();
        assert_eq!(project.name, "Shop");
        assert_eq!(project.width, 1024);
        assert_eq!(project.invisible, vec![ComponentId::from("a")]);
        assert_eq!(project.component_tree.components.len(), 1);
    }
}
