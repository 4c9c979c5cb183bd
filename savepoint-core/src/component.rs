//! Canvas components - the nodes of the layout tree.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::check::Check;

/// Type tag of grouping components.
pub const GROUP_TYPE: &str = "Group";

/// Type tag of template components.
pub const TEMPLATE_TYPE: &str = "Template";

/// Fields that only matter to the editor and are dropped in [`CodecMode::Strip`].
const EDITOR_ONLY_FIELDS: [&str; 3] = ["name", "locked", "collapsed"];

/// Unique identifier for a component.
///
/// Identifiers are user-visible strings; [`ComponentId::generate`] produces a
/// fresh random one for newly created components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a new unique identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// How much of a component to serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodecMode {
    /// Everything, used for savepoints.
    #[default]
    Full,
    /// Only what the conversion backend needs.
    Strip,
}

/// Position and size of a component on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    /// X position (pixels from left).
    #[serde(default)]
    pub x: f64,
    /// Y position (pixels from top).
    #[serde(default)]
    pub y: f64,
    /// Width in pixels.
    #[serde(default)]
    pub width: f64,
    /// Height in pixels.
    #[serde(default)]
    pub height: f64,
}

/// The type of a component and its type-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComponentKind {
    /// A container grouping other components.
    Group {
        /// Child components in paint order.
        #[serde(default)]
        components: Vec<Component>,
    },

    /// An instance of a reusable template.
    Template {
        /// Template name.
        template: String,
        /// Child components in paint order.
        #[serde(default)]
        components: Vec<Component>,
    },

    /// A bitmap drawn from the image registry.
    Image {
        /// Image registry name.
        image: String,
    },

    /// A text label.
    Text {
        /// Text content.
        text: String,
        /// Font registry name, `None` for the editor default.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font: Option<String>,
        /// Font size in pixels.
        #[serde(rename = "fontSize", default = "default_font_size")]
        font_size: f64,
        /// Text color as hex.
        #[serde(default = "default_color")]
        color: String,
    },

    /// A clickable button.
    Button {
        /// Button caption.
        label: String,
        /// Conditions that must hold before the button acts.
        #[serde(default)]
        checks: Vec<Check>,
    },
}

fn default_font_size() -> f64 {
    16.0
}

fn default_color() -> String {
    "#000000".to_string()
}

impl ComponentKind {
    /// The `type` tag written for this kind.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Group { .. } => GROUP_TYPE,
            Self::Template { .. } => TEMPLATE_TYPE,
            Self::Image { .. } => "Image",
            Self::Text { .. } => "Text",
            Self::Button { .. } => "Button",
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// A node of the layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique identifier.
    pub id: ComponentId,
    /// Display name shown in the editor's outline.
    #[serde(default)]
    pub name: String,
    /// Position and size.
    #[serde(flatten)]
    pub frame: Frame,
    /// Whether the editor prevents dragging this node.
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
    /// Whether the outline shows this node collapsed.
    #[serde(default, skip_serializing_if = "is_false")]
    pub collapsed: bool,
    /// Component content type.
    #[serde(flatten)]
    pub kind: ComponentKind,
}

impl Component {
    /// Create a component with a fresh identifier.
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        Self::with_id(ComponentId::generate(), kind)
    }

    /// Create a component with the given identifier.
    #[must_use]
    pub fn with_id(id: impl Into<ComponentId>, kind: ComponentKind) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            frame: Frame::default(),
            locked: false,
            collapsed: false,
            kind,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the frame.
    #[must_use]
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    /// Whether this is a group or template, the only kinds that may be imported.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            ComponentKind::Group { .. } | ComponentKind::Template { .. }
        )
    }

    /// Direct children, empty for leaf kinds.
    #[must_use]
    pub fn children(&self) -> &[Component] {
        match &self.kind {
            ComponentKind::Group { components } | ComponentKind::Template { components, .. } => {
                components
            }
            _ => &[],
        }
    }

    /// Image registry name for image components.
    #[must_use]
    pub fn image_name(&self) -> Option<&str> {
        match &self.kind {
            ComponentKind::Image { image } => Some(image),
            _ => None,
        }
    }

    /// Visit this component and all descendants in pre-order.
    pub fn traverse<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a Component),
    {
        visit(self);
        for child in self.children() {
            child.traverse(visit);
        }
    }

    /// Serialize this subtree to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_value(&self, mode: CodecMode) -> serde_json::Result<Value> {
        let mut value = serde_json::to_value(self)?;
        if mode == CodecMode::Strip {
            strip_editor_fields(&mut value);
        }
        Ok(value)
    }

    /// Deserialize a subtree from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a known component shape.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

/// Remove editor-only fields from a serialized node and its descendants.
pub(crate) fn strip_editor_fields(value: &mut Value) {
    let Some(node) = value.as_object_mut() else {
        return;
    };
    for field in EDITOR_ONLY_FIELDS {
        node.remove(field);
    }
    if let Some(Value::Array(children)) = node.get_mut("components") {
        children.iter_mut().for_each(strip_editor_fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::PermissionCheck;
    use serde_json::json;

    fn sample_group() -> Component {
        Component::with_id(
            "menu",
            ComponentKind::Group {
                components: vec![
                    Component::with_id(
                        "logo",
                        ComponentKind::Image {
                            image: "logo.png".into(),
                        },
                    ),
                    Component::with_id(
                        "buy",
                        ComponentKind::Button {
                            label: "Buy".into(),
                            checks: vec![PermissionCheck::generator().into()],
                        },
                    )
                    .named("Buy button"),
                ],
            },
        )
        .with_frame(Frame {
            x: 10.0,
            y: 20.0,
            width: 300.0,
            height: 200.0,
        })
    }

    #[test]
    fn test_full_codec_preserves_order_and_nesting() {
        let group = sample_group();
        let value = group.to_value(CodecMode::Full).expect("serialize");

        assert_eq!(value["type"], "Group");
        assert_eq!(value["x"], json!(10.0));
        assert_eq!(value["components"][0]["id"], "logo");
        assert_eq!(value["components"][1]["name"], "Buy button");

        let parsed = Component::from_value(value).expect("deserialize");
        assert_eq!(parsed, group);
    }

    #[test]
    fn test_strip_mode_drops_editor_fields_recursively() {
        let mut group = sample_group();
        group.locked = true;
        let value = group.to_value(CodecMode::Strip).expect("serialize");

        assert!(value.get("name").is_none());
        assert!(value.get("locked").is_none());
        assert!(value["components"][1].get("name").is_none());
        assert_eq!(value["components"][1]["label"], "Buy");
        assert_eq!(
            value["components"][1]["checks"][0]["permission"],
            "ag.group.premium"
        );
    }

    #[test]
    fn test_traverse_is_pre_order() {
        let group = sample_group();
        let mut ids = Vec::new();
        group.traverse(&mut |c| ids.push(c.id.as_str().to_string()));
        assert_eq!(ids, vec!["menu", "logo", "buy"]);
    }

    #[test]
    fn test_container_kinds() {
        assert!(sample_group().is_container());
        let template = Component::new(ComponentKind::Template {
            template: "card".into(),
            components: Vec::new(),
        });
        assert!(template.is_container());
        let text = Component::new(ComponentKind::Text {
            text: "Hi".into(),
            font: None,
            font_size: 12.0,
            color: "#fff".into(),
        });
        assert!(!text.is_container());
    }

    #[test]
    fn test_text_defaults_on_parse() {
        let parsed = Component::from_value(json!({
            "type": "Text",
            "id": "title",
            "text": "Welcome"
        }))
        .expect("deserialize");

        assert_eq!(parsed.name, "");
        assert_eq!(parsed.frame, Frame::default());
        match parsed.kind {
            ComponentKind::Text {
                font_size, color, ..
            } => {
                assert!((font_size - 16.0).abs() < f64::EPSILON);
                assert_eq!(color, "#000000");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_geometry_survives_value_codec_exactly() {
        let component = Component::from_value(json!({
            "type": "Text",
            "id": "t",
            "text": "Hi",
            "fontSize": 13.7,
            "x": 12.3,
            "y": 0.1,
            "width": 16_777_217,
            "height": 48.25
        }))
        .expect("parse");

        for mode in [CodecMode::Full, CodecMode::Strip] {
            let value = component.to_value(mode).expect("serialize");
            assert_eq!(value["x"], json!(12.3));
            assert_eq!(value["y"], json!(0.1));
            assert_eq!(value["width"], json!(16_777_217.0));
            assert_eq!(value["height"], json!(48.25));
            assert_eq!(value["fontSize"], json!(13.7));
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = Component::from_value(json!({ "type": "Hologram", "id": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ComponentId::generate(), ComponentId::generate());
    }
}
