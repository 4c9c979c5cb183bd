//! The savepoint document: a flat, versioned snapshot of a layout project.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::component::ComponentId;
use crate::fonts::Font;
use crate::images::ImageAsset;
use crate::tree::TreeDocument;

/// Format version written by this build.
pub const CURRENT_VERSION: FormatVersion = FormatVersion(4);

/// Name given to projects whose document carries none.
pub const DEFAULT_PROJECT_NAME: &str = "Starter";

/// Savepoint format version.
///
/// Older savepoints store the version as a string, so both `3` and `"3"`
/// are accepted on input. It is always written as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FormatVersion(pub u32);

impl FormatVersion {
    /// Read a version from a raw JSON value.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()).map(Self),
            Value::String(s) => s.trim().parse().ok().map(Self),
            _ => None,
        }
    }

    /// The version following this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for FormatVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid format version: {value}"))
        })
    }
}

/// A named, encoded resource as stored in a savepoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Registry name.
    pub name: String,
    /// Base64 payload (data URI for images).
    pub data: String,
}

impl ResourceEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

impl From<&Font> for ResourceEntry {
    fn from(font: &Font) -> Self {
        Self::new(font.name.clone(), font.data.clone())
    }
}

impl From<&ImageAsset> for ResourceEntry {
    fn from(image: &ImageAsset) -> Self {
        Self::new(image.name.clone(), image.data.clone())
    }
}

/// Savepoint document.
///
/// Produced by the bundler or parsed from storage, consumed once by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Display name; also used for the download file name.
    #[serde(default)]
    pub name: String,
    /// Format version of this document.
    pub version: FormatVersion,
    /// Ids of components hidden in the editor.
    #[serde(default)]
    pub invisible: Vec<ComponentId>,
    /// User fonts, built-ins excluded.
    #[serde(default)]
    pub fonts: Vec<ResourceEntry>,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Still images.
    #[serde(default)]
    pub images: Vec<ResourceEntry>,
    /// Animated images.
    #[serde(default)]
    pub gifs: Vec<ResourceEntry>,
    /// The component forest under its synthetic root.
    #[serde(default)]
    pub component_tree: TreeDocument,
    /// Tree computed by the conversion backend; only present in export artifacts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_tree: Option<Value>,
}

impl Project {
    /// Whether this document is on the current format version.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.version == CURRENT_VERSION
    }

    /// Name to show, falling back to [`DEFAULT_PROJECT_NAME`].
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            DEFAULT_PROJECT_NAME
        } else {
            &self.name
        }
    }

    /// File name for downloads: spaces and path separators become
    /// underscores, `.json` appended.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "{}.json",
            self.display_name().replace([' ', '/', '\\'], "_")
        )
    }

    /// Parse a document from a JSON value without migrating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not match the current document shape.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Convert to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Serialize to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize to an indented JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a current-version document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
