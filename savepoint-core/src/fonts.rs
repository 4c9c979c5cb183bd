//! Font registry.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::ResourceError;
use crate::payload;

/// Container format of a font payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    /// TrueType outlines.
    TrueType,
    /// OpenType with CFF outlines.
    OpenType,
    /// TrueType/OpenType collection.
    Collection,
    /// WOFF 1.0.
    Woff,
    /// WOFF 2.0.
    Woff2,
}

impl FontFormat {
    /// Detect format from the sfnt/WOFF signature.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        match data.get(..4)? {
            &[0x00, 0x01, 0x00, 0x00] | b"true" => Some(Self::TrueType),
            b"OTTO" => Some(Self::OpenType),
            b"ttcf" => Some(Self::Collection),
            b"wOFF" => Some(Self::Woff),
            b"wOF2" => Some(Self::Woff2),
            _ => None,
        }
    }
}

/// A registered font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    /// Registry name, referenced by text components.
    pub name: String,
    /// Base64 payload exactly as registered.
    pub data: String,
    /// Detected container format.
    pub format: FontFormat,
}

impl Font {
    /// Validate a base64 payload and build a font from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not decode or is not a font.
    pub fn decode(name: &str, data: &str) -> Result<Self, ResourceError> {
        let payload = payload::decode(name, data)?;
        let format =
            FontFormat::from_magic_bytes(&payload.bytes).ok_or_else(|| ResourceError::UnknownFormat {
                name: name.to_string(),
                kind: "font",
            })?;
        Ok(Self {
            name: name.to_string(),
            data: data.to_string(),
            format,
        })
    }
}

/// Fonts available to the canvas, keyed by name in registration order.
///
/// Built-in fonts are named up front; they ship with the editor and are never
/// written into savepoints.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    fonts: IndexMap<String, Font>,
    defaults: IndexSet<String>,
}

impl FontRegistry {
    /// Create a registry that treats the given names as built-in.
    #[must_use]
    pub fn new<I, S>(defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fonts: IndexMap::new(),
            defaults: defaults.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the name belongs to a built-in font.
    #[must_use]
    pub fn is_default(&self, name: &str) -> bool {
        self.defaults.contains(name)
    }

    /// Names of the built-in fonts.
    pub fn default_names(&self) -> impl Iterator<Item = &str> {
        self.defaults.iter().map(String::as_str)
    }

    /// Whether a font with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    /// Get a font by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Font> {
        self.fonts.get(name)
    }

    /// All registered fonts in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Font> {
        self.fonts.values()
    }

    /// Registered fonts that are not built-in.
    pub fn user_fonts(&self) -> impl Iterator<Item = &Font> {
        self.fonts.values().filter(|f| !self.is_default(&f.name))
    }

    /// Number of registered fonts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Whether no fonts are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Insert an already decoded font, replacing any font with the same name.
    pub fn insert(&mut self, font: Font) {
        tracing::debug!("Registering font {} ({:?})", font.name, font.format);
        self.fonts.insert(font.name.clone(), font);
    }

    /// Decode and register a base64 font payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a decodable font; the registry is
    /// left unchanged in that case.
    pub fn register_base64(&mut self, name: &str, data: &str) -> Result<(), ResourceError> {
        let font = Font::decode(name, data)?;
        self.insert(font);
        Ok(())
    }

    /// Remove a font. Removing a name that is not registered is a no-op.
    ///
    /// Returns whether a font was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.fonts.shift_remove(name).is_some()
    }

    /// Remove every font that is not built-in.
    pub fn unregister_user_fonts(&mut self) {
        let defaults = &self.defaults;
        self.fonts.retain(|name, _| defaults.contains(name));
    }
}
