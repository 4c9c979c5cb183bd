//! Image registry.
//!
//! Images are registered from base64 data URIs and keep the URI verbatim so a
//! savepoint can write it back unchanged. Animated images (gifs) live in the
//! same registry, distinguished by [`ImageAsset::is_gif`].

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::ResourceError;
use crate::payload;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// GIF image, possibly animated.
    Gif,
    /// WebP image.
    WebP,
    /// SVG vector image.
    Svg,
}

impl ImageFormat {
    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::WebP),
            "image/svg+xml" => Some(Self::Svg),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // GIF87a / GIF89a
        if data.starts_with(b"GIF8") {
            return Some(Self::Gif);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// A registered image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Registry name, referenced by image components.
    pub name: String,
    /// Base64 data URI exactly as registered.
    pub data: String,
    /// Whether the image is animated.
    pub is_gif: bool,
    /// Detected format.
    pub format: ImageFormat,
}

impl ImageAsset {
    /// Validate a base64 data URI and build an image from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI is malformed, does not decode, or is not a
    /// supported image format.
    pub fn decode(name: &str, data: &str, is_gif: bool) -> Result<Self, ResourceError> {
        let payload = payload::decode_data_uri(name, data)?;
        let format = ImageFormat::from_magic_bytes(&payload.bytes)
            .or_else(|| payload.mime.as_deref().and_then(ImageFormat::from_mime))
            .ok_or_else(|| ResourceError::UnknownFormat {
                name: name.to_string(),
                kind: "image",
            })?;
        Ok(Self {
            name: name.to_string(),
            data: data.to_string(),
            is_gif,
            format,
        })
    }
}

/// Images available to the canvas, keyed by name in registration order.
#[derive(Debug, Clone, Default)]
pub struct ImageRegistry {
    images: IndexMap<String, ImageAsset>,
    defaults: IndexSet<String>,
}

impl ImageRegistry {
    /// Create a registry that treats the given names as built-in.
    #[must_use]
    pub fn new<I, S>(defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            images: IndexMap::new(),
            defaults: defaults.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the name belongs to a built-in image.
    #[must_use]
    pub fn is_default(&self, name: &str) -> bool {
        self.defaults.contains(name)
    }

    /// Names of the built-in images.
    pub fn default_names(&self) -> impl Iterator<Item = &str> {
        self.defaults.iter().map(String::as_str)
    }

    /// Whether an image with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    /// Get an image by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ImageAsset> {
        self.images.get(name)
    }

    /// All registered images in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ImageAsset> {
        self.images.values()
    }

    /// Registered still images (not gifs).
    pub fn stills(&self) -> impl Iterator<Item = &ImageAsset> {
        self.images.values().filter(|image| !image.is_gif)
    }

    /// Registered animated images.
    pub fn gifs(&self) -> impl Iterator<Item = &ImageAsset> {
        self.images.values().filter(|image| image.is_gif)
    }

    /// Number of registered images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether no images are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Insert an already decoded image, replacing any image with the same name.
    pub fn insert(&mut self, image: ImageAsset) {
        tracing::debug!(
            "Registering image {} ({:?}, gif: {})",
            image.name,
            image.format,
            image.is_gif
        );
        self.images.insert(image.name.clone(), image);
    }

    /// Decode and register a base64 data URI.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a decodable image; the registry
    /// is left unchanged in that case.
    pub fn register_base64(
        &mut self,
        name: &str,
        data: &str,
        is_gif: bool,
    ) -> Result<(), ResourceError> {
        let image = ImageAsset::decode(name, data, is_gif)?;
        self.insert(image);
        Ok(())
    }

    /// Remove an image. Removing a name that is not registered is a no-op.
    ///
    /// Returns whether an image was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.images.shift_remove(name).is_some()
    }

    /// Remove every image that is not built-in.
    pub fn unregister_user_images(&mut self) {
        let defaults = &self.defaults;
        self.images.retain(|name, _| defaults.contains(name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_register_png_and_gif() {
        let mut images = ImageRegistry::default();
        images
            .register_base64("logo", &fixtures::png_data_uri(), false)
            .expect("register png");
        images
            .register_base64("spinner", &fixtures::gif_data_uri(), true)
            .expect("register gif");

        assert_eq!(images.get("logo").map(|i| i.format), Some(ImageFormat::Png));
        assert_eq!(images.get("spinner").map(|i| i.format), Some(ImageFormat::Gif));

        let stills: Vec<_> = images.stills().map(|i| i.name.as_str()).collect();
        let gifs: Vec<_> = images.gifs().map(|i| i.name.as_str()).collect();
        assert_eq!(stills, vec!["logo"]);
        assert_eq!(gifs, vec!["spinner"]);
    }

    #[test]
    fn test_svg_detected_from_mime() {
        let asset = ImageAsset::decode("icon", "data:image/svg+xml;base64,PHN2Zz48L3N2Zz4=", false)
            .expect("decode");
        assert_eq!(asset.format, ImageFormat::Svg);
    }

    #[test]
    fn test_rejects_bare_base64() {
        let mut images = ImageRegistry::default();
        let err = images
            .register_base64("logo", &fixtures::png_base64(), false)
            .unwrap_err();
        assert!(matches!(err, ResourceError::InvalidDataUri { .. }));
        assert!(images.is_empty());
    }

    #[test]
    fn test_rejects_unknown_format() {
        let err = ImageAsset::decode("blob", "data:application/octet-stream;base64,aGVsbG8=", false)
            .unwrap_err();
        assert!(matches!(err, ResourceError::UnknownFormat { kind: "image", .. }));
    }

    #[test]
    fn test_unregister_is_idempotent_and_keeps_defaults() {
        let mut images = ImageRegistry::new(["background"]);
        images
            .register_base64("background", &fixtures::png_data_uri(), false)
            .expect("register");
        images
            .register_base64("logo", &fixtures::png_data_uri(), false)
            .expect("register");

        assert!(!images.unregister("missing"));
        images.unregister_user_images();
        assert!(images.contains("background"));
        assert!(!images.contains("logo"));
        assert!(images.is_default("background"));
    }
}
