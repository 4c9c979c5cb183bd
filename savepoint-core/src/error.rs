//! Error types for savepoint operations.

use thiserror::Error;

use crate::project::FormatVersion;

/// Result type for savepoint operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors that can occur while bundling, migrating or loading a project.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The document does not satisfy the preconditions of the operation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The document could not be upgraded to the current format version.
    #[error("Migration failed: {0}")]
    Migration(#[from] MigrationError),

    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A font or image payload could not be registered.
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),
}

/// Errors raised by the format migrator.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The document carries no readable `version` field.
    #[error("document has no readable format version")]
    MissingVersion,

    /// No migration path exists from this version.
    #[error("unsupported format version {0}")]
    UnsupportedVersion(FormatVersion),

    /// A migration step could not interpret the document shape.
    #[error("cannot migrate from version {version}: {reason}")]
    Malformed {
        /// Version the failing step upgrades from.
        version: FormatVersion,
        /// What the step could not interpret.
        reason: String,
    },
}

/// Errors raised while decoding font or image payloads.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The payload is not a well-formed `data:` URI.
    #[error("invalid data URI for {name}: {reason}")]
    InvalidDataUri {
        /// Resource name.
        name: String,
        /// Why the URI was rejected.
        reason: String,
    },

    /// The base64 payload failed to decode.
    #[error("failed to decode base64 payload for {name}: {source}")]
    Base64 {
        /// Resource name.
        name: String,
        /// Decoder error.
        #[source]
        source: base64::DecodeError,
    },

    /// The decoded bytes are not a recognised format.
    #[error("unrecognised {kind} format for {name}")]
    UnknownFormat {
        /// Resource name.
        name: String,
        /// `"font"` or `"image"`.
        kind: &'static str,
    },
}

impl ResourceError {
    /// Name of the resource this error refers to.
    #[must_use]
    pub fn resource_name(&self) -> &str {
        match self {
            Self::InvalidDataUri { name, .. }
            | Self::Base64 { name, .. }
            | Self::UnknownFormat { name, .. } => name,
        }
    }
}
