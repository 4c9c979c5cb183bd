//! Base64 payload decoding shared by the font and image registries.

use base64::Engine;

use crate::error::ResourceError;

/// A decoded resource payload.
#[derive(Debug, Clone)]
pub(crate) struct Payload {
    /// MIME type from the `data:` header, if the payload was a data URI.
    pub mime: Option<String>,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

/// Decode a base64 payload, accepting either bare base64 or a
/// `data:<mime>;base64,<payload>` URI.
pub(crate) fn decode(name: &str, data: &str) -> Result<Payload, ResourceError> {
    let (mime, encoded) = match data.strip_prefix("data:") {
        Some(uri) => {
            let (mime, encoded) = split_data_uri(name, uri)?;
            (Some(mime), encoded)
        }
        None => (None, data),
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|source| ResourceError::Base64 {
            name: name.to_string(),
            source,
        })?;

    Ok(Payload { mime, bytes })
}

/// Decode a payload that must be a base64 `data:` URI.
pub(crate) fn decode_data_uri(name: &str, data: &str) -> Result<Payload, ResourceError> {
    if !data.starts_with("data:") {
        return Err(ResourceError::InvalidDataUri {
            name: name.to_string(),
            reason: "not a data URI".to_string(),
        });
    }
    decode(name, data)
}

/// Split `<mime>;base64,<payload>` (the part after `data:`).
fn split_data_uri<'a>(name: &str, uri: &'a str) -> Result<(String, &'a str), ResourceError> {
    let (metadata, encoded) = uri
        .split_once(',')
        .ok_or_else(|| ResourceError::InvalidDataUri {
            name: name.to_string(),
            reason: "missing comma".to_string(),
        })?;

    let Some(mime) = metadata.strip_suffix(";base64") else {
        return Err(ResourceError::InvalidDataUri {
            name: name.to_string(),
            reason: "payload is not base64 encoded".to_string(),
        });
    };

    Ok((mime.to_ascii_lowercase(), encoded))
}
