//! Image samples accepted at the user input boundary

use axum::body::Bytes;
use tracing::debug;

const GENERIC_MEDIA_TYPE: &str = "application/octet-stream";

/// Raster formats the provider accepts as inline image data
const ACCEPTED_MEDIA_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/heic",
    "image/heif",
];

/// One submitted photo: raw bytes plus the media type it was declared (or
/// sniffed) as
///
/// Cloning shares the underlying buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSample {
    bytes: Bytes,
    media_type: String,
}

impl ImageSample {
    /// Build a sample from an upload body and its declared `Content-Type`
    ///
    /// Returns `None` for anything that is not an accepted raster image: an
    /// empty body, a declared type outside `ACCEPTED_MEDIA_TYPES` (vector
    /// formats such as `image/svg+xml` included), or an undeclared / generic
    /// type whose magic bytes do not identify an accepted format. Such input is
    /// dropped without a signal to the user.
    pub fn from_upload(bytes: impl Into<Bytes>, declared_type: Option<&str>) -> Option<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return None;
        }

        let declared = declared_type
            .map(media_type_essence)
            .filter(|essence| !essence.is_empty() && essence != GENERIC_MEDIA_TYPE);

        let media_type = match declared {
            Some(essence) if is_accepted(&essence) => essence,
            Some(essence) => {
                debug!(media_type = %essence, "Ignoring upload with unsupported media type");
                return None;
            }
            None => {
                let kind = infer::get(&bytes).filter(|kind| {
                    kind.matcher_type() == infer::MatcherType::Image && is_accepted(kind.mime_type())
                })?;
                debug!(media_type = kind.mime_type(), "Sniffed upload media type");
                kind.mime_type().to_string()
            }
        };

        Some(Self { bytes, media_type })
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn is_accepted(media_type: &str) -> bool {
    ACCEPTED_MEDIA_TYPES.contains(&media_type)
}

/// `image/PNG; charset=binary` -> `image/png`
fn media_type_essence(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
