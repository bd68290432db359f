//! Inline-encoded image payloads.
//!
//! Both UI surfaces ship uploaded images to the platform API as inline
//! base64 data URLs rather than multipart attachments, so the encoded form
//! is a first-class type with its own validation.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

/// Errors that can occur when building an [`EncodedImage`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum ImageError {
    /// The upload contained no bytes.
    #[error("image cannot be empty")]
    Empty,
    /// The upload exceeds the size cap.
    #[error("image must be at most {max} bytes")]
    TooLarge {
        /// Maximum allowed decoded size in bytes.
        max: usize,
    },
    /// The media type is not an image type.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    /// The string is not a base64 data URL.
    #[error("not a base64 image data URL")]
    NotADataUrl,
    /// The payload is not valid base64.
    #[error("invalid base64 payload")]
    InvalidBase64,
}

/// An image held as an inline base64 data URL.
///
/// The canonical text form is `data:<media type>;base64,<payload>`, which
/// is what the platform API stores and what the UI renders as a preview.
///
/// ## Examples
///
/// ```
/// use techmart_core::EncodedImage;
///
/// let image = EncodedImage::from_bytes("image/png", &[0x89, 0x50, 0x4e, 0x47]).unwrap();
/// assert_eq!(image.as_data_url(), "data:image/png;base64,iVBORw==");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncodedImage {
    media_type: String,
    payload: String,
}

impl EncodedImage {
    /// Maximum decoded image size: 5 MiB.
    pub const MAX_BYTES: usize = 5 * 1024 * 1024;

    /// Encode raw upload bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are empty, exceed [`Self::MAX_BYTES`],
    /// or the media type is not an `image/*` type.
    pub fn from_bytes(media_type: &str, bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        if bytes.len() > Self::MAX_BYTES {
            return Err(ImageError::TooLarge {
                max: Self::MAX_BYTES,
            });
        }

        if !media_type.starts_with("image/") {
            return Err(ImageError::UnsupportedMediaType(media_type.to_owned()));
        }

        Ok(Self {
            media_type: media_type.to_owned(),
            payload: BASE64.encode(bytes),
        })
    }

    /// The image media type, e.g. `image/png`.
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// The full data URL text form.
    #[must_use]
    pub fn as_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.payload)
    }

    /// Decoded size in bytes.
    #[must_use]
    pub fn decoded_len(&self) -> usize {
        // base64 expands 3 bytes to 4 characters; padding rounds up.
        let padding = self.payload.bytes().rev().take_while(|b| *b == b'=').count();
        self.payload.len() / 4 * 3 - padding
    }
}

impl TryFrom<String> for EncodedImage {
    type Error = ImageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let rest = value.strip_prefix("data:").ok_or(ImageError::NotADataUrl)?;
        let (media_type, payload) = rest.split_once(";base64,").ok_or(ImageError::NotADataUrl)?;

        if !media_type.starts_with("image/") {
            return Err(ImageError::UnsupportedMediaType(media_type.to_owned()));
        }

        let decoded = BASE64
            .decode(payload)
            .map_err(|_| ImageError::InvalidBase64)?;

        if decoded.is_empty() {
            return Err(ImageError::Empty);
        }

        if decoded.len() > Self::MAX_BYTES {
            return Err(ImageError::TooLarge {
                max: Self::MAX_BYTES,
            });
        }

        Ok(Self {
            media_type: media_type.to_owned(),
            payload: payload.to_owned(),
        })
    }
}

impl From<EncodedImage> for String {
    fn from(image: EncodedImage) -> Self {
        image.as_data_url()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        let image = EncodedImage::from_bytes("image/png", b"abc").unwrap();
        assert_eq!(image.media_type(), "image/png");
        assert_eq!(image.as_data_url(), "data:image/png;base64,YWJj");
        assert_eq!(image.decoded_len(), 3);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            EncodedImage::from_bytes("image/png", &[]),
            Err(ImageError::Empty)
        ));
    }

    #[test]
    fn test_non_image_media_type_rejected() {
        assert!(matches!(
            EncodedImage::from_bytes("application/pdf", b"abc"),
            Err(ImageError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn test_size_cap() {
        let big = vec![0u8; EncodedImage::MAX_BYTES + 1];
        assert!(matches!(
            EncodedImage::from_bytes("image/jpeg", &big),
            Err(ImageError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_parse_data_url() {
        let image: EncodedImage = "data:image/gif;base64,YWJj".to_owned().try_into().unwrap();
        assert_eq!(image.media_type(), "image/gif");
        assert_eq!(image.decoded_len(), 3);
    }

    #[test]
    fn test_parse_rejects_non_data_url() {
        let result = EncodedImage::try_from("https://example.com/a.png".to_owned());
        assert!(matches!(result, Err(ImageError::NotADataUrl)));
    }

    #[test]
    fn test_parse_rejects_bad_base64() {
        let result = EncodedImage::try_from("data:image/png;base64,!!!".to_owned());
        assert!(matches!(result, Err(ImageError::InvalidBase64)));
    }

    #[test]
    fn test_serde_as_data_url_string() {
        let image = EncodedImage::from_bytes("image/png", b"abc").unwrap();
        let json = serde_json::to_string(&image).unwrap();
        assert_eq!(json, "\"data:image/png;base64,YWJj\"");

        let parsed: EncodedImage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, image);
    }
}
