//! Image normalization for outbound requests
//!
//! Every upload, whatever its container format, is decoded and re-encoded as
//! PNG before it is sent to the vision service.

pub mod encoder;
pub mod mime;

pub use encoder::encode;
pub use mime::detect_image_mime;

use base64::Engine as _;

/// MIME type of the canonical transport format.
pub const CANONICAL_MIME: &str = "image/png";

/// An uploaded image held for the duration of one action.
///
/// Never mutated after [`encode`] builds it.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    original: Vec<u8>,
    source_mime: Option<&'static str>,
    encoded: Vec<u8>,
    width: u32,
    height: u32,
}

impl ImageAsset {
    pub(crate) fn new(
        original: Vec<u8>,
        source_mime: Option<&'static str>,
        encoded: Vec<u8>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            original,
            source_mime,
            encoded,
            width,
            height,
        }
    }

    /// Bytes exactly as uploaded.
    pub fn original(&self) -> &[u8] {
        &self.original
    }

    /// Sniffed MIME type of the upload, if recognised.
    pub fn source_mime(&self) -> Option<&'static str> {
        self.source_mime
    }

    /// Canonical PNG bytes.
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Base64 of the canonical bytes, as carried in annotate requests.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.encoded)
    }
}
