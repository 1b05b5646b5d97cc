//! JSON request bodies.

use serde::Deserialize;

/// Body of `POST /identify_base64`.
#[derive(Debug, Deserialize)]
pub struct IdentifyBase64Request {
    pub entity_name: String,
    /// Base64 image, optionally prefixed with a data-URL header.
    #[serde(default)]
    pub image: Option<String>,
}
