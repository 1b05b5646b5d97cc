//! Multipart form reading shared by the upload endpoints.

use axum::extract::Multipart;

use crate::types::{ApiError, ApiResult};

/// Name of the file field on every upload endpoint.
pub const IMAGE_FIELD: &str = "image";

/// A text label (entity or organ name) plus the uploaded image bytes.
#[derive(Debug)]
pub struct ScanForm {
    pub label: String,
    pub image: Vec<u8>,
}

impl ScanForm {
    /// Read `label_field` and `image` from the form. Unknown fields are skipped.
    pub async fn read(mut multipart: Multipart, label_field: &'static str) -> ApiResult<Self> {
        let mut label = None;
        let mut image = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == label_field {
                label = Some(field.text().await?);
            } else if name == IMAGE_FIELD {
                image = Some(field.bytes().await?.to_vec());
            } else {
                tracing::debug!(field = %name, "Ignoring unexpected form field");
            }
        }

        Ok(Self {
            label: label.ok_or(ApiError::MissingField(label_field))?,
            image: image.ok_or(ApiError::MissingField(IMAGE_FIELD))?,
        })
    }
}
