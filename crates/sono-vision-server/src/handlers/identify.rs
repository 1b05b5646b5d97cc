//! `POST /identify` and `POST /identify_base64`.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::response::Json;

use sono_vision::{decode, ImageBuffer, ImageSource, VisionResult};

use crate::state::AppState;
use crate::types::{ApiError, ApiResult, IdentifyBase64Request};

use super::form::ScanForm;

const ENTITY_FIELD: &str = "entity_name";

/// Multipart upload: `entity_name` + `image`.
pub async fn identify(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<VisionResult>> {
    let form = ScanForm::read(multipart?, ENTITY_FIELD).await?;
    let image = decode(ImageSource::Raw(form.image))?;
    run(&state, &image, form.label).await
}

/// JSON body with a base64 image.
pub async fn identify_base64(
    State(state): State<Arc<AppState>>,
    body: Result<Json<IdentifyBase64Request>, JsonRejection>,
) -> ApiResult<Json<VisionResult>> {
    let Json(request) = body?;
    let data = request
        .image
        .filter(|data| !data.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Image data is required".to_string()))?;

    let image = decode(ImageSource::Base64(data))?;
    run(&state, &image, request.entity_name).await
}

async fn run(
    state: &AppState,
    image: &ImageBuffer,
    entity: String,
) -> ApiResult<Json<VisionResult>> {
    let found = state.dispatcher.identify(image, &entity).await?;
    tracing::info!(
        entity = %entity,
        found,
        width = image.width(),
        height = image.height(),
        "Identification complete"
    );
    Ok(Json(VisionResult::identification(found, entity)))
}
