//! `POST /describe` — diagnostic description of a scan.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::Json;

use sono_vision::{decode, ImageSource};

use crate::state::AppState;
use crate::types::{ApiResult, DescribeResponse};

use super::form::ScanForm;

pub async fn describe(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<DescribeResponse>> {
    let form = ScanForm::read(multipart?, "target_organ").await?;
    let image = decode(ImageSource::Raw(form.image))?;

    let description = state.dispatcher.diagnose(&image, &form.label).await?;
    tracing::info!(target_organ = %form.label, chars = description.len(), "Diagnosis generated");

    Ok(Json(DescribeResponse { description }))
}
