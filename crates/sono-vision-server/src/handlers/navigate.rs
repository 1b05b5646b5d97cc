//! `POST /navigate` — probe repositioning guidance.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::Json;

use sono_vision::{decode, ImageSource};

use crate::state::AppState;
use crate::types::{ApiResult, NavigateResponse};

use super::form::ScanForm;

pub async fn navigate(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<NavigateResponse>> {
    let form = ScanForm::read(multipart?, "entity_name").await?;
    let image = decode(ImageSource::Raw(form.image))?;

    let response = state.dispatcher.navigate(&image, &form.label).await?;
    tracing::info!(target_organ = %form.label, chars = response.len(), "Navigation guidance generated");

    Ok(Json(NavigateResponse { response }))
}
