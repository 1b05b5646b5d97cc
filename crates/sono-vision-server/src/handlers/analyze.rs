//! `POST /analyze` — one upload through the whole scan flow.
//!
//! Identify the target organ; if it is visible, diagnose it and move to
//! chat, otherwise generate navigation guidance and wait for a new image.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::Json;

use sono_vision::{decode, ImageSource, Stage, StageEvent};

use crate::state::AppState;
use crate::types::{AnalyzeResponse, ApiResult};

use super::form::ScanForm;

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let form = ScanForm::read(multipart?, "target_organ").await?;
    let image = decode(ImageSource::Raw(form.image))?;
    let organ = form.label;

    let stage = Stage::AwaitingImage.advance(StageEvent::ImageReceived)?;
    let found = state.dispatcher.identify(&image, &organ).await?;
    let stage = stage.advance(StageEvent::Identified { found })?;
    tracing::info!(target_organ = %organ, found, %stage, "Scan identified");

    let response = if found {
        let description = state.dispatcher.diagnose(&image, &organ).await?;
        AnalyzeResponse {
            entity: organ,
            found,
            stage: stage.advance(StageEvent::Described)?,
            description: Some(description),
            guidance: None,
        }
    } else {
        let guidance = state.dispatcher.navigate(&image, &organ).await?;
        AnalyzeResponse {
            entity: organ,
            found,
            stage: stage.advance(StageEvent::Guided)?,
            description: None,
            guidance: Some(guidance),
        }
    };

    Ok(Json(response))
}
