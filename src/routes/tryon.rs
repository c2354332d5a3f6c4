use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use crate::app_state::AppState;
use crate::error::AppResult;
use crate::models::tryon::{GenerateResponse, ImageResponse, TryOnRecord, TryOnRequest};
use crate::services::tryon::DEFAULT_LIST_LIMIT;

/// POST /api/tryon/generate — run a try-on end to end.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<TryOnRequest>, JsonRejection>,
) -> AppResult<Json<GenerateResponse>> {
    let Json(request) = payload?;
    let record = state.tryon.submit(request).await?;
    Ok(Json(record.into()))
}

/// GET /api/tryon/{id}
pub async fn get_tryon(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<TryOnRecord>> {
    Ok(Json(state.tryon.get(&id).await?))
}

/// GET /api/tryon/{id}/base64 — the stored image reference.
pub async fn get_tryon_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ImageResponse>> {
    let artifact = state.tryon.get_artifact(&id).await?;
    Ok(Json(ImageResponse {
        success: true,
        image_base64: artifact.reference,
        id: artifact.id,
    }))
}

/// GET /api/tryons — newest first.
pub async fn list_tryons(State(state): State<AppState>) -> AppResult<Json<Vec<TryOnRecord>>> {
    Ok(Json(state.tryon.list_all(DEFAULT_LIST_LIMIT).await?))
}
