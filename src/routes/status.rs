use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::error::AppResult;
use crate::models::status::{StatusCheck, StatusCheckCreate};

const STATUS_LIST_LIMIT: i64 = 1000;

/// GET /api/ — liveness message.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Virtual Try-On API is running!" }))
}

/// POST /api/status
pub async fn create_status_check(
    State(state): State<AppState>,
    payload: Result<Json<StatusCheckCreate>, JsonRejection>,
) -> AppResult<Json<StatusCheck>> {
    let Json(input) = payload?;
    let check = StatusCheck::new(input.client_name);
    state.store.insert_status_check(&check).await?;
    Ok(Json(check))
}

/// GET /api/status
pub async fn list_status_checks(State(state): State<AppState>) -> AppResult<Json<Vec<StatusCheck>>> {
    Ok(Json(state.store.list_status_checks(STATUS_LIST_LIMIT).await?))
}
