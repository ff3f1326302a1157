//! Settings editor REST API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct SettingResponse {
    pub section: String,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSetting {
    pub value: String,
}

/// GET /api/settings/{section}/{key}
pub async fn get_setting(
    Path((section, key)): Path<(String, String)>,
    State(state): State<AppState>,
) -> AppResult<Json<SettingResponse>> {
    let value = state.settings.get(&section, &key).await?;
    Ok(Json(SettingResponse {
        section,
        key,
        value,
    }))
}

/// PUT /api/settings/{section}/{key}
pub async fn put_setting(
    Path((section, key)): Path<(String, String)>,
    State(state): State<AppState>,
    Json(body): Json<UpdateSetting>,
) -> AppResult<Json<SettingResponse>> {
    state.settings.set(&section, &key, &body.value).await?;
    Ok(Json(SettingResponse {
        section,
        key,
        value: body.value,
    }))
}

/// DELETE /api/settings/{section}/{key}
pub async fn delete_setting(
    Path((section, key)): Path<(String, String)>,
    State(state): State<AppState>,
) -> AppResult<StatusCode> {
    state.settings.delete(&section, &key).await?;
    Ok(StatusCode::NO_CONTENT)
}
