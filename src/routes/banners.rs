use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::{
    models::banner::{Banner, UpdateBanner},
    AppState,
};

/// GET /banners — every configured banner, each read from its own actor.
pub async fn list_banners(
    State(state): State<AppState>,
) -> Result<Json<Vec<Banner>>, (StatusCode, Json<Value>)> {
    let mut banners = Vec::with_capacity(state.banners.ids().len());
    for id in state.banners.ids() {
        let handle = state.banners.get(id).await.map_err(|e| e.to_response())?;
        let banner = handle.get().await.map_err(|e| e.to_response())?;
        banners.push(banner);
    }
    Ok(Json(banners))
}

/// GET /banner/{id}
pub async fn get_banner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Banner>, (StatusCode, Json<Value>)> {
    let handle = state.banners.get(&id).await.map_err(|e| e.to_response())?;
    handle
        .get()
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}

/// POST /banner/{id} — set the message of an empty banner; 409 while one is showing.
pub async fn update_banner(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBanner>,
) -> Result<Json<Banner>, (StatusCode, Json<Value>)> {
    let handle = state.banners.get(&id).await.map_err(|e| e.to_response())?;
    handle
        .update(body)
        .await
        .map(Json)
        .map_err(|e| e.to_response())
}
