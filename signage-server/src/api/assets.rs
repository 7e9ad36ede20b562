//! JSON asset API
//!
//! Failures come back as 500 `{"error": ...}`; successful writes redirect
//! to the dashboard.

use axum::{
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use signage_common::db::models::AssetUpdate;
use tracing::info;

use super::extract::SubmittedForm;
use crate::db::{self, AssetOrder};
use crate::error::{ApiError, ApiResult};
use crate::ingest::prepare_asset;
use crate::playlist::{annotate, build_playlist, AssetStatus, PlaylistEntry};
use crate::AppState;

/// GET /api/assets
///
/// Every asset, ordered by name, flagged with whether it is active now.
pub async fn list_assets(State(state): State<AppState>) -> ApiResult<Json<Vec<AssetStatus>>> {
    let assets = db::list_assets(&state.db, AssetOrder::Name).await?;
    Ok(Json(annotate(assets, state.clock.now())))
}

/// POST /api/assets
pub async fn create_asset(
    State(state): State<AppState>,
    form: SubmittedForm,
) -> ApiResult<Redirect> {
    let asset = prepare_asset(&form.submission(), state.probe.as_ref(), &state.storage).await?;
    db::insert_asset(&state.db, &asset).await?;

    info!("Added asset {} ({})", asset.asset_id, asset.name);
    Ok(Redirect::to("/"))
}

/// POST /api/assets/:asset_id
///
/// Runs the same checks as creation. The id derived from the submitted
/// content is discarded; the row named in the path is overwritten.
pub async fn update_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
    form: SubmittedForm,
) -> ApiResult<Redirect> {
    let asset = prepare_asset(&form.submission(), state.probe.as_ref(), &state.storage).await?;

    let changed = db::update_asset(&state.db, &asset_id, &AssetUpdate::from(asset)).await?;
    if changed == 0 {
        return Err(ApiError::NotFound(asset_id));
    }

    info!("Updated asset {}", asset_id);
    Ok(Redirect::to("/"))
}

/// GET /api/playlist
pub async fn get_playlist(State(state): State<AppState>) -> ApiResult<Json<Vec<PlaylistEntry>>> {
    let playlist = build_playlist(&state.db, state.clock.now()).await?;
    Ok(Json(playlist))
}

/// Build asset API routes
pub fn asset_routes() -> Router<AppState> {
    Router::new()
        .route("/api/assets", get(list_assets).post(create_asset))
        .route("/api/assets/:asset_id", post(update_asset))
        .route("/api/playlist", get(get_playlist))
}
