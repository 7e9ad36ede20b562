//! signage-server library - digital signage content manager
//!
//! Registers media assets (images, videos, web pages), schedules their
//! active windows and serves the currently active set as a playlist.
//! Exposed as a library so integration tests can drive the router directly.

pub mod api;
pub mod db;
pub mod error;
pub mod ingest;
pub mod playlist;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use signage_common::config::Settings;
use signage_common::time::Clock;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::ingest::{AssetStorage, RemoteProbe};

/// Largest accepted request body (uploaded videos included)
pub const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Asset store
    pub db: SqlitePool,
    /// Folder holding uploaded asset files
    pub storage: AssetStorage,
    /// Reachability check for URI assets
    pub probe: Arc<dyn RemoteProbe>,
    /// Source of "now" for schedule evaluation
    pub clock: Arc<dyn Clock>,
    /// Resolved runtime settings
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        settings: Settings,
        probe: Arc<dyn RemoteProbe>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db,
            storage: AssetStorage::new(settings.asset_folder.clone()),
            probe,
            clock,
            settings: Arc::new(settings),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.settings.static_folder);

    Router::new()
        // JSON API
        .merge(api::asset_routes())
        // Legacy form posts
        .merge(api::form_routes())
        // HTML views
        .merge(api::ui_routes())
        .merge(api::health_routes())
        .nest_service("/static", static_files)
        .fallback(api::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
