//! UI Routes - server-rendered HTML pages
//!
//! # Structure
//! - **Layout** (`layout`): page shell, message page, escaping helpers
//! - **Dashboard** (`dashboard`): active/inactive split, playlist, asset list
//! - **Editor** (`editor`): add, schedule and edit forms
//! - **System** (`system`): system info, splash page, settings

use axum::{routing::get, Router};

use crate::AppState;

mod dashboard;
mod editor;
pub mod layout;
pub mod system;

pub use layout::{error_page, message_page};

use dashboard::{dashboard_page, view_assets_page, view_playlist_page};
use editor::{add_asset_page, edit_asset_page, schedule_asset_page};
use system::{settings_page, splash_page, system_info_page};

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/view_playlist", get(view_playlist_page))
        .route("/view_assets", get(view_assets_page))
        .route("/add_asset", get(add_asset_page))
        .route("/schedule_asset", get(schedule_asset_page))
        .route("/edit_asset/:asset_id", get(edit_asset_page))
        .route("/system_info", get(system_info_page))
        .route("/splash_page", get(splash_page))
        .route("/settings", get(settings_page))
}
