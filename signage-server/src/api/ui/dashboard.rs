//! Dashboard, playlist and asset listing pages

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use signage_common::db::init::ensure_schema;
use signage_common::db::models::Asset;
use signage_common::time::format_display;
use tracing::error;

use super::layout::{attr, error_page, esc, page};
use crate::db::{list_assets, AssetOrder};
use crate::playlist::{build_playlist, group_assets};
use crate::AppState;

fn date_cell(date: Option<&chrono::NaiveDateTime>) -> String {
    date.map(format_display).unwrap_or_default()
}

fn asset_rows(assets: &[Asset], with_actions: bool) -> String {
    let mut rows = String::new();
    for asset in assets {
        let actions = if with_actions {
            format!(
                r#"<td><a href="/edit_asset/{id}">Edit</a> <a href="/delete_asset/{id}">Delete</a></td>"#,
                id = attr(&asset.asset_id)
            )
        } else {
            String::new()
        };
        rows.push_str(&format!(
            "            <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>{}</tr>\n",
            esc(&asset.name),
            esc(&asset.mimetype),
            esc(&asset.uri),
            date_cell(asset.start_date.as_ref()),
            date_cell(asset.end_date.as_ref()),
            esc(asset.duration.as_deref().unwrap_or("")),
            actions
        ));
    }
    rows
}

fn asset_table(caption: &str, assets: &[Asset], with_actions: bool) -> String {
    if assets.is_empty() {
        return format!("        <h2>{}</h2>\n        <p class=\"empty\">None.</p>\n", esc(caption));
    }

    let action_header = if with_actions { "<th></th>" } else { "" };
    format!(
        r#"        <h2>{caption}</h2>
        <table>
            <tr><th>Name</th><th>Type</th><th>URI</th><th>Start</th><th>End</th><th>Duration</th>{action_header}</tr>
{rows}        </table>
"#,
        caption = esc(caption),
        action_header = action_header,
        rows = asset_rows(assets, with_actions),
    )
}

/// GET /
pub async fn dashboard_page(State(state): State<AppState>) -> Response {
    if let Err(e) = ensure_schema(&state.db).await {
        error!("Database check failed: {}", e);
        return error_page("Database is unavailable.");
    }

    match group_assets(&state.db, state.clock.now()).await {
        Ok(grouped) => {
            let body = format!(
                "{}{}",
                asset_table("Active assets", &grouped.active, true),
                asset_table("Inactive assets", &grouped.inactive, true)
            );
            page("Dashboard", &body).into_response()
        }
        Err(e) => {
            error!("Failed to load assets: {}", e);
            error_page("Failed to load assets.")
        }
    }
}

/// GET /view_playlist
pub async fn view_playlist_page(State(state): State<AppState>) -> Response {
    let playlist = match build_playlist(&state.db, state.clock.now()).await {
        Ok(playlist) => playlist,
        Err(e) => {
            error!("Failed to build playlist: {}", e);
            return error_page("Failed to load playlist.");
        }
    };

    let mut body = String::from("        <h2>Current playlist</h2>\n");
    if playlist.is_empty() {
        body.push_str("        <p class=\"empty\">Nothing is scheduled right now.</p>\n");
    } else {
        body.push_str("        <ol class=\"playlist\">\n");
        for entry in &playlist {
            body.push_str(&format!(
                "            <li><strong>{}</strong> ({}, {}s) {} to {}<br><code>{}</code></li>\n",
                esc(&entry.name),
                esc(&entry.mimetype),
                esc(entry.duration.as_deref().unwrap_or("?")),
                esc(&entry.start_date),
                esc(&entry.end_date),
                esc(&entry.uri)
            ));
        }
        body.push_str("        </ol>\n");
    }

    page("Playlist", &body).into_response()
}

/// GET /view_assets
pub async fn view_assets_page(State(state): State<AppState>) -> Response {
    match list_assets(&state.db, AssetOrder::Name).await {
        Ok(assets) => page("Assets", &asset_table("All assets", &assets, false)).into_response(),
        Err(e) => {
            error!("Failed to load assets: {}", e);
            error_page("Failed to load assets.")
        }
    }
}
