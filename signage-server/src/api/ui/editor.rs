//! Add, schedule and edit forms

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use signage_common::time::format_display;
use tracing::{error, warn};

use super::layout::{attr, error_page, esc, page};
use crate::db::{get_asset, list_names};
use crate::AppState;

const MIMETYPE_OPTIONS: [&str; 3] = ["image", "video", "web"];

fn mimetype_select(selected: &str) -> String {
    let mut html = String::from(r#"<select name="mimetype">"#);
    for option in MIMETYPE_OPTIONS {
        let marker = if option == selected { " selected" } else { "" };
        html.push_str(&format!(r#"<option value="{0}"{1}>{0}</option>"#, option, marker));
    }
    // Free-text mimetypes from older rows are kept as-is
    if !selected.is_empty() && !MIMETYPE_OPTIONS.contains(&selected) {
        html.push_str(&format!(
            r#"<option value="{}" selected>{}</option>"#,
            attr(selected),
            esc(selected)
        ));
    }
    html.push_str("</select>");
    html
}

/// GET /add_asset
pub async fn add_asset_page() -> Html<String> {
    let body = format!(
        r#"        <h2>Add asset</h2>
        <form action="/process_asset" method="post" enctype="multipart/form-data">
            <label>Name <input type="text" name="name"></label>
            <label>URL <input type="text" name="uri" placeholder="http://"></label>
            <label>or file <input type="file" name="file_upload"></label>
            <label>Type {}</label>
            <button type="submit">Add</button>
        </form>
"#,
        mimetype_select("image")
    );
    page("Add asset", &body)
}

/// GET /schedule_asset
pub async fn schedule_asset_page(State(state): State<AppState>) -> Response {
    let names = match list_names(&state.db).await {
        Ok(names) => names,
        Err(e) => {
            error!("Failed to list assets: {}", e);
            return error_page("Failed to load assets.");
        }
    };

    let options: String = names
        .iter()
        .map(|n| format!(r#"<option value="{}">{}</option>"#, attr(&n.asset_id), esc(&n.name)))
        .collect();

    let body = format!(
        r#"        <h2>Schedule asset</h2>
        <form action="/process_schedule" method="post">
            <label>Asset <select name="asset">{options}</select></label>
            <label>Start <input type="text" name="start" placeholder="YYYY-MM-DD @ HH:MM"></label>
            <label>End <input type="text" name="end" placeholder="YYYY-MM-DD @ HH:MM"></label>
            <label>Duration (seconds) <input type="text" name="duration"></label>
            <button type="submit">Schedule</button>
        </form>
"#,
        options = options
    );
    page("Schedule asset", &body).into_response()
}

/// GET /edit_asset/:asset_id
pub async fn edit_asset_page(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Response {
    let asset = match get_asset(&state.db, &asset_id).await {
        Ok(Some(asset)) => asset,
        Ok(None) => {
            warn!("Edit requested for unknown asset {}", asset_id);
            return error_page("Asset not found.");
        }
        Err(e) => {
            error!("Failed to load asset {}: {}", asset_id, e);
            return error_page("Failed to load asset.");
        }
    };

    let date = |d: Option<&chrono::NaiveDateTime>| d.map(format_display).unwrap_or_default();

    let body = format!(
        r#"        <h2>Edit asset</h2>
        <form action="/update_asset" method="post">
            <input type="hidden" name="asset_id" value="{id}">
            <label>Name <input type="text" name="name" value="{name}"></label>
            <label>URL <input type="text" name="uri" value="{uri}"></label>
            <label>Type {mimetype}</label>
            <label>Start <input type="text" name="start" value="{start}" placeholder="YYYY-MM-DD @ HH:MM"></label>
            <label>End <input type="text" name="end" value="{end}" placeholder="YYYY-MM-DD @ HH:MM"></label>
            <label>Duration (seconds) <input type="text" name="duration" value="{duration}"></label>
            <button type="submit">Save</button>
        </form>
"#,
        id = attr(&asset.asset_id),
        name = attr(&asset.name),
        uri = attr(&asset.uri),
        mimetype = mimetype_select(&asset.mimetype),
        start = attr(&date(asset.start_date.as_ref())),
        end = attr(&date(asset.end_date.as_ref())),
        duration = attr(asset.duration.as_deref().unwrap_or("")),
    );
    page("Edit asset", &body).into_response()
}
