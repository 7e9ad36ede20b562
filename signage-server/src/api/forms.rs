//! Legacy HTML form flows
//!
//! Each handler answers with a message page. Failures never surface as
//! error statuses here; the page header says "Ops!" instead.

use axum::{
    extract::{Path, State},
    response::Html,
    routing::{get, post},
    Router,
};
use signage_common::db::models::{Asset, AssetUpdate};
use signage_common::time::parse_display;
use tracing::{error, info, warn};

use super::extract::SubmittedForm;
use super::ui::message_page;
use crate::db;
use crate::error::ApiError;
use crate::ingest::{resolve_source, validate_uri, IngestError, ValidationError};
use crate::AppState;

const FAILED: &str = "Ops!";

fn failure(message: impl AsRef<str>) -> Html<String> {
    message_page(FAILED, message.as_ref())
}

/// Form wording differs slightly from the API for two of the rules
fn add_failure_message(err: &IngestError) -> String {
    match err {
        IngestError::Rejected(ValidationError::WebUpload) => {
            "Invalid combination. Can't upload web resource.".to_string()
        }
        IngestError::Rejected(ValidationError::Unreachable) => "Unable to fetch file.".to_string(),
        IngestError::Rejected(ValidationError::MissingFields) => "Invalid input.".to_string(),
        IngestError::Rejected(other) => other.to_string(),
        IngestError::Store(_) => "Failed to add asset.".to_string(),
    }
}

/// POST /process_asset
///
/// Registers an asset without a schedule. Dates and duration are left
/// empty whatever the mimetype; they are set later from the schedule form.
pub async fn process_asset(
    State(state): State<AppState>,
    form: Result<SubmittedForm, ApiError>,
) -> Html<String> {
    let form = match form {
        Ok(form) => form,
        Err(e) => return failure(e.to_string()),
    };

    let (Some(name), Some(mimetype)) = (form.get("name"), form.get("mimetype")) else {
        return failure("Invalid input.");
    };
    let uri = form.get("uri");
    if uri.is_none() && form.file.is_none() {
        return failure("Invalid input.");
    }

    let source = match resolve_source(
        &name,
        &mimetype,
        uri.as_deref(),
        form.file.as_ref(),
        state.probe.as_ref(),
        &state.storage,
    )
    .await
    {
        Ok(source) => source,
        Err(e) => {
            warn!(code = e.code(), "Rejected asset {}: {}", name, e);
            return failure(add_failure_message(&e));
        }
    };

    let asset = Asset {
        asset_id: source.asset_id,
        name,
        uri: source.uri,
        start_date: None,
        end_date: None,
        duration: None,
        mimetype,
    };

    if let Err(e) = db::insert_asset(&state.db, &asset).await {
        error!("Failed to insert asset {}: {}", asset.asset_id, e);
        return failure("Failed to add asset.");
    }

    info!("Added asset {} ({})", asset.asset_id, asset.name);
    message_page(
        "Yay!",
        &format!("Added asset ({}) to the database.", asset.asset_id),
    )
}

/// POST /process_schedule
///
/// Sets the active window and duration of an existing asset. The supplied
/// duration is stored for every mimetype, videos included.
pub async fn process_schedule(
    State(state): State<AppState>,
    form: Result<SubmittedForm, ApiError>,
) -> Html<String> {
    const FAILED_SCHEDULE: &str = "Failed to process schedule.";

    let Ok(form) = form else {
        return failure(FAILED_SCHEDULE);
    };
    let (Some(asset_id), Some(start), Some(end)) =
        (form.get("asset"), form.get("start"), form.get("end"))
    else {
        return failure(FAILED_SCHEDULE);
    };

    let (start_date, end_date) = match (parse_display(&start), parse_display(&end)) {
        (Ok(start), Ok(end)) => (start, end),
        (Err(e), _) | (_, Err(e)) => {
            warn!("Schedule for {} rejected: {}", asset_id, e);
            return failure(e.to_string());
        }
    };
    let duration = form.get("duration");

    match db::update_schedule(&state.db, &asset_id, start_date, end_date, duration.as_deref()).await {
        Ok(0) => {
            warn!("Schedule for unknown asset {}", asset_id);
            failure(FAILED_SCHEDULE)
        }
        Ok(_) => {
            info!("Scheduled asset {} from {} to {}", asset_id, start_date, end_date);
            message_page("Yes!", "Successfully scheduled asset.")
        }
        Err(e) => {
            error!("Failed to schedule asset {}: {}", asset_id, e);
            failure(FAILED_SCHEDULE)
        }
    }
}

/// POST /update_asset
///
/// Full-row edit from the edit form. Dates that do not parse are cleared.
pub async fn update_asset(
    State(state): State<AppState>,
    form: Result<SubmittedForm, ApiError>,
) -> Html<String> {
    const FAILED_UPDATE: &str = "Failed to update asset.";

    let Ok(form) = form else {
        return failure(FAILED_UPDATE);
    };
    let (Some(asset_id), Some(name), Some(uri), Some(mimetype)) = (
        form.get("asset_id"),
        form.get("name"),
        form.get("uri"),
        form.get("mimetype"),
    ) else {
        return failure(FAILED_UPDATE);
    };

    if !validate_uri(&uri) && !state.storage.holds(&uri) {
        return failure("Invalid URL. Failed to update asset.");
    }

    let update = AssetUpdate {
        name,
        uri,
        start_date: form.get("start").and_then(|s| parse_display(&s).ok()),
        end_date: form.get("end").and_then(|s| parse_display(&s).ok()),
        duration: form.get("duration"),
        mimetype,
    };

    match db::update_asset(&state.db, &asset_id, &update).await {
        Ok(0) => {
            warn!("Update for unknown asset {}", asset_id);
            failure(FAILED_UPDATE)
        }
        Ok(_) => {
            info!("Updated asset {}", asset_id);
            message_page("Yes!", "Successfully updated asset.")
        }
        Err(e) => {
            error!("Failed to update asset {}: {}", asset_id, e);
            failure(FAILED_UPDATE)
        }
    }
}

/// GET /delete_asset/:asset_id
///
/// Deleting an id that does not exist still reports success.
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Html<String> {
    match db::delete_asset(&state.db, &asset_id).await {
        Ok(rows) => {
            info!("Deleted asset {} ({} rows)", asset_id, rows);
            // Only uploads have a file; a failed removal does not undo the delete
            if let Err(e) = state.storage.remove(&asset_id).await {
                warn!("Could not remove file for asset {}: {}", asset_id, e);
            }
            message_page("Success!", "Deleted asset.")
        }
        Err(e) => {
            error!("Failed to delete asset {}: {}", asset_id, e);
            failure("Failed to delete asset.")
        }
    }
}

/// Build legacy form routes
pub fn form_routes() -> Router<AppState> {
    Router::new()
        .route("/process_asset", post(process_asset))
        .route("/process_schedule", post(process_schedule))
        .route("/update_asset", post(update_asset))
        .route("/delete_asset/:asset_id", get(delete_asset))
}
