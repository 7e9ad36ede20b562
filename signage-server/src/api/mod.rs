//! HTTP handlers for signage-server

pub mod assets;
pub mod extract;
pub mod forms;
pub mod health;
pub mod ui;

use axum::{http::StatusCode, response::IntoResponse};

pub use assets::asset_routes;
pub use extract::SubmittedForm;
pub use forms::form_routes;
pub use health::health_routes;
pub use ui::ui_routes;

/// Fallback for unknown paths
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Sorry, this page does not exist!")
}
