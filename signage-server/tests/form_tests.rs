//! Integration tests for the legacy form flows and HTML views
//!
//! Form handlers always answer 200 with a message page; the header tells
//! success from failure.

mod common;

use axum::http::StatusCode;
use common::*;
use signage_common::db::models::Asset;
use signage_common::fingerprint::{remote_asset_id, upload_asset_id};
use signage_server::db::{get_asset, insert_asset, list_assets, AssetOrder};
use tower::util::ServiceExt; // for `oneshot` method

fn unscheduled(id: &str, name: &str, mimetype: &str) -> Asset {
    Asset {
        asset_id: id.to_string(),
        name: name.to_string(),
        uri: format!("http://example.com/{}", id),
        start_date: None,
        end_date: None,
        duration: None,
        mimetype: mimetype.to_string(),
    }
}

async fn page_of(app: &TestApp, request: axum::http::Request<axum::body::Body>) -> (StatusCode, String) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_text(response.into_body()).await)
}

// =============================================================================
// /process_asset
// =============================================================================

#[tokio::test]
async fn test_process_asset_adds_unscheduled_asset() {
    let app = TestApp::new(200).await;

    let (status, html) = page_of(
        &app,
        post_multipart(
            "/process_asset",
            &[("name", "WireLoad"), ("uri", "http://www.wireload.net"), ("mimetype", "video")],
            None,
        ),
    )
    .await;

    let id = remote_asset_id("WireLoad", "http://www.wireload.net");
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Yay!"));
    assert!(html.contains(&format!("Added asset ({}) to the database.", id)));

    let stored = get_asset(&app.db, &id).await.unwrap().unwrap();
    assert_eq!(stored.start_date, None);
    assert_eq!(stored.end_date, None);
    assert_eq!(stored.duration, None);
}

#[tokio::test]
async fn test_process_asset_upload() {
    let app = TestApp::new(200).await;
    let bytes: &[u8] = b"uploaded video";

    let (_, html) = page_of(
        &app,
        post_multipart("/process_asset", &[("name", "Clip"), ("mimetype", "video")], Some(bytes)),
    )
    .await;
    assert!(html.contains("Yay!"));

    let id = upload_asset_id(bytes);
    assert!(app.asset_folder.join(&id).is_file());
}

#[tokio::test]
async fn test_process_asset_failures() {
    let cases: Vec<(Vec<(&str, &str)>, Option<&[u8]>, u16, &str)> = vec![
        (vec![("name", "Only name")], None, 200, "Invalid input."),
        (
            vec![("name", "Page"), ("mimetype", "web")],
            Some(&b"<html>"[..]),
            200,
            "Invalid combination. Can't upload web resource.",
        ),
        (
            vec![("name", "Both"), ("uri", "http://example.com/a.png"), ("mimetype", "image")],
            Some(&b"png"[..]),
            200,
            "Invalid combination. Can't select both URI and a file.",
        ),
        (
            vec![("name", "Bad"), ("uri", "hello"), ("mimetype", "image")],
            None,
            200,
            "Invalid URL. Failed to add asset.",
        ),
        (
            vec![("name", "Gone"), ("uri", "http://example.com/gone"), ("mimetype", "web")],
            None,
            404,
            "Unable to fetch file.",
        ),
    ];

    for (fields, file, probe_status, expected) in cases {
        let app = TestApp::new(probe_status).await;
        let (status, html) = page_of(&app, post_multipart("/process_asset", &fields, file)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Ops!"), "{}", expected);
        assert!(html.contains(expected), "expected {:?} in page", expected);
        assert!(list_assets(&app.db, AssetOrder::Name).await.unwrap().is_empty());
    }
}

// =============================================================================
// /process_schedule
// =============================================================================

#[tokio::test]
async fn test_process_schedule_sets_window_and_duration() {
    let app = TestApp::new(200).await;
    insert_asset(&app.db, &unscheduled("clip", "Clip", "video")).await.unwrap();

    let (_, html) = page_of(
        &app,
        post_form(
            "/process_schedule",
            &[
                ("asset", "clip"),
                ("start", "2013-01-16 @ 00:00"),
                ("end", "2013-01-19 @ 23:59"),
                ("duration", "30"),
            ],
        ),
    )
    .await;
    assert!(html.contains("Successfully scheduled asset."));

    let stored = get_asset(&app.db, "clip").await.unwrap().unwrap();
    assert_eq!(stored.start_date, Some(day(16, 0, 0)));
    assert_eq!(stored.end_date, Some(day(19, 23, 59)));
    // Supplied duration is stored even for video
    assert_eq!(stored.duration.as_deref(), Some("30"));
}

#[tokio::test]
async fn test_process_schedule_requires_fields() {
    let app = TestApp::new(200).await;
    insert_asset(&app.db, &unscheduled("clip", "Clip", "video")).await.unwrap();

    let (_, html) = page_of(
        &app,
        post_form("/process_schedule", &[("asset", "clip"), ("start", "2013-01-16 @ 00:00")]),
    )
    .await;
    assert!(html.contains("Failed to process schedule."));
    assert_eq!(get_asset(&app.db, "clip").await.unwrap().unwrap().start_date, None);
}

#[tokio::test]
async fn test_process_schedule_rejects_bad_date() {
    let app = TestApp::new(200).await;
    insert_asset(&app.db, &unscheduled("clip", "Clip", "video")).await.unwrap();

    let (_, html) = page_of(
        &app,
        post_form(
            "/process_schedule",
            &[("asset", "clip"), ("start", "2013-01-16T00:00:00"), ("end", "2013-01-19 @ 23:59")],
        ),
    )
    .await;
    assert!(html.contains("Ops!"));
    assert!(html.contains("Invalid date"));
}

// =============================================================================
// /update_asset
// =============================================================================

#[tokio::test]
async fn test_update_asset_overwrites_row() {
    let app = TestApp::new(200).await;
    insert_asset(&app.db, &unscheduled("logo", "Logo", "image")).await.unwrap();

    let (_, html) = page_of(
        &app,
        post_form(
            "/update_asset",
            &[
                ("asset_id", "logo"),
                ("name", "Big logo"),
                ("uri", "http://example.com/big.png"),
                ("mimetype", "image"),
                ("duration", "15"),
                ("start", "2013-01-16 @ 08:00"),
                ("end", "not a date"),
            ],
        ),
    )
    .await;
    assert!(html.contains("Successfully updated asset."));

    let stored = get_asset(&app.db, "logo").await.unwrap().unwrap();
    assert_eq!(stored.name, "Big logo");
    assert_eq!(stored.duration.as_deref(), Some("15"));
    assert_eq!(stored.start_date, Some(day(16, 8, 0)));
    assert_eq!(stored.end_date, None);
}

#[tokio::test]
async fn test_update_asset_accepts_local_upload_path() {
    let app = TestApp::new(200).await;
    let local = app.asset_folder.join("abc123");
    let local = local.to_string_lossy().into_owned();
    let mut asset = unscheduled("abc123", "Upload", "video");
    asset.uri = local.clone();
    insert_asset(&app.db, &asset).await.unwrap();

    let (_, html) = page_of(
        &app,
        post_form(
            "/update_asset",
            &[("asset_id", "abc123"), ("name", "Renamed"), ("uri", local.as_str()), ("mimetype", "video")],
        ),
    )
    .await;
    assert!(html.contains("Successfully updated asset."));
}

#[tokio::test]
async fn test_update_asset_rejects_bad_uri() {
    let app = TestApp::new(200).await;
    insert_asset(&app.db, &unscheduled("logo", "Logo", "image")).await.unwrap();

    let (_, html) = page_of(
        &app,
        post_form(
            "/update_asset",
            &[("asset_id", "logo"), ("name", "Logo"), ("uri", "/etc/passwd"), ("mimetype", "image")],
        ),
    )
    .await;
    assert!(html.contains("Invalid URL. Failed to update asset."));
    assert_eq!(get_asset(&app.db, "logo").await.unwrap().unwrap().uri, "http://example.com/logo");
}

#[tokio::test]
async fn test_update_asset_missing_fields() {
    let app = TestApp::new(200).await;
    let (_, html) = page_of(&app, post_form("/update_asset", &[("asset_id", "logo")])).await;
    assert!(html.contains("Failed to update asset."));
}

// =============================================================================
// /delete_asset
// =============================================================================

#[tokio::test]
async fn test_delete_asset_removes_row_and_file() {
    let app = TestApp::new(200).await;
    let bytes: &[u8] = b"uploaded image";
    page_of(
        &app,
        post_multipart("/process_asset", &[("name", "Logo"), ("mimetype", "image")], Some(bytes)),
    )
    .await;
    let id = upload_asset_id(bytes);
    assert!(app.asset_folder.join(&id).is_file());

    let (status, html) = page_of(&app, get(&format!("/delete_asset/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Deleted asset."));
    assert!(get_asset(&app.db, &id).await.unwrap().is_none());
    assert!(!app.asset_folder.join(&id).exists());
}

#[tokio::test]
async fn test_delete_missing_asset_does_not_fail() {
    let app = TestApp::new(200).await;
    let (status, html) = page_of(&app, get("/delete_asset/nothing-here")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Success!"));
}

// =============================================================================
// HTML views
// =============================================================================

#[tokio::test]
async fn test_dashboard_groups_assets() {
    let app = TestApp::new(200).await;
    let mut active = unscheduled("on", "Showing", "web");
    active.start_date = Some(day(16, 0, 0));
    active.end_date = Some(day(19, 0, 0));
    insert_asset(&app.db, &active).await.unwrap();
    insert_asset(&app.db, &unscheduled("off", "Waiting", "web")).await.unwrap();

    let (status, html) = page_of(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    let active_at = html.find("Active assets").unwrap();
    let inactive_at = html.find("Inactive assets").unwrap();
    let showing_at = html.find("Showing").unwrap();
    let waiting_at = html.find("Waiting").unwrap();
    assert!(active_at < showing_at && showing_at < inactive_at);
    assert!(inactive_at < waiting_at);
}

#[tokio::test]
async fn test_view_pages_render() {
    let app = TestApp::new(200).await;
    insert_asset(&app.db, &unscheduled("logo", "<Logo>", "image")).await.unwrap();

    for path in [
        "/view_playlist",
        "/view_assets",
        "/add_asset",
        "/schedule_asset",
        "/edit_asset/logo",
        "/system_info",
        "/splash_page",
        "/settings",
    ] {
        let (status, html) = page_of(&app, get(path)).await;
        assert_eq!(status, StatusCode::OK, "{}", path);
        assert!(html.contains("<!DOCTYPE html>"), "{}", path);
        assert!(!html.contains("<Logo>"), "{} must escape asset names", path);
    }
}

#[tokio::test]
async fn test_edit_missing_asset_is_error_page() {
    let app = TestApp::new(200).await;
    let (status, html) = page_of(&app, get("/edit_asset/missing")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(html.contains("Ops!"));
}

#[tokio::test]
async fn test_edit_page_prefills_display_dates() {
    let app = TestApp::new(200).await;
    let mut asset = unscheduled("logo", "Logo", "image");
    asset.start_date = Some(day(16, 8, 5));
    insert_asset(&app.db, &asset).await.unwrap();

    let (_, html) = page_of(&app, get("/edit_asset/logo")).await;
    assert!(html.contains("2013-01-16 @ 08:05"));
}

#[tokio::test]
async fn test_system_info_shows_viewer_log_placeholder() {
    let app = TestApp::new(200).await;
    let (_, html) = page_of(&app, get("/system_info")).await;
    assert!(html.contains("no viewer log present"));
    assert!(html.contains("Free space"));
}

#[tokio::test]
async fn test_splash_page_shows_listen_url() {
    let app = TestApp::new(200).await;
    let (_, html) = page_of(&app, get("/splash_page")).await;
    assert!(html.contains("http://127.0.0.1:8080"));
}
