//! Shared helpers for signage-server integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use signage_common::config::Settings;
use signage_common::db::init::ensure_schema;
use signage_common::time::FixedClock;
use signage_server::ingest::{ProbeMethod, RemoteProbe};
use signage_server::{build_router, AppState};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Probe answering every request with one status
pub struct CannedProbe {
    status: u16,
    pub calls: Mutex<Vec<(String, ProbeMethod)>>,
}

impl CannedProbe {
    pub fn answering(status: u16) -> Self {
        Self {
            status,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RemoteProbe for CannedProbe {
    async fn status(&self, uri: &str, method: ProbeMethod) -> Result<u16, String> {
        self.calls.lock().unwrap().push((uri.to_string(), method));
        Ok(self.status)
    }
}

pub fn day(d: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2013, 1, d)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

/// Router over an in-memory database with a temporary asset folder
pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
    pub probe: Arc<CannedProbe>,
    pub asset_folder: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    /// Clock pinned at 2013-01-17 12:00, remote URIs answer `status`
    pub async fn new(status: u16) -> Self {
        Self::at(day(17, 12, 0), status).await
    }

    pub async fn at(now: NaiveDateTime, status: u16) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let asset_folder = dir.path().join("assets");
        std::fs::create_dir_all(&asset_folder).unwrap();

        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        ensure_schema(&db).await.unwrap();

        let settings = Settings {
            root_folder: dir.path().to_path_buf(),
            asset_folder: asset_folder.clone(),
            database_path: dir.path().join("signage.db"),
            listen_ip: "127.0.0.1".to_string(),
            listen_port: 8080,
            static_folder: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
            viewer_log: dir.path().join("viewer.log"),
            fetch_timeout: Some(Duration::from_secs(5)),
            log_level: "info".to_string(),
        };

        let probe = Arc::new(CannedProbe::answering(status));
        let state = AppState::new(db.clone(), settings, probe.clone(), Arc::new(FixedClock(now)));

        Self {
            router: build_router(state),
            db,
            probe,
            asset_folder,
            _dir: dir,
        }
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// POST an urlencoded form
pub fn post_form(uri: &str, pairs: &[(&str, &str)]) -> Request<Body> {
    let body: String = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

/// POST a multipart form with an optional `file_upload` part
pub fn post_multipart(uri: &str, pairs: &[(&str, &str)], file: Option<&[u8]>) -> Request<Body> {
    let boundary = "signage-test-boundary";
    let mut body = Vec::new();
    for (name, value) in pairs {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                boundary, name, value
            )
            .as_bytes(),
        );
    }
    if let Some(bytes) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file_upload\"; filename=\"upload.bin\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                boundary
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

/// POST a JSON body
pub fn post_json(uri: &str, value: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(value.to_string()))
        .unwrap()
}

pub async fn body_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn encode(value: &str) -> String {
    let mut out = String::new();
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
