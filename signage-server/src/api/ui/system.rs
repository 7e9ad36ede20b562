//! System info, splash and settings pages

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use signage_common::config::Settings;
use signage_common::db::init::ensure_schema;
use std::fs;
use std::net::{IpAddr, UdpSocket};
use std::path::Path;
use std::time::Duration;
use sysinfo::Disks;
use tracing::{debug, error};

use super::layout::{error_page, esc, page};
use crate::AppState;

/// Number of viewer log lines shown
pub const LOG_TAIL_LINES: usize = 20;

const NO_VIEWER_LOG: &str = "(no viewer log present -- is only the signage server running?)";

/// Host status shown on the system info page
#[derive(Debug, Clone)]
pub struct SystemInfo {
    /// Last lines of the viewer log, or a placeholder line
    pub viewer_log: Vec<String>,

    /// 15-minute load average
    pub load_average: Option<f64>,

    /// Time since boot
    pub uptime: Option<Duration>,

    /// Bytes available to unprivileged users on the root filesystem
    pub free_space: Option<u64>,
}

impl SystemInfo {
    /// Detect system information
    ///
    /// **Platform support:**
    /// - Linux: reads /proc/loadavg and /proc/uptime
    /// - elsewhere: load and uptime are reported as unknown
    /// - free space comes from the disk list on every platform
    pub fn detect(viewer_log: &Path) -> Self {
        Self {
            viewer_log: Self::tail_log(viewer_log, LOG_TAIL_LINES),
            load_average: Self::detect_load_average(),
            uptime: Self::detect_uptime(),
            free_space: Self::detect_free_space(Path::new("/")),
        }
    }

    fn detect_free_space(path: &Path) -> Option<u64> {
        let disks = Disks::new_with_refreshed_list();
        available_at(
            disks
                .list()
                .iter()
                .map(|disk| (disk.mount_point(), disk.available_space())),
            path,
        )
    }

    fn tail_log(path: &Path, lines: usize) -> Vec<String> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let all: Vec<&str> = content.lines().collect();
                let start = all.len().saturating_sub(lines);
                all[start..].iter().map(|l| l.to_string()).collect()
            }
            Err(e) => {
                debug!("Viewer log {} unreadable: {}", path.display(), e);
                vec![NO_VIEWER_LOG.to_string()]
            }
        }
    }

    fn detect_load_average() -> Option<f64> {
        #[cfg(target_os = "linux")]
        {
            let content = fs::read_to_string("/proc/loadavg").ok()?;
            parse_load_average(&content)
        }

        #[cfg(not(target_os = "linux"))]
        {
            None
        }
    }

    fn detect_uptime() -> Option<Duration> {
        #[cfg(target_os = "linux")]
        {
            let content = fs::read_to_string("/proc/uptime").ok()?;
            parse_uptime(&content)
        }

        #[cfg(not(target_os = "linux"))]
        {
            None
        }
    }
}

/// Third field of /proc/loadavg, rounded to two places
fn parse_load_average(content: &str) -> Option<f64> {
    let fifteen: f64 = content.split_whitespace().nth(2)?.parse().ok()?;
    Some((fifteen * 100.0).round() / 100.0)
}

/// First field of /proc/uptime, whole seconds
fn parse_uptime(content: &str) -> Option<Duration> {
    let seconds: f64 = content.split_whitespace().next()?.parse().ok()?;
    Some(Duration::from_secs(seconds as u64))
}

/// Available bytes of the deepest mount point containing `path`
fn available_at<'a>(mounts: impl Iterator<Item = (&'a Path, u64)>, path: &Path) -> Option<u64> {
    mounts
        .filter(|(mount, _)| path.starts_with(mount))
        .max_by_key(|(mount, _)| mount.components().count())
        .map(|(_, available)| available)
}

/// Whole binary units, rounded down: `512B`, `3K`, `14G`
pub fn format_size(bytes: u64) -> String {
    const UNITS: [(u64, &str); 5] = [
        (1 << 50, "P"),
        (1 << 40, "T"),
        (1 << 30, "G"),
        (1 << 20, "M"),
        (1 << 10, "K"),
    ];

    UNITS
        .iter()
        .find(|(factor, _)| bytes >= *factor)
        .map(|(factor, suffix)| format!("{}{}", bytes / factor, suffix))
        .unwrap_or_else(|| format!("{}B", bytes))
}

/// `3 days, 4:05:06`
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    match days {
        0 => format!("{}:{:02}:{:02}", hours, minutes, seconds),
        1 => format!("1 day, {}:{:02}:{:02}", hours, minutes, seconds),
        n => format!("{} days, {}:{:02}:{:02}", n, hours, minutes, seconds),
    }
}

/// GET /system_info
pub async fn system_info_page(State(state): State<AppState>) -> Html<String> {
    let info = SystemInfo::detect(&state.settings.viewer_log);

    let log: String = info.viewer_log.iter().map(|l| format!("{}\n", esc(l))).collect();
    let load = info
        .load_average
        .map(|l| format!("{:.2}", l))
        .unwrap_or_else(|| "unknown".to_string());
    let uptime = info
        .uptime
        .map(format_uptime)
        .unwrap_or_else(|| "unknown".to_string());
    let free_space = info
        .free_space
        .map(format_size)
        .unwrap_or_else(|| "unknown".to_string());

    let body = format!(
        r#"        <h2>System info</h2>
        <dl>
            <dt>Load average (15 min)</dt><dd>{load}</dd>
            <dt>Free space</dt><dd>{free_space}</dd>
            <dt>Uptime</dt><dd>{uptime}</dd>
        </dl>
        <h3>Viewer log</h3>
        <pre class="log">{log}</pre>
"#,
        load = load,
        free_space = free_space,
        uptime = esc(&uptime),
        log = log,
    );
    page("System info", &body)
}

/// Address other machines can reach us on
///
/// A wildcard listen address is resolved to the interface holding the
/// default route. No packet is sent.
fn reachable_ip(listen_ip: &str) -> Option<IpAddr> {
    let configured: IpAddr = listen_ip.parse().ok()?;
    if !configured.is_unspecified() {
        return Some(configured);
    }

    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}

/// URL shown on the splash page
pub fn splash_url(settings: &Settings) -> Option<String> {
    reachable_ip(&settings.listen_ip).map(|ip| match ip {
        IpAddr::V4(v4) => format!("http://{}:{}", v4, settings.listen_port),
        IpAddr::V6(v6) => format!("http://[{}]:{}", v6, settings.listen_port),
    })
}

/// GET /splash_page
pub async fn splash_page(State(state): State<AppState>) -> Response {
    if let Err(e) = ensure_schema(&state.db).await {
        error!("Database check failed: {}", e);
        return error_page("Database is unavailable.");
    }

    let line = match splash_url(&state.settings) {
        Some(url) => format!(
            r#"To manage content, point a browser at <a href="{0}">{0}</a>"#,
            esc(&url)
        ),
        None => "Unable to lookup IP.".to_string(),
    };

    let body = format!(
        "        <section class=\"splash\">\n            <h2>Signage is running</h2>\n            <p>{}</p>\n        </section>\n",
        line
    );
    page("Welcome", &body).into_response()
}

/// GET /settings
pub async fn settings_page(State(state): State<AppState>) -> Html<String> {
    let s = &state.settings;
    let timeout = s
        .fetch_timeout
        .map(|t| format!("{}s", t.as_secs()))
        .unwrap_or_else(|| "none".to_string());

    let rows = [
        ("Root folder", s.root_folder.display().to_string()),
        ("Asset folder", s.asset_folder.display().to_string()),
        ("Database", s.database_path.display().to_string()),
        ("Listen address", s.listen_addr()),
        ("Static folder", s.static_folder.display().to_string()),
        ("Viewer log", s.viewer_log.display().to_string()),
        ("Fetch timeout", timeout),
        ("Log level", s.log_level.clone()),
    ];

    let table: String = rows
        .iter()
        .map(|(label, value)| {
            format!("            <tr><th>{}</th><td>{}</td></tr>\n", label, esc(value))
        })
        .collect();

    let body = format!(
        "        <h2>Settings</h2>\n        <table>\n{}        </table>\n        <p>Settings are read at startup from the command line, environment and config file.</p>\n",
        table
    );
    page("Settings", &body)
}
