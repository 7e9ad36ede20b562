//! Page shell shared by every HTML view

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Escape text for element content
pub fn esc(value: &str) -> String {
    html_escape::encode_text(value).into_owned()
}

/// Escape text for a double-quoted attribute
pub fn attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// Wrap `body` (already escaped) in the common page layout
pub fn page(title: &str, body: &str) -> Html<String> {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Signage - {title}</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header>
        <h1>Signage</h1>
        <nav>
            <a href="/">Dashboard</a>
            <a href="/view_playlist">Playlist</a>
            <a href="/view_assets">Assets</a>
            <a href="/add_asset">Add asset</a>
            <a href="/schedule_asset">Schedule</a>
            <a href="/system_info">System info</a>
            <a href="/settings">Settings</a>
        </nav>
    </header>
    <main>
{body}
    </main>
    <footer>signage-server v{version} ({git_hash})</footer>
</body>
</html>
"#,
        title = esc(title),
        body = body,
        version = version,
        git_hash = git_hash,
    ))
}

/// Outcome page used by the form flows
pub fn message_page(header: &str, message: &str) -> Html<String> {
    let body = format!(
        r#"        <section class="message">
            <h2>{}</h2>
            <p>{}</p>
            <p><a href="/">Back to dashboard</a></p>
        </section>"#,
        esc(header),
        esc(message)
    );
    page(header, &body)
}

/// Message page served with a 500 status
pub fn error_page(message: &str) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, message_page("Ops!", message)).into_response()
}
