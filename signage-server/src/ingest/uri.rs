//! Remote URI validation

use reqwest::Url;

/// Accept only absolute http/https URLs that name a host
///
/// ```
/// use signage_server::ingest::validate_uri;
///
/// assert!(validate_uri("http://wireload.net/logo.png"));
/// assert!(validate_uri("https://wireload.net/logo.png"));
/// assert!(!validate_uri("ftp://example.com"));
/// assert!(!validate_uri("http://"));
/// assert!(!validate_uri("hello"));
/// ```
pub fn validate_uri(uri: &str) -> bool {
    match Url::parse(uri) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}
