//! Content fingerprints used as asset identifiers
//!
//! Ids are MD5 hex digests, so existing asset folders and databases keep
//! resolving to the same ids. Identical content always yields the same id.

/// Id for a remote asset: digest of the name immediately followed by the URI
pub fn remote_asset_id(name: &str, uri: &str) -> String {
    let mut context = md5::Context::new();
    context.consume(name.as_bytes());
    context.consume(uri.as_bytes());
    format!("{:x}", context.compute())
}

/// Id for an uploaded asset: digest of the raw bytes
pub fn upload_asset_id(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}
