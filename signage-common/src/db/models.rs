//! Database models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Duration stored for assets whose length is set by the media itself
pub const DURATION_NOT_APPLICABLE: &str = "N/A";

/// Traits of an asset read from its free-text mimetype
///
/// The mimetype column is free text ("image", "image/png", "video/webm",
/// "web", ...). Each flag is its own substring test, so one mimetype can
/// set several of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MimeFlags {
    /// Web pages cannot be uploaded
    pub web: bool,
    /// Remote images are checked with a GET
    pub image: bool,
    /// Videos default to a "N/A" duration
    pub video: bool,
}

impl MimeFlags {
    pub fn of(mimetype: &str) -> Self {
        Self {
            web: mimetype.contains("web"),
            image: mimetype.contains("image"),
            video: mimetype.contains("video"),
        }
    }
}

/// One row of the `assets` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub asset_id: String,
    pub name: String,
    pub uri: String,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub duration: Option<String>,
    pub mimetype: String,
}

impl Asset {
    pub fn mime_flags(&self) -> MimeFlags {
        MimeFlags::of(&self.mimetype)
    }
}

/// Mutable columns written by a full-row edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUpdate {
    pub name: String,
    pub uri: String,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub duration: Option<String>,
    pub mimetype: String,
}

impl From<Asset> for AssetUpdate {
    fn from(asset: Asset) -> Self {
        Self {
            name: asset.name,
            uri: asset.uri,
            start_date: asset.start_date,
            end_date: asset.end_date,
            duration: asset.duration,
            mimetype: asset.mimetype,
        }
    }
}
