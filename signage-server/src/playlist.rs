//! Playlist derivation
//!
//! The playlist is the subset of assets active at a given instant, kept in
//! store order (by name). Nothing is cached; every call reads the store.

use chrono::NaiveDateTime;
use serde::Serialize;
use signage_common::db::models::Asset;
use signage_common::time::format_display;
use signage_common::{is_active, Result};
use sqlx::SqlitePool;

use crate::db::{list_assets, AssetOrder};

/// An active asset with its window rendered for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistEntry {
    pub asset_id: String,
    pub name: String,
    pub uri: String,
    pub start_date: String,
    pub end_date: String,
    pub duration: Option<String>,
    pub mimetype: String,
}

impl PlaylistEntry {
    /// `None` unless both dates are present
    fn from_asset(asset: Asset) -> Option<Self> {
        let start = asset.start_date.as_ref().map(format_display)?;
        let end = asset.end_date.as_ref().map(format_display)?;
        Some(Self {
            asset_id: asset.asset_id,
            name: asset.name,
            uri: asset.uri,
            start_date: start,
            end_date: end,
            duration: asset.duration,
            mimetype: asset.mimetype,
        })
    }
}

/// Filter `assets` down to those active at `now`, preserving order
pub fn playlist_from(assets: Vec<Asset>, now: NaiveDateTime) -> Vec<PlaylistEntry> {
    assets
        .into_iter()
        .filter(|asset| is_active(asset, now))
        .filter_map(PlaylistEntry::from_asset)
        .collect()
}

/// Read the store and build the playlist for `now`
pub async fn build_playlist(pool: &SqlitePool, now: NaiveDateTime) -> Result<Vec<PlaylistEntry>> {
    let assets = list_assets(pool, AssetOrder::Name).await?;
    let playlist = playlist_from(assets, now);
    tracing::debug!("Playlist at {} has {} entries", now, playlist.len());
    Ok(playlist)
}

/// An asset as returned by `GET /api/assets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetStatus {
    #[serde(flatten)]
    pub asset: Asset,
    pub is_active: bool,
}

/// Flag every asset with whether it is active at `now`
pub fn annotate(assets: Vec<Asset>, now: NaiveDateTime) -> Vec<AssetStatus> {
    assets
        .into_iter()
        .map(|asset| {
            let is_active = is_active(&asset, now);
            AssetStatus { asset, is_active }
        })
        .collect()
}

/// Assets split by whether they are active, each half in store order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedAssets {
    pub active: Vec<Asset>,
    pub inactive: Vec<Asset>,
}

/// Read the store and split it for the dashboard
pub async fn group_assets(pool: &SqlitePool, now: NaiveDateTime) -> Result<GroupedAssets> {
    let assets = list_assets(pool, AssetOrder::Name).await?;
    let (active, inactive): (Vec<Asset>, Vec<Asset>) =
        assets.into_iter().partition(|asset| is_active(asset, now));
    Ok(GroupedAssets { active, inactive })
}
