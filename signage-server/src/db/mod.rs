//! Database access layer for signage-server
//!
//! Schema creation lives in `signage_common::db::init`; this module holds
//! the queries against the assets table.

pub mod assets;

pub use assets::{
    delete_asset, get_asset, insert_asset, list_assets, list_names, update_asset,
    update_schedule, AssetName, AssetOrder,
};
