//! Asset table queries
//!
//! Every function takes the pool explicitly and commits on its own; there
//! are no multi-statement transactions.

use chrono::NaiveDateTime;
use serde::Serialize;
use signage_common::db::models::{Asset, AssetUpdate};
use signage_common::time::{format_db, parse_db};
use signage_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_ASSET: &str = r#"
    SELECT asset_id, name, uri,
           CAST(start_date AS TEXT) AS start_date,
           CAST(end_date AS TEXT) AS end_date,
           duration, mimetype
    FROM assets
"#;

/// Sort order for asset listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetOrder {
    #[default]
    Name,
    StartDate,
    EndDate,
}

impl AssetOrder {
    fn column(self) -> &'static str {
        match self {
            AssetOrder::Name => "name",
            AssetOrder::StartDate => "start_date",
            AssetOrder::EndDate => "end_date",
        }
    }
}

/// Name and id pair for pickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetName {
    pub asset_id: String,
    pub name: String,
}

fn asset_from_row(row: &SqliteRow) -> Asset {
    let text = |column: &str| -> String {
        row.get::<Option<String>, _>(column).unwrap_or_default()
    };
    let start: Option<String> = row.get("start_date");
    let end: Option<String> = row.get("end_date");
    let duration: Option<String> = row.get("duration");

    Asset {
        asset_id: text("asset_id"),
        name: text("name"),
        uri: text("uri"),
        start_date: parse_db(start.as_deref()),
        end_date: parse_db(end.as_deref()),
        duration: duration.filter(|d| !d.is_empty()),
        mimetype: text("mimetype"),
    }
}

/// All assets in the given order
pub async fn list_assets(pool: &SqlitePool, order: AssetOrder) -> Result<Vec<Asset>> {
    let sql = format!("{} ORDER BY {}", SELECT_ASSET, order.column());
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    Ok(rows.iter().map(asset_from_row).collect())
}

/// One asset by id
pub async fn get_asset(pool: &SqlitePool, asset_id: &str) -> Result<Option<Asset>> {
    let sql = format!("{} WHERE asset_id = ?", SELECT_ASSET);
    let row = sqlx::query(&sql)
        .bind(asset_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(asset_from_row))
}

/// Name/id pairs ordered by name
pub async fn list_names(pool: &SqlitePool) -> Result<Vec<AssetName>> {
    let rows = sqlx::query("SELECT name, asset_id FROM assets ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| AssetName {
            asset_id: row.get::<Option<String>, _>("asset_id").unwrap_or_default(),
            name: row.get::<Option<String>, _>("name").unwrap_or_default(),
        })
        .collect())
}

/// Insert a new row
///
/// The table has no uniqueness constraint; inserting an id that already
/// exists adds a second row with the same id.
pub async fn insert_asset(pool: &SqlitePool, asset: &Asset) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO assets (asset_id, name, uri, start_date, end_date, duration, mimetype)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&asset.asset_id)
    .bind(&asset.name)
    .bind(&asset.uri)
    .bind(asset.start_date.as_ref().map(format_db))
    .bind(asset.end_date.as_ref().map(format_db))
    .bind(&asset.duration)
    .bind(&asset.mimetype)
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrite every mutable column of the row(s) with `asset_id`
///
/// Returns the number of rows changed.
pub async fn update_asset(pool: &SqlitePool, asset_id: &str, update: &AssetUpdate) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE assets
        SET name = ?, uri = ?, start_date = ?, end_date = ?, duration = ?, mimetype = ?
        WHERE asset_id = ?
        "#,
    )
    .bind(&update.name)
    .bind(&update.uri)
    .bind(update.start_date.as_ref().map(format_db))
    .bind(update.end_date.as_ref().map(format_db))
    .bind(&update.duration)
    .bind(&update.mimetype)
    .bind(asset_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Set only the active window and duration
pub async fn update_schedule(
    pool: &SqlitePool,
    asset_id: &str,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
    duration: Option<&str>,
) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE assets SET start_date = ?, end_date = ?, duration = ? WHERE asset_id = ?",
    )
    .bind(format_db(&start_date))
    .bind(format_db(&end_date))
    .bind(duration)
    .bind(asset_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Delete by id. Deleting a missing id is a no-op returning 0.
pub async fn delete_asset(pool: &SqlitePool, asset_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM assets WHERE asset_id = ?")
        .bind(asset_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
