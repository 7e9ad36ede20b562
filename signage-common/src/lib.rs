//! # Signage Common Library
//!
//! Shared code for the signage content manager:
//! - Asset model and database initialization
//! - Scheduling predicate (active-window check)
//! - Configuration loading and root folder resolution
//! - Clock and date formatting helpers
//! - Content fingerprints used as asset identifiers

pub mod config;
pub mod db;
pub mod error;
pub mod fingerprint;
pub mod schedule;
pub mod time;

pub use db::models::{Asset, MimeFlags};
pub use error::{Error, Result};
pub use schedule::is_active;
pub use time::{Clock, FixedClock, SystemClock};
