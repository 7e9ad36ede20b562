//! Active-window evaluation
//!
//! An asset plays only while "now" lies strictly inside its window. Both
//! boundary instants are outside the window, and an asset without both
//! dates is never active.

use chrono::NaiveDateTime;

use crate::time::Clock;
use crate::Asset;

/// Is `asset` active at `at_time`?
///
/// ```
/// use chrono::NaiveDate;
/// use signage_common::{is_active, Asset};
///
/// let day = |d, h, m| NaiveDate::from_ymd_opt(2013, 1, d).unwrap().and_hms_opt(h, m, 0).unwrap();
/// let asset = Asset {
///     asset_id: "4c8dbce552edb5812d3a866cfe5f159d".to_string(),
///     name: "WireLoad".to_string(),
///     uri: "http://www.wireload.net".to_string(),
///     start_date: Some(day(16, 0, 0)),
///     end_date: Some(day(19, 23, 59)),
///     duration: Some("5".to_string()),
///     mimetype: "web".to_string(),
/// };
///
/// assert!(is_active(&asset, day(16, 12, 0)));
/// assert!(!is_active(&asset, day(16, 0, 0)));
/// ```
pub fn is_active(asset: &Asset, at_time: NaiveDateTime) -> bool {
    match (asset.start_date, asset.end_date) {
        (Some(start), Some(end)) => start < at_time && at_time < end,
        _ => false,
    }
}

/// Is `asset` active at the clock's current time?
pub fn is_active_now(asset: &Asset, clock: &dyn Clock) -> bool {
    is_active(asset, clock.now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedClock;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn wireload(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Asset {
        Asset {
            asset_id: "4c8dbce552edb5812d3a866cfe5f159d".to_string(),
            name: "WireLoad".to_string(),
            uri: "http://www.wireload.net".to_string(),
            start_date: start,
            end_date: end,
            duration: Some("5".to_string()),
            mimetype: "web".to_string(),
        }
    }

    fn scheduled() -> Asset {
        wireload(Some(at(2013, 1, 16, 0, 0)), Some(at(2013, 1, 19, 23, 59)))
    }

    #[test]
    fn test_active_inside_window() {
        assert!(is_active(&scheduled(), at(2013, 1, 16, 12, 0)));
    }

    #[test]
    fn test_inactive_after_window() {
        assert!(!is_active(&scheduled(), at(2014, 1, 1, 0, 0)));
    }

    #[test]
    fn test_inactive_before_window() {
        assert!(!is_active(&scheduled(), at(2012, 12, 31, 23, 59)));
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        assert!(!is_active(&scheduled(), at(2013, 1, 16, 0, 0)));
        assert!(!is_active(&scheduled(), at(2013, 1, 19, 23, 59)));
    }

    #[test]
    fn test_missing_boundary_is_never_active() {
        let times = [
            at(1970, 1, 1, 0, 0),
            at(2013, 1, 17, 0, 0),
            at(2099, 12, 31, 23, 59),
        ];
        for asset in [
            wireload(None, None),
            wireload(Some(at(2013, 1, 16, 0, 0)), None),
            wireload(None, Some(at(2013, 1, 19, 23, 59))),
        ] {
            for t in times {
                assert!(!is_active(&asset, t), "{:?} active at {}", asset, t);
            }
        }
    }

    #[test]
    fn test_inverted_window_is_never_active() {
        let asset = wireload(Some(at(2013, 1, 19, 0, 0)), Some(at(2013, 1, 16, 0, 0)));
        assert!(!is_active(&asset, at(2013, 1, 17, 0, 0)));
    }

    #[test]
    fn test_is_active_now_uses_clock() {
        let asset = scheduled();
        assert!(is_active_now(&asset, &FixedClock(at(2013, 1, 18, 9, 30))));
        assert!(!is_active_now(&asset, &FixedClock(at(2013, 1, 20, 0, 0))));
    }
}
