//! Shared parsing utilities for the collision data source.
//!
//! Date and coordinate coercion applied uniformly at load time.
//! Unparsable values become `None` rather than raising.

use chrono::{NaiveDate, NaiveDateTime};

/// Parses a crash date string into a calendar date.
///
/// Accepts Socrata ISO 8601 datetimes (with optional fractional seconds),
/// plain ISO dates, and US-style `MM/DD/YYYY` dates.
#[must_use]
pub fn parse_crash_date(s: &str) -> Option<NaiveDate> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return Some(date);
    }
    None
}

/// Parses lat/lng from optional string fields into reduced-precision
/// coordinates. Returns `None` if either is missing, unparseable, or zero
/// (the NYC feed reports unknown locations as `0, 0`).
#[must_use]
pub fn parse_lat_lng_str(lat: Option<&String>, lng: Option<&String>) -> Option<(f32, f32)> {
    let latitude = lat?.parse::<f32>().ok()?;
    let longitude = lng?.parse::<f32>().ok()?;
    if latitude == 0.0 || longitude == 0.0 {
        return None;
    }
    Some((latitude, longitude))
}
