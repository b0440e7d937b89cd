#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Free-text query parsing.
//!
//! Maps search input like `"Manhattan 2023 cyclist"` to structured
//! filters by case-insensitive substring matching against the known
//! borough names and years, plus a fixed keyword table for injury
//! categories. Deliberately not a tokenizing parser: no negation, no
//! quantifiers, no disambiguation of overlapping matches — substring
//! semantics only, so behavior stays reproducible.

use collision_report_collision_models::ParsedQueryFilters;
use collision_report_metadata::DatasetMetadata;

/// Keyword to injury-category mapping. A matched keyword contributes the
/// mapped values that actually exist in the dataset's injury list.
pub const INJURY_KEYWORDS: &[(&str, &[&str])] = &[
    ("pedestrian", &["PEDESTRIAN"]),
    ("cyclist", &["BICYCLIST"]),
    ("motorist", &["PASSENGER", "DRIVER"]),
    ("killed", &["KILLED"]),
    ("injured", &["INJURED"]),
];

/// Parses free-text search input into structured filters.
///
/// Returns `None` for empty/whitespace input and when no slot received
/// any value — the caller should then fall back to its explicit filter
/// selections unchanged.
#[must_use]
pub fn parse(text: &str, metadata: &DatasetMetadata) -> Option<ParsedQueryFilters> {
    if text.trim().is_empty() {
        return None;
    }

    let lower = text.to_lowercase();
    let mut parsed = ParsedQueryFilters::default();

    for borough in &metadata.boroughs {
        if lower.contains(&borough.to_lowercase()) {
            parsed.boroughs.push(borough.clone());
        }
    }

    for &year in &metadata.years {
        if lower.contains(&year.to_string()) {
            parsed.years.push(year);
        }
    }

    for (keyword, values) in INJURY_KEYWORDS {
        if lower.contains(keyword) {
            for value in *values {
                if metadata.injuries.iter().any(|injury| injury == value) {
                    parsed.injuries.push((*value).to_string());
                }
            }
        }
    }

    if parsed.is_empty() { None } else { Some(parsed) }
}
