#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Distinct filter values derived from the loaded collision dataset.
//!
//! The extracted [`DatasetMetadata`] populates the filter controls and
//! feeds the free-text query parser. Extraction is pure; callers cache
//! the result alongside the dataset (one extraction per process).

use std::collections::{BTreeSet, HashMap};

use collision_report_collision_models::{CollisionRecord, Dataset, Field};
use serde::{Deserialize, Serialize};

/// Vehicle-type choices are limited to the most frequent values to keep
/// typos and one-off entries out of the filter dropdown. Values outside
/// the limit remain in the dataset and are still matchable by the filter
/// engine.
pub const VEHICLE_TYPE_LIMIT: usize = 50;

/// The distinct values available for each filterable field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    /// Distinct borough names, sorted.
    pub boroughs: Vec<String>,
    /// Distinct crash years, sorted.
    pub years: Vec<i32>,
    /// The most frequent vehicle types, sorted.
    pub vehicle_types: Vec<String>,
    /// Distinct contributing factors, sorted.
    pub factors: Vec<String>,
    /// Distinct injury categories, sorted.
    pub injuries: Vec<String>,
}

/// Derives the filter choices from a loaded dataset.
///
/// Each field yields the sorted set of distinct non-null values; a field
/// absent from the dataset yields an empty list. Vehicle types are
/// restricted to the [`VEHICLE_TYPE_LIMIT`] most frequent values before
/// sorting.
#[must_use]
pub fn extract(dataset: &Dataset) -> DatasetMetadata {
    DatasetMetadata {
        boroughs: distinct_strings(dataset, Field::Borough, |r| r.borough.as_deref()),
        years: distinct_years(dataset),
        vehicle_types: top_vehicle_types(dataset),
        factors: distinct_strings(dataset, Field::ContributingFactor, |r| {
            r.contributing_factor.as_deref()
        }),
        injuries: distinct_strings(dataset, Field::PersonInjury, |r| r.person_injury.as_deref()),
    }
}

fn distinct_strings(
    dataset: &Dataset,
    field: Field,
    value: impl Fn(&CollisionRecord) -> Option<&str>,
) -> Vec<String> {
    if !dataset.has_field(field) {
        return Vec::new();
    }
    let values: BTreeSet<&str> = dataset.records().iter().filter_map(value).collect();
    values.into_iter().map(str::to_string).collect()
}

fn distinct_years(dataset: &Dataset) -> Vec<i32> {
    if !dataset.has_field(Field::CrashDate) {
        return Vec::new();
    }
    let years: BTreeSet<i32> = dataset
        .records()
        .iter()
        .filter_map(CollisionRecord::crash_year)
        .collect();
    years.into_iter().collect()
}

/// The most frequent vehicle types, ties broken by name, then sorted.
fn top_vehicle_types(dataset: &Dataset) -> Vec<String> {
    if !dataset.has_field(Field::VehicleType) {
        return Vec::new();
    }

    let mut counts: HashMap<&str, u64> = HashMap::new();
    for record in dataset.records() {
        if let Some(vehicle) = record.vehicle_type.as_deref() {
            *counts.entry(vehicle).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(VEHICLE_TYPE_LIMIT);

    let mut vehicles: Vec<String> = ranked.into_iter().map(|(v, _)| v.to_string()).collect();
    vehicles.sort();
    vehicles
}
