#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! The filter engine.
//!
//! Reduces the loaded dataset to the rows satisfying a [`FilterSpec`]:
//! every non-empty slot is a membership predicate, all slots are
//! conjoined, and a slot whose column is absent from the dataset is
//! skipped rather than erroring. Pure — the dataset is never mutated;
//! the result borrows the matching rows.

use collision_report_collision_models::{CollisionRecord, Dataset, Field, FilterSpec};

/// The subset of dataset rows satisfying a filter spec.
///
/// Transient: recomputed on every report generation, never persisted.
#[derive(Debug)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    records: Vec<&'a CollisionRecord>,
}

impl<'a> FilteredView<'a> {
    /// Returns the matching records in dataset order.
    #[must_use]
    pub fn records(&self) -> &[&'a CollisionRecord] {
        &self.records
    }

    /// Returns whether the given source column was present at load time.
    #[must_use]
    pub fn has_field(&self, field: Field) -> bool {
        self.dataset.has_field(field)
    }

    /// Returns the number of matching records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether no record matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Applies a filter spec to the dataset, returning the matching rows.
#[must_use]
pub fn apply<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> FilteredView<'a> {
    let records = dataset
        .records()
        .iter()
        .filter(|record| matches(dataset, spec, record))
        .collect();
    FilteredView { dataset, records }
}

fn matches(dataset: &Dataset, spec: &FilterSpec, record: &CollisionRecord) -> bool {
    slot_allows(
        dataset,
        Field::Borough,
        &spec.boroughs,
        record.borough.as_deref(),
    ) && year_allows(dataset, &spec.years, record)
        && slot_allows(
            dataset,
            Field::VehicleType,
            &spec.vehicle_types,
            record.vehicle_type.as_deref(),
        )
        && slot_allows(
            dataset,
            Field::ContributingFactor,
            &spec.factors,
            record.contributing_factor.as_deref(),
        )
        && slot_allows(
            dataset,
            Field::PersonInjury,
            &spec.injuries,
            record.person_injury.as_deref(),
        )
}

/// An empty slot or an absent column imposes no restriction; otherwise
/// the row's value must be a member of the slot. A null value in a
/// constrained field excludes the row.
fn slot_allows(dataset: &Dataset, field: Field, allowed: &[String], value: Option<&str>) -> bool {
    if allowed.is_empty() || !dataset.has_field(field) {
        return true;
    }
    value.is_some_and(|v| allowed.iter().any(|a| a == v))
}

fn year_allows(dataset: &Dataset, allowed: &[i32], record: &CollisionRecord) -> bool {
    if allowed.is_empty() || !dataset.has_field(Field::CrashDate) {
        return true;
    }
    record.crash_year().is_some_and(|y| allowed.contains(&y))
}
