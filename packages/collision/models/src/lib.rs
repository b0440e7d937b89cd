#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Collision record, dataset, and filter types.
//!
//! This crate defines the canonical in-memory representation of the NYC
//! collision dataset shared across the entire collision-report system:
//! one [`CollisionRecord`] per crash, a [`Dataset`] holding the loaded
//! records plus which source columns were actually present, and the
//! [`FilterSpec`] / [`ParsedQueryFilters`] pair that drives report
//! generation.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The filterable and derivable columns of the collision dataset.
///
/// Used to track which columns the remote source actually provided, so
/// downstream features can degrade to a "no data" result instead of
/// failing when a column is missing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Field {
    /// Unique collision identifier.
    CollisionId,
    /// Borough name (may be absent for unattributed crashes).
    Borough,
    /// Calendar date of the crash.
    CrashDate,
    /// Time-of-day string (`"HH:MM"` or `"HH:MM:SS"`).
    CrashTime,
    /// WGS84 latitude.
    Latitude,
    /// WGS84 longitude.
    Longitude,
    /// Person injury outcome category.
    PersonInjury,
    /// Primary vehicle type (free text with long-tail noise).
    VehicleType,
    /// Primary contributing factor.
    ContributingFactor,
}

impl Field {
    /// Returns the column header name used by the remote source.
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::CollisionId => "collision_id",
            Self::Borough => "borough",
            Self::CrashDate => "crash_date",
            Self::CrashTime => "crash_time",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::PersonInjury => "person_injury",
            Self::VehicleType => "vehicle_type_code1",
            Self::ContributingFactor => "contributing_factor_vehicle_1",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CollisionId,
            Self::Borough,
            Self::CrashDate,
            Self::CrashTime,
            Self::Latitude,
            Self::Longitude,
            Self::PersonInjury,
            Self::VehicleType,
            Self::ContributingFactor,
        ]
    }
}

/// One collision event.
///
/// Records are immutable once loaded; the only mutation is the type
/// coercion (string→date, string→float) the loader applies uniformly.
/// Every field except the id may be absent in the source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionRecord {
    /// Unique collision identifier.
    pub collision_id: String,
    /// Borough name.
    pub borough: Option<String>,
    /// Calendar date of the crash.
    pub crash_date: Option<NaiveDate>,
    /// Time-of-day string as reported by the source.
    pub crash_time: Option<String>,
    /// Latitude, reduced precision.
    pub latitude: Option<f32>,
    /// Longitude, reduced precision.
    pub longitude: Option<f32>,
    /// Person injury outcome category.
    pub person_injury: Option<String>,
    /// Primary vehicle type.
    pub vehicle_type: Option<String>,
    /// Primary contributing factor.
    pub contributing_factor: Option<String>,
}

impl CollisionRecord {
    /// Returns the calendar year of the crash, if the date is known.
    #[must_use]
    pub fn crash_year(&self) -> Option<i32> {
        self.crash_date.map(|d| d.year())
    }

    /// Returns the day of week of the crash, if the date is known.
    #[must_use]
    pub fn day_of_week(&self) -> Option<Weekday> {
        self.crash_date.map(|d| d.weekday())
    }

    /// Parses the crash time to an hour of day (0-23).
    ///
    /// Accepts `"HH:MM:SS"` and `"HH:MM"`. Returns `None` for missing or
    /// unparsable times.
    #[must_use]
    pub fn crash_hour(&self) -> Option<u32> {
        let raw = self.crash_time.as_deref()?;
        let time = NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .ok()?;
        Some(chrono::Timelike::hour(&time))
    }

    /// Returns `(latitude, longitude)` when both coordinates are present.
    #[must_use]
    pub const fn coordinates(&self) -> Option<(f32, f32)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// The loaded collision dataset.
///
/// An ordered collection of records plus the set of source columns that
/// were present at load time. Created once per process and treated as
/// read-only shared state thereafter (no refresh, no invalidation).
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<CollisionRecord>,
    columns: BTreeSet<Field>,
}

impl Dataset {
    /// Creates a dataset from loaded records and the set of present
    /// source columns.
    #[must_use]
    pub const fn new(records: Vec<CollisionRecord>, columns: BTreeSet<Field>) -> Self {
        Self { records, columns }
    }

    /// Returns the loaded records in source order.
    #[must_use]
    pub fn records(&self) -> &[CollisionRecord] {
        &self.records
    }

    /// Returns whether the given source column was present at load time.
    #[must_use]
    pub fn has_field(&self, field: Field) -> bool {
        self.columns.contains(&field)
    }

    /// Returns the set of present source columns.
    #[must_use]
    pub const fn columns(&self) -> &BTreeSet<Field> {
        &self.columns
    }

    /// Returns the number of loaded records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Structured filters recovered from a free-text query.
///
/// Only borough, year, and injury values are derivable from free text;
/// vehicle types and contributing factors are not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQueryFilters {
    /// Borough names matched in the query.
    pub boroughs: Vec<String>,
    /// Years matched in the query.
    pub years: Vec<i32>,
    /// Injury categories matched via the keyword table.
    pub injuries: Vec<String>,
}

impl ParsedQueryFilters {
    /// Returns whether no slot received any value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boroughs.is_empty() && self.years.is_empty() && self.injuries.is_empty()
    }
}

/// A set of independent membership predicates, one slot per filterable
/// field.
///
/// An empty slot imposes no constraint; a non-empty slot restricts rows
/// to those whose field value is a member of the slot. All non-empty
/// slots are conjoined by the filter engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Allowed borough names.
    pub boroughs: Vec<String>,
    /// Allowed crash years.
    pub years: Vec<i32>,
    /// Allowed vehicle types.
    pub vehicle_types: Vec<String>,
    /// Allowed contributing factors.
    pub factors: Vec<String>,
    /// Allowed injury categories.
    pub injuries: Vec<String>,
}

impl FilterSpec {
    /// Returns whether every slot is empty (no constraint at all).
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.boroughs.is_empty()
            && self.years.is_empty()
            && self.vehicle_types.is_empty()
            && self.factors.is_empty()
            && self.injuries.is_empty()
    }

    /// Merges parsed query filters into this spec.
    ///
    /// A parsed slot that received at least one match replaces the
    /// corresponding explicit slot; slots the parser found nothing for
    /// are left untouched. `None` leaves the spec unchanged.
    #[must_use]
    pub fn with_parsed(mut self, parsed: Option<ParsedQueryFilters>) -> Self {
        if let Some(parsed) = parsed {
            if !parsed.boroughs.is_empty() {
                self.boroughs = parsed.boroughs;
            }
            if !parsed.years.is_empty() {
                self.years = parsed.years;
            }
            if !parsed.injuries.is_empty() {
                self.injuries = parsed.injuries;
            }
        }
        self
    }
}
