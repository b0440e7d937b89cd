#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! API request and response types for the collision report server.
//!
//! These types are serialized to JSON for the REST API. They are kept
//! separate from the pipeline types so the API contract can evolve
//! independently.

use collision_report_collision_models::FilterSpec;
use collision_report_report_models::Report;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/report`: the explicit filter selections plus the
/// optional free-text search. Every field defaults to unconstrained.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    /// Selected borough names.
    #[serde(default)]
    pub boroughs: Vec<String>,
    /// Selected crash years.
    #[serde(default)]
    pub years: Vec<i32>,
    /// Selected vehicle types.
    #[serde(default)]
    pub vehicle_types: Vec<String>,
    /// Selected contributing factors.
    #[serde(default)]
    pub factors: Vec<String>,
    /// Selected injury categories.
    #[serde(default)]
    pub injuries: Vec<String>,
    /// Free-text search keywords.
    #[serde(default)]
    pub search: Option<String>,
}

impl ReportRequest {
    /// Converts the explicit selections into a [`FilterSpec`], before any
    /// parsed-query merge.
    #[must_use]
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            boroughs: self.boroughs.clone(),
            years: self.years.clone(),
            vehicle_types: self.vehicle_types.clone(),
            factors: self.factors.clone(),
            injuries: self.injuries.clone(),
        }
    }
}

/// Response from `POST /api/report`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    /// Human-readable status line for the UI alert.
    pub message: String,
    /// Number of rows matching the filters.
    pub total: u64,
    /// The merged filter spec actually applied, echoed back so the UI
    /// can sync its controls after a search-query override.
    pub applied: FilterSpec,
    /// The five derived visualizations.
    pub report: Report,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
