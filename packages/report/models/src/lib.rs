#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Report aggregation result types.
//!
//! Each visualization consumes one of these. A derivation whose source
//! column was never loaded yields [`ChartData::Unavailable`] — an explicit
//! "no data" value the presentation layer checks, instead of an error.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// A derived aggregation, or an explicit marker that its source column
/// was absent from the loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "camelCase")]
pub enum ChartData<T> {
    /// The derivation ran; the payload feeds the chart.
    Available(T),
    /// A required column was missing; render a "no data" placeholder.
    Unavailable,
}

impl<T> ChartData<T> {
    /// Returns whether a payload is present.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Consumes the value, returning the payload if present.
    #[must_use]
    pub fn available(self) -> Option<T> {
        match self {
            Self::Available(data) => Some(data),
            Self::Unavailable => None,
        }
    }
}

/// Count of rows for a single category value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category value (borough or injury name).
    pub category: String,
    /// Number of rows.
    pub count: u64,
}

/// A time-series data point for one calendar-month bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Month label (`"YYYY-MM"`).
    pub period: String,
    /// Number of rows in this month.
    pub count: u64,
}

/// A sampled crash location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude.
    pub latitude: f32,
    /// Longitude.
    pub longitude: f32,
}

/// Hour-of-day by day-of-week count grid for the heatmap.
///
/// Rows are hours 0-23, columns are days Monday through Sunday. Cells
/// with no rows stay zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourDayGrid {
    counts: Vec<Vec<u64>>,
}

impl HourDayGrid {
    /// Day labels in column order.
    pub const DAY_NAMES: [&'static str; 7] = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];

    /// Creates an all-zero 24×7 grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: vec![vec![0; 7]; 24],
        }
    }

    /// Increments the cell for the given hour (0-23) and weekday.
    pub fn increment(&mut self, hour: usize, day: Weekday) {
        self.counts[hour][day.num_days_from_monday() as usize] += 1;
    }

    /// Returns the count for the given hour (0-23) and weekday.
    #[must_use]
    pub fn get(&self, hour: usize, day: Weekday) -> u64 {
        self.counts[hour][day.num_days_from_monday() as usize]
    }

    /// Returns the full grid, `counts[hour][day]`.
    #[must_use]
    pub fn counts(&self) -> &[Vec<u64>] {
        &self.counts
    }

    /// Returns the sum of every cell.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}

impl Default for HourDayGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// The complete generated report: the record-count summary plus the five
/// derived visualizations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Number of rows matching the filters.
    pub total: u64,
    /// Per-borough counts (bar chart).
    pub by_borough: ChartData<Vec<CategoryCount>>,
    /// Injury-category counts (pie chart).
    pub by_injury: ChartData<Vec<CategoryCount>>,
    /// Monthly crash counts (line chart).
    pub monthly: ChartData<Vec<TimeSeriesPoint>>,
    /// Hour × day counts (heatmap).
    pub hour_day: ChartData<HourDayGrid>,
    /// Sampled crash coordinates (scatter map).
    pub locations: ChartData<Vec<GeoPoint>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_starts_zeroed_and_counts_cells() {
        let mut grid = HourDayGrid::new();
        assert_eq!(grid.total(), 0);

        grid.increment(14, Weekday::Wed);
        grid.increment(14, Weekday::Wed);
        grid.increment(3, Weekday::Sun);

        assert_eq!(grid.get(14, Weekday::Wed), 2);
        assert_eq!(grid.get(3, Weekday::Sun), 1);
        assert_eq!(grid.get(14, Weekday::Sun), 0);
        assert_eq!(grid.total(), 3);
    }

    #[test]
    fn chart_data_serializes_with_status_tag() {
        let available = ChartData::Available(vec![CategoryCount {
            category: "BROOKLYN".to_string(),
            count: 3,
        }]);
        let json = serde_json::to_value(&available).unwrap();
        assert_eq!(json["status"], "available");
        assert_eq!(json["data"][0]["category"], "BROOKLYN");

        let unavailable: ChartData<Vec<CategoryCount>> = ChartData::Unavailable;
        let json = serde_json::to_value(&unavailable).unwrap();
        assert_eq!(json["status"], "unavailable");
        assert!(!unavailable.is_available());
    }
}
