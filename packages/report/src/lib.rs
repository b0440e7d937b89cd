#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Report aggregations.
//!
//! Five independent, order-insensitive derivations from a filtered view,
//! one per visualization. Each degrades to [`ChartData::Unavailable`]
//! when its source column was never loaded; rows with unparsable dates,
//! times, or coordinates are excluded from the affected derivation only.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use collision_report_collision_models::Field;
use collision_report_filter::FilteredView;
use collision_report_report_models::{
    CategoryCount, ChartData, GeoPoint, HourDayGrid, Report, TimeSeriesPoint,
};
use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;

/// Map points above this count are thinned to a uniform random sample of
/// exactly this size to bound rendering cost.
pub const LOCATION_SAMPLE_CAP: usize = 1000;

/// Counts rows per borough, most frequent first.
#[must_use]
pub fn borough_counts(view: &FilteredView<'_>) -> ChartData<Vec<CategoryCount>> {
    if !view.has_field(Field::Borough) {
        return ChartData::Unavailable;
    }
    ChartData::Available(count_values(
        view.records().iter().filter_map(|r| r.borough.as_deref()),
    ))
}

/// Counts rows per injury category, most frequent first.
#[must_use]
pub fn injury_counts(view: &FilteredView<'_>) -> ChartData<Vec<CategoryCount>> {
    if !view.has_field(Field::PersonInjury) {
        return ChartData::Unavailable;
    }
    ChartData::Available(count_values(
        view.records()
            .iter()
            .filter_map(|r| r.person_injury.as_deref()),
    ))
}

/// Buckets rows into calendar months, chronologically, with empty months
/// between the first and last observed crash filled with zero counts.
/// Rows with null dates are excluded.
#[must_use]
pub fn monthly_series(view: &FilteredView<'_>) -> ChartData<Vec<TimeSeriesPoint>> {
    if !view.has_field(Field::CrashDate) {
        return ChartData::Unavailable;
    }

    let mut buckets: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for record in view.records() {
        if let Some(date) = record.crash_date {
            *buckets.entry((date.year(), date.month())).or_insert(0) += 1;
        }
    }

    let Some((&first, &last)) = buckets.keys().next().zip(buckets.keys().next_back()) else {
        return ChartData::Available(Vec::new());
    };

    let mut series = Vec::new();
    let mut month = first;
    loop {
        series.push(TimeSeriesPoint {
            period: format!("{:04}-{:02}", month.0, month.1),
            count: buckets.get(&month).copied().unwrap_or(0),
        });
        if month == last {
            break;
        }
        month = if month.1 == 12 {
            (month.0 + 1, 1)
        } else {
            (month.0, month.1 + 1)
        };
    }
    ChartData::Available(series)
}

/// Cross-tabulates rows into an hour-of-day × day-of-week grid. Rows
/// whose time or date cannot be parsed are excluded.
#[must_use]
pub fn hour_day_grid(view: &FilteredView<'_>) -> ChartData<HourDayGrid> {
    if !view.has_field(Field::CrashTime) || !view.has_field(Field::CrashDate) {
        return ChartData::Unavailable;
    }

    let mut grid = HourDayGrid::new();
    for record in view.records() {
        if let Some(hour) = record.crash_hour()
            && let Some(day) = record.day_of_week()
        {
            grid.increment(hour as usize, day);
        }
    }
    ChartData::Available(grid)
}

/// Returns the rows with known coordinates, thinned to a uniform random
/// sample of [`LOCATION_SAMPLE_CAP`] points when there are more.
///
/// With `seed: None` the sample differs across repeated generations of
/// the same filter; passing a seed makes it reproducible.
#[must_use]
pub fn location_sample(view: &FilteredView<'_>, seed: Option<u64>) -> ChartData<Vec<GeoPoint>> {
    if !view.has_field(Field::Latitude) || !view.has_field(Field::Longitude) {
        return ChartData::Unavailable;
    }

    let points: Vec<GeoPoint> = view
        .records()
        .iter()
        .filter_map(|r| r.coordinates())
        .map(|(latitude, longitude)| GeoPoint {
            latitude,
            longitude,
        })
        .collect();

    if points.len() <= LOCATION_SAMPLE_CAP {
        return ChartData::Available(points);
    }

    let indices = match seed {
        Some(seed) => index::sample(
            &mut ChaCha8Rng::seed_from_u64(seed),
            points.len(),
            LOCATION_SAMPLE_CAP,
        ),
        None => index::sample(&mut rand::rng(), points.len(), LOCATION_SAMPLE_CAP),
    };
    ChartData::Available(indices.iter().map(|i| points[i].clone()).collect())
}

/// Generates the complete report for a filtered view.
#[must_use]
pub fn generate(view: &FilteredView<'_>, seed: Option<u64>) -> Report {
    Report {
        total: view.len() as u64,
        by_borough: borough_counts(view),
        by_injury: injury_counts(view),
        monthly: monthly_series(view),
        hour_day: hour_day_grid(view),
        locations: location_sample(view, seed),
    }
}

/// Counts distinct values, ordered count-descending with ties broken by
/// name for determinism.
fn count_values<'a>(values: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use collision_report_collision_models::{CollisionRecord, Dataset, FilterSpec};
    use collision_report_filter::apply;

    fn record(id: usize) -> CollisionRecord {
        CollisionRecord {
            collision_id: id.to_string(),
            borough: None,
            crash_date: None,
            crash_time: None,
            latitude: None,
            longitude: None,
            person_injury: None,
            vehicle_type: None,
            contributing_factor: None,
        }
    }

    fn dataset(records: Vec<CollisionRecord>, fields: &[Field]) -> Dataset {
        Dataset::new(records, fields.iter().copied().collect())
    }

    #[test]
    fn borough_counts_group_and_order() {
        let records = ["A", "A", "B", "C", "A"]
            .iter()
            .enumerate()
            .map(|(i, b)| CollisionRecord {
                borough: Some((*b).to_string()),
                ..record(i)
            })
            .collect();
        let data = dataset(records, &[Field::Borough]);
        let view = apply(&data, &FilterSpec::default());

        let counts = borough_counts(&view).available().unwrap();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[0].category, "A");
        assert_eq!(counts[0].count, 3);
        // B and C tie at one; name breaks the tie.
        assert_eq!(counts[1].category, "B");
        assert_eq!(counts[2].category, "C");
        assert_eq!(counts.iter().map(|c| c.count).sum::<u64>(), 5);
    }

    #[test]
    fn aggregations_degrade_when_column_absent() {
        let data = dataset(vec![record(0)], &[]);
        let view = apply(&data, &FilterSpec::default());

        assert_eq!(borough_counts(&view), ChartData::Unavailable);
        assert_eq!(injury_counts(&view), ChartData::Unavailable);
        assert_eq!(monthly_series(&view), ChartData::Unavailable);
        assert_eq!(hour_day_grid(&view), ChartData::Unavailable);
        assert_eq!(location_sample(&view, None), ChartData::Unavailable);
    }

    #[test]
    fn monthly_series_fills_gaps_and_skips_null_dates() {
        let mut records = vec![
            CollisionRecord {
                crash_date: NaiveDate::from_ymd_opt(2023, 1, 5),
                ..record(0)
            },
            CollisionRecord {
                crash_date: NaiveDate::from_ymd_opt(2023, 1, 20),
                ..record(1)
            },
            CollisionRecord {
                crash_date: NaiveDate::from_ymd_opt(2023, 3, 2),
                ..record(2)
            },
        ];
        records.push(record(3)); // null date, excluded
        let data = dataset(records, &[Field::CrashDate]);
        let view = apply(&data, &FilterSpec::default());

        let series = monthly_series(&view).available().unwrap();
        let periods: Vec<&str> = series.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(periods, vec!["2023-01", "2023-02", "2023-03"]);
        let counts: Vec<u64> = series.iter().map(|p| p.count).collect();
        assert_eq!(counts, vec![2, 0, 1]);
    }

    #[test]
    fn monthly_series_spans_year_boundary() {
        let records = vec![
            CollisionRecord {
                crash_date: NaiveDate::from_ymd_opt(2022, 12, 31),
                ..record(0)
            },
            CollisionRecord {
                crash_date: NaiveDate::from_ymd_opt(2023, 1, 1),
                ..record(1)
            },
        ];
        let data = dataset(records, &[Field::CrashDate]);
        let view = apply(&data, &FilterSpec::default());

        let series = monthly_series(&view).available().unwrap();
        let periods: Vec<&str> = series.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(periods, vec!["2022-12", "2023-01"]);
    }

    #[test]
    fn pivot_places_counts_in_exact_cells() {
        // 2023-06-12 is a Monday, 2023-06-17 a Saturday.
        let mut records = Vec::new();
        for i in 0..2 {
            records.push(CollisionRecord {
                crash_date: NaiveDate::from_ymd_opt(2023, 6, 12),
                crash_time: Some("08:15".to_string()),
                ..record(i)
            });
        }
        for i in 2..5 {
            records.push(CollisionRecord {
                crash_date: NaiveDate::from_ymd_opt(2023, 6, 17),
                crash_time: Some("23:50".to_string()),
                ..record(i)
            });
        }
        records.push(CollisionRecord {
            crash_date: NaiveDate::from_ymd_opt(2023, 6, 17),
            crash_time: Some("garbled".to_string()),
            ..record(5)
        });
        let data = dataset(records, &[Field::CrashDate, Field::CrashTime]);
        let view = apply(&data, &FilterSpec::default());

        let grid = hour_day_grid(&view).available().unwrap();
        assert_eq!(grid.get(8, Weekday::Mon), 2);
        assert_eq!(grid.get(23, Weekday::Sat), 3);
        // Unparsable time excluded; everything else stays zero.
        assert_eq!(grid.total(), 5);
    }

    fn located_records(n: usize) -> Vec<CollisionRecord> {
        (0..n)
            .map(|i| CollisionRecord {
                latitude: Some(40.0 + i as f32 * 1e-4),
                longitude: Some(-74.0),
                ..record(i)
            })
            .collect()
    }

    #[test]
    fn sample_below_cap_returns_full_subset() {
        let mut records = located_records(10);
        records.push(record(10)); // no coordinates, excluded
        let data = dataset(records, &[Field::Latitude, Field::Longitude]);
        let view = apply(&data, &FilterSpec::default());

        let points = location_sample(&view, None).available().unwrap();
        assert_eq!(points.len(), 10);
        for (i, point) in points.iter().enumerate() {
            assert!((point.latitude - (40.0 + i as f32 * 1e-4)).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn sample_above_cap_is_exactly_cap_and_seedable() {
        let data = dataset(
            located_records(LOCATION_SAMPLE_CAP + 5),
            &[Field::Latitude, Field::Longitude],
        );
        let view = apply(&data, &FilterSpec::default());

        let first = location_sample(&view, Some(42)).available().unwrap();
        assert_eq!(first.len(), LOCATION_SAMPLE_CAP);

        let second = location_sample(&view, Some(42)).available().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn generate_bundles_total_and_sections() {
        let data = dataset(
            vec![CollisionRecord {
                borough: Some("QUEENS".to_string()),
                ..record(0)
            }],
            &[Field::Borough],
        );
        let view = apply(&data, &FilterSpec::default());

        let report = generate(&view, Some(7));
        assert_eq!(report.total, 1);
        assert!(report.by_borough.is_available());
        assert!(!report.monthly.is_available());
    }
}
