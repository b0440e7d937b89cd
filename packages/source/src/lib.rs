#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Collision dataset loading.
//!
//! Fetches the NYC collision CSV export once per process, applies type
//! coercion, and caches the result for the process lifetime. Any fetch or
//! parse failure degrades to a small embedded sample dataset instead of
//! propagating — the report pipeline always has data to work with.

pub mod parsing;

use std::collections::BTreeSet;

use collision_report_collision_models::{CollisionRecord, Dataset, Field};
use serde::Deserialize;
use tokio::sync::OnceCell;

/// Hard cap on loaded rows to bound memory use. Rows beyond the cap are
/// dropped deterministically (first N kept).
pub const ROW_CAP: u64 = 150_000;

/// Default Socrata CSV export endpoint (NYC Motor Vehicle Collisions).
pub const DEFAULT_DATA_URL: &str = "https://data.cityofnewyork.us/resource/h9gi-nx95.csv";

/// Environment variable overriding the data endpoint.
pub const DATA_URL_ENV: &str = "CRASH_DATA_URL";

/// Errors that can occur while fetching or parsing the remote dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV parsing failed.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// Configuration for a collision CSV fetch.
pub struct SocrataCsvConfig<'a> {
    /// Base CSV export URL (e.g. the NYC crashes endpoint).
    pub api_url: &'a str,
    /// Row cap passed as the Socrata `$limit` parameter and enforced
    /// again locally after parsing.
    pub row_cap: u64,
    /// Label for log messages.
    pub label: &'a str,
}

/// One raw CSV row, column names as published by the source. Unknown
/// columns are ignored; known-but-absent columns deserialize as `None`.
#[derive(Debug, Deserialize)]
struct RawCrashRecord {
    #[serde(default)]
    collision_id: Option<String>,
    #[serde(default)]
    crash_date: Option<String>,
    #[serde(default)]
    crash_time: Option<String>,
    #[serde(default)]
    borough: Option<String>,
    #[serde(default)]
    latitude: Option<String>,
    #[serde(default)]
    longitude: Option<String>,
    #[serde(default)]
    person_injury: Option<String>,
    #[serde(default)]
    vehicle_type_code1: Option<String>,
    #[serde(default)]
    contributing_factor_vehicle_1: Option<String>,
}

/// Fetches the collision CSV export and parses it into a [`Dataset`].
///
/// # Errors
///
/// Returns [`SourceError`] if the HTTP request or CSV parsing fails.
pub async fn fetch_crash_csv(config: &SocrataCsvConfig<'_>) -> Result<Dataset, SourceError> {
    let url = format!("{}?$limit={}", config.api_url, config.row_cap);
    log::info!("Fetching {} collision data: {url}", config.label);

    let client = reqwest::Client::new();
    let response = client.get(&url).send().await?.error_for_status()?;
    let body = response.text().await?;

    let dataset = parse_crash_csv(&body, config.row_cap)?;
    log::info!(
        "Downloaded {} {} collision records",
        dataset.len(),
        config.label
    );
    Ok(dataset)
}

/// Parses CSV text into a [`Dataset`], recording which known columns the
/// header row actually provided and dropping rows beyond `row_cap`.
///
/// # Errors
///
/// Returns [`SourceError`] if the CSV is malformed.
pub fn parse_crash_csv(body: &str, row_cap: u64) -> Result<Dataset, SourceError> {
    let mut reader = csv::Reader::from_reader(body.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: BTreeSet<Field> = Field::all()
        .iter()
        .copied()
        .filter(|field| headers.iter().any(|h| h == field.column_name()))
        .collect();

    let mut records = Vec::new();
    for result in reader.deserialize::<RawCrashRecord>() {
        if records.len() as u64 >= row_cap {
            break;
        }
        if let Some(record) = normalize(result?) {
            records.push(record);
        }
    }

    Ok(Dataset::new(records, columns))
}

/// Coerces one raw row into a [`CollisionRecord`]. Rows without an id are
/// dropped; unparsable dates and coordinates become `None`.
fn normalize(raw: RawCrashRecord) -> Option<CollisionRecord> {
    let collision_id = match raw.collision_id {
        Some(id) if !id.is_empty() => id,
        _ => return None,
    };

    let (latitude, longitude) =
        match parsing::parse_lat_lng_str(raw.latitude.as_ref(), raw.longitude.as_ref()) {
            Some((lat, lng)) => (Some(lat), Some(lng)),
            None => (None, None),
        };

    Some(CollisionRecord {
        collision_id,
        borough: non_empty(raw.borough),
        crash_date: raw.crash_date.as_deref().and_then(parsing::parse_crash_date),
        crash_time: non_empty(raw.crash_time),
        latitude,
        longitude,
        person_injury: non_empty(raw.person_injury),
        vehicle_type: non_empty(raw.vehicle_type_code1),
        contributing_factor: non_empty(raw.contributing_factor_vehicle_1),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Builds the embedded demo dataset used when the remote fetch fails.
/// Every column is present so all report sections stay exercised.
#[must_use]
pub fn fallback_dataset() -> Dataset {
    let rows: &[(&str, &str, &str, &str, f32, f32, &str, &str, &str)] = &[
        (
            "1001", "MANHATTAN", "2023-01-01", "12:00", 40.7128, -74.0060, "INJURED", "Sedan",
            "Unspecified",
        ),
        (
            "1002", "BROOKLYN", "2023-01-02", "13:00", 40.6782, -73.9442, "KILLED", "SUV",
            "Driver Inattention",
        ),
        (
            "1003", "QUEENS", "2023-01-15", "08:45", 40.7282, -73.7949, "INJURED", "Taxi",
            "Following Too Closely",
        ),
        (
            "1004", "BRONX", "2023-02-03", "17:30", 40.8448, -73.8648, "UNSPECIFIED", "Sedan",
            "Failure to Yield Right-of-Way",
        ),
        (
            "1005", "MANHATTAN", "2023-02-14", "22:15", 40.7580, -73.9855, "INJURED", "Bike",
            "Driver Inattention",
        ),
        (
            "1006", "STATEN ISLAND", "2023-03-08", "07:10", 40.5795, -74.1502, "KILLED",
            "Pick-up Truck", "Unsafe Speed",
        ),
        (
            "1007", "BROOKLYN", "2023-03-21", "15:40", 40.6501, -73.9496, "INJURED", "SUV",
            "Unspecified",
        ),
        (
            "1008", "QUEENS", "2023-03-30", "02:05", 40.7420, -73.8801, "UNSPECIFIED",
            "Motorcycle", "Alcohol Involvement",
        ),
    ];

    let records = rows
        .iter()
        .map(
            |&(id, borough, date, time, lat, lng, injury, vehicle, factor)| CollisionRecord {
                collision_id: id.to_string(),
                borough: Some(borough.to_string()),
                crash_date: parsing::parse_crash_date(date),
                crash_time: Some(time.to_string()),
                latitude: Some(lat),
                longitude: Some(lng),
                person_injury: Some(injury.to_string()),
                vehicle_type: Some(vehicle.to_string()),
                contributing_factor: Some(factor.to_string()),
            },
        )
        .collect();

    Dataset::new(records, Field::all().iter().copied().collect())
}

static DATASET: OnceCell<Dataset> = OnceCell::const_new();

/// Loads the collision dataset, fetching at most once per process.
///
/// Subsequent calls return the same cached instance. There is no refresh
/// or invalidation; restart the process to pick up new data.
pub async fn load() -> &'static Dataset {
    DATASET
        .get_or_init(|| async { load_or_fallback(&data_url()).await })
        .await
}

/// Fetches from `api_url`, degrading to the embedded sample on any
/// failure. The error is logged, never surfaced.
pub async fn load_or_fallback(api_url: &str) -> Dataset {
    let config = SocrataCsvConfig {
        api_url,
        row_cap: ROW_CAP,
        label: "NYC",
    };
    match fetch_crash_csv(&config).await {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Failed to load collision data, using fallback sample: {e}");
            fallback_dataset()
        }
    }
}

fn data_url() -> String {
    std::env::var(DATA_URL_ENV).unwrap_or_else(|_| DEFAULT_DATA_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CSV: &str = "\
collision_id,crash_date,crash_time,borough,latitude,longitude,person_injury,vehicle_type_code1,contributing_factor_vehicle_1
1,2023-09-11T00:00:00.000,14:30,BROOKLYN,40.6782,-73.9442,INJURED,Sedan,Unspecified
2,2023-09-12,9:15,MANHATTAN,0.0,0.0,KILLED,SUV,Unsafe Speed
,2023-09-13,10:00,QUEENS,40.7282,-73.7949,INJURED,Taxi,Unspecified
3,garbage,,,,,,,
";

    #[test]
    fn parses_and_coerces_rows() {
        let dataset = parse_crash_csv(FULL_CSV, ROW_CAP).unwrap();

        // Row without a collision id is dropped.
        assert_eq!(dataset.len(), 3);
        for field in Field::all() {
            assert!(dataset.has_field(*field), "{field} should be present");
        }

        let first = &dataset.records()[0];
        assert_eq!(first.collision_id, "1");
        assert_eq!(first.borough.as_deref(), Some("BROOKLYN"));
        assert_eq!(first.crash_year(), Some(2023));
        assert!(first.coordinates().is_some());

        // Zero coordinates are nulled out.
        let second = &dataset.records()[1];
        assert_eq!(second.coordinates(), None);

        // Unparsable date coerces to None, empty strings to None.
        let third = &dataset.records()[2];
        assert_eq!(third.collision_id, "3");
        assert_eq!(third.crash_date, None);
        assert_eq!(third.borough, None);
        assert_eq!(third.vehicle_type, None);
    }

    #[test]
    fn row_cap_keeps_first_n() {
        let dataset = parse_crash_csv(FULL_CSV, 2).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].collision_id, "1");
        assert_eq!(dataset.records()[1].collision_id, "2");
    }

    #[test]
    fn missing_columns_are_recorded_as_absent() {
        let csv = "\
collision_id,crash_date,borough
1,2023-09-11,BROOKLYN
";
        let dataset = parse_crash_csv(csv, ROW_CAP).unwrap();
        assert_eq!(dataset.len(), 1);
        assert!(dataset.has_field(Field::Borough));
        assert!(!dataset.has_field(Field::PersonInjury));
        assert!(!dataset.has_field(Field::Latitude));
        assert_eq!(dataset.records()[0].person_injury, None);
    }

    #[test]
    fn fallback_has_every_column_and_rows() {
        let dataset = fallback_dataset();
        assert!(!dataset.is_empty());
        for field in Field::all() {
            assert!(dataset.has_field(*field));
        }
        for record in dataset.records() {
            assert!(record.crash_date.is_some());
            assert!(record.crash_hour().is_some());
            assert!(record.coordinates().is_some());
        }
    }

    #[tokio::test]
    async fn fetch_failure_degrades_to_fallback() {
        // Port 9 (discard) is not listening; the request fails fast.
        let dataset = load_or_fallback("http://127.0.0.1:9/nothing.csv").await;
        assert!(!dataset.is_empty());
        assert_eq!(dataset, fallback_dataset());
    }
}
