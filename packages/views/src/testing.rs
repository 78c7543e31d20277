//! In-memory API and geometry doubles for view tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use crime_atlas_api::{ApiError, CrimeDataApi};
use crime_atlas_crime_models::{CrimeRecord, GeoLevel, LocationSeries, SeriesPoint};
use crime_atlas_geography::{GeographyError, GeometryProvider, parse_feature_collection};
use geojson::FeatureCollection;

pub const REGIONS: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        { "type": "Feature", "properties": { "NAMEUNIT": "Andalucía" }, "geometry": null },
        { "type": "Feature", "properties": { "NAMEUNIT": "Comunidad de Madrid" }, "geometry": null },
        { "type": "Feature", "properties": { "NAMEUNIT": "Galicia" }, "geometry": null },
        { "type": "Feature", "properties": { "NAMEUNIT": "Illes Balears" }, "geometry": null }
    ]
}"#;

pub fn date(y: i32, m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, 1).unwrap()
}

pub fn record(geo: &str, total: u64, population: u64, rate: f64) -> CrimeRecord {
    CrimeRecord {
        geo: geo.to_string(),
        total_incidents: total,
        population,
        rate_per_thousand: Some(rate),
        categories_count: Some(12),
    }
}

pub fn series(geo: &str, rates: &[(NaiveDate, f64)]) -> LocationSeries {
    LocationSeries {
        geo: geo.to_string(),
        points: rates
            .iter()
            .map(|&(period, rate)| SeriesPoint {
                period,
                total_incidents: 1000,
                population: 100_000,
                rate_per_thousand: rate,
            })
            .collect(),
    }
}

fn unavailable() -> ApiError {
    ApiError::Status {
        status: 503,
        url: "http://mock/api/mapa".to_string(),
    }
}

#[derive(Default)]
pub struct MockApi {
    pub periods: Vec<NaiveDate>,
    pub records: Mutex<Vec<CrimeRecord>>,
    pub series: Vec<LocationSeries>,
    pub fail: AtomicBool,
    pub calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn with_records(records: Vec<CrimeRecord>) -> Self {
        Self {
            periods: vec![date(2024, 6), date(2024, 3)],
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn set_records(&self, records: Vec<CrimeRecord>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.fail.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CrimeDataApi for MockApi {
    async fn periods(&self) -> Result<Vec<NaiveDate>, ApiError> {
        self.check("periods".to_string())?;
        Ok(self.periods.clone())
    }

    async fn categories(&self) -> Result<Vec<String>, ApiError> {
        self.check("categories".to_string())?;
        Ok(vec!["Hurtos".to_string(), "Robos con violencia".to_string()])
    }

    async fn aggregate(
        &self,
        level: GeoLevel,
        period: NaiveDate,
        category: Option<&str>,
    ) -> Result<Vec<CrimeRecord>, ApiError> {
        self.check(format!(
            "aggregate {level} {period} {}",
            category.unwrap_or("-")
        ))?;
        Ok(self.records.lock().unwrap().clone())
    }

    async fn evolution(
        &self,
        level: GeoLevel,
        geo1: &str,
        geo2: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<LocationSeries>, ApiError> {
        self.check(format!(
            "evolution {level} {geo1} {} {}",
            geo2.unwrap_or("-"),
            category.unwrap_or("-")
        ))?;
        Ok(self.series.clone())
    }
}

#[derive(Default)]
pub struct MockGeometry {
    pub fail: AtomicBool,
}

impl MockGeometry {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl GeometryProvider for MockGeometry {
    async fn load(&self, level: GeoLevel) -> Result<Option<FeatureCollection>, GeographyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(GeographyError::Status {
                status: 404,
                url: "http://mock/data/mapas".to_string(),
            });
        }
        match level {
            GeoLevel::National => Ok(None),
            GeoLevel::Region | GeoLevel::Province | GeoLevel::Municipality => {
                parse_feature_collection(REGIONS, "mock").map(Some)
            }
        }
    }
}
