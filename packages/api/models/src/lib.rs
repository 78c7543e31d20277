#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! JSON request and response types for the crime statistics map API.
//!
//! Field names follow the backend's Spanish wire format (`periodos`,
//! `total_delitos`, `tasa_por_mil`, ...). These types are separate from the
//! domain types in `crime_atlas_crime_models` so the wire contract can evolve
//! independently; `From` impls convert into the domain.

use chrono::NaiveDate;
use crime_atlas_crime_models::{CrimeRecord, GeoLevel, LocationSeries, SeriesPoint};
use serde::{Deserialize, Serialize};

/// Response of `GET /api/mapa/periodos`, newest period first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodsResponse {
    /// Available periods as `YYYY-MM-DD` dates.
    pub periodos: Vec<NaiveDate>,
}

/// Response of `GET /api/mapa/tipologias`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    /// Offence categories, alphabetically.
    pub tipologias: Vec<String>,
}

/// Query string for the aggregate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateQuery {
    /// Period to aggregate.
    pub periodo: NaiveDate,
    /// Restrict to one offence category; all categories when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipologia: Option<String>,
}

/// Response of `GET /api/mapa/delitos/agregado/{nivel}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResponse {
    /// Echo of the requested level.
    #[serde(default)]
    pub nivel: Option<GeoLevel>,
    /// Echo of the requested period.
    #[serde(default)]
    pub periodo: Option<NaiveDate>,
    /// Echo of the requested category.
    #[serde(default)]
    pub tipologia: Option<String>,
    /// Number of rows in `datos`.
    #[serde(default)]
    pub total_registros: Option<u64>,
    /// One row per region.
    pub datos: Vec<ApiAggregateRow>,
}

/// One aggregated row as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiAggregateRow {
    /// Raw region label.
    pub geo: String,
    /// Total offences.
    #[serde(default)]
    pub total_delitos: Option<u64>,
    /// Distinct categories summed into the row.
    #[serde(default)]
    pub num_tipologias: Option<u32>,
    /// Population.
    #[serde(default)]
    pub poblacion: Option<u64>,
    /// Offences per 1,000 inhabitants.
    #[serde(default)]
    pub tasa_por_mil: Option<f64>,
}

impl From<ApiAggregateRow> for CrimeRecord {
    fn from(row: ApiAggregateRow) -> Self {
        Self {
            geo: row.geo,
            total_incidents: row.total_delitos.unwrap_or(0),
            population: row.poblacion.unwrap_or(0),
            rate_per_thousand: row.tasa_por_mil,
            categories_count: row.num_tipologias,
        }
    }
}

/// Query string for the evolution endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionQuery {
    /// Primary location (raw `geo` label).
    pub geo1: String,
    /// Optional second location to compare against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo2: Option<String>,
    /// Restrict to one offence category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipologia: Option<String>,
}

/// Response of `GET /api/mapa/delitos/evolucion/{nivel}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionResponse {
    /// Echo of the requested level.
    #[serde(default)]
    pub nivel: Option<GeoLevel>,
    /// Echo of the requested category.
    #[serde(default)]
    pub tipologia: Option<String>,
    /// One series per requested location that had data.
    pub datos: Vec<ApiLocationSeries>,
}

/// Time series for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiLocationSeries {
    /// Raw region label.
    pub geo: String,
    /// Points ordered by period.
    pub evolucion: Vec<ApiSeriesPoint>,
}

/// One period of a time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSeriesPoint {
    /// Period date.
    pub periodo: NaiveDate,
    /// Offences in the period.
    #[serde(default)]
    pub total_delitos: Option<u64>,
    /// Population.
    #[serde(default)]
    pub poblacion: Option<u64>,
    /// Offences per 1,000 inhabitants.
    #[serde(default)]
    pub tasa_por_mil: Option<f64>,
}

impl From<ApiSeriesPoint> for SeriesPoint {
    fn from(point: ApiSeriesPoint) -> Self {
        Self {
            period: point.periodo,
            total_incidents: point.total_delitos.unwrap_or(0),
            population: point.poblacion.unwrap_or(0),
            rate_per_thousand: point.tasa_por_mil.unwrap_or(0.0),
        }
    }
}

impl From<ApiLocationSeries> for LocationSeries {
    fn from(series: ApiLocationSeries) -> Self {
        Self {
            geo: series.geo,
            points: series.evolucion.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiHealth {
    /// `"ok"` when the API process is up.
    pub api: String,
    /// `"ok"` or `"error"` for the database connection.
    pub database: String,
    /// Database diagnostic: the server's version row when connected, an
    /// error string otherwise.
    #[serde(default)]
    pub database_info: Option<serde_json::Value>,
}

impl ApiHealth {
    /// Whether both the API and its database report healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.api == "ok" && self.database == "ok"
    }

    /// The database diagnostic as one line of text. Strings are shown as-is
    /// and anything else as compact JSON.
    #[must_use]
    pub fn database_info_text(&self) -> Option<String> {
        self.database_info.as_ref().map(|info| match info {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}
