#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Domain types for regional crime statistics.
//!
//! These are the types every other crate in the workspace speaks: the
//! administrative [`GeoLevel`] a query runs at, the aggregated
//! [`CrimeRecord`] for one region, the [`QuantileThresholds`] derived from a
//! set of records, and the ordered [`SeverityBin`] a rate is classified into
//! for map coloring. They are independent of the JSON wire format served by
//! the backend API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Administrative granularity of a query.
///
/// The string form is the slug the backend API uses in its URL paths
/// (`/api/mapa/delitos/agregado/{level}`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum GeoLevel {
    /// The whole country (`"nacional"`).
    #[serde(rename = "nacional")]
    #[strum(serialize = "nacional")]
    National,
    /// Autonomous communities (`"ccaa"`).
    #[default]
    #[serde(rename = "ccaa")]
    #[strum(serialize = "ccaa")]
    Region,
    /// Provinces (`"provincia"`).
    #[serde(rename = "provincia")]
    #[strum(serialize = "provincia")]
    Province,
    /// Municipalities (`"municipio"`).
    #[serde(rename = "municipio")]
    #[strum(serialize = "municipio")]
    Municipality,
}

impl GeoLevel {
    /// Returns all variants of this enum, coarsest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::National,
            Self::Region,
            Self::Province,
            Self::Municipality,
        ]
    }

    /// Name of the static geometry file that holds this level's boundaries.
    ///
    /// The national level has no geometry; the map shows no layer for it.
    #[must_use]
    pub const fn geometry_file(self) -> Option<&'static str> {
        match self {
            Self::National => None,
            Self::Region => Some("comunidades.geojson"),
            Self::Province => Some("provincias.geojson"),
            Self::Municipality => Some("municipios.geojson"),
        }
    }

    /// Human-readable (Spanish) label used in pickers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::National => "Nacional",
            Self::Region => "Comunidades autónomas",
            Self::Province => "Provincias",
            Self::Municipality => "Municipios",
        }
    }
}

/// One row of aggregated crime data for a period, region and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeRecord {
    /// Raw region label as served by the API (e.g. `"CCAA 01 Andalucía"`).
    pub geo: String,
    /// Total number of recorded offences.
    pub total_incidents: u64,
    /// Population of the region.
    pub population: u64,
    /// Offences per 1,000 inhabitants. `None` when the API did not compute it.
    pub rate_per_thousand: Option<f64>,
    /// Number of distinct offence categories summed into this row.
    pub categories_count: Option<u32>,
}

impl CrimeRecord {
    /// Rate per thousand, treating a missing value as zero.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate_per_thousand.unwrap_or(0.0)
    }
}

/// Quantile breakpoints over the positive rates of a set of records.
///
/// Always satisfies `min <= q1 <= q2 <= q3 <= q4 <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantileThresholds {
    /// Smallest positive rate.
    pub min: f64,
    /// 20th percentile cut.
    pub q1: f64,
    /// 40th percentile cut.
    pub q2: f64,
    /// 60th percentile cut.
    pub q3: f64,
    /// 80th percentile cut.
    pub q4: f64,
    /// Largest rate.
    pub max: f64,
}

/// Severity bin a rate is classified into for map coloring.
///
/// Variants are declared in ascending severity so the derived ordering is
/// the severity ordering.
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
pub enum SeverityBin {
    /// No data, or no thresholds to compare against.
    None,
    /// Below the first quantile cut.
    Low,
    /// Between the first and second cuts.
    MediumLow,
    /// Between the second and third cuts.
    MediumHigh,
    /// Between the third and fourth cuts.
    High,
    /// At or above the fourth cut.
    VeryHigh,
}

impl SeverityBin {
    /// Fill color for this bin.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::None => "#d3d3d3",
            Self::Low => "#fee5d9",
            Self::MediumLow => "#fcae91",
            Self::MediumHigh => "#fb6a4a",
            Self::High => "#de2d26",
            Self::VeryHigh => "#a50f15",
        }
    }

    /// The five bins that carry data, in ascending severity.
    #[must_use]
    pub const fn graded() -> &'static [Self] {
        &[
            Self::Low,
            Self::MediumLow,
            Self::MediumHigh,
            Self::High,
            Self::VeryHigh,
        ]
    }
}

/// A single period in a region's time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// First day of the period.
    pub period: NaiveDate,
    /// Offences recorded in the period.
    pub total_incidents: u64,
    /// Population used for the rate.
    pub population: u64,
    /// Offences per 1,000 inhabitants.
    pub rate_per_thousand: f64,
}

/// The time series for one raw `geo` label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSeries {
    /// Raw region label.
    pub geo: String,
    /// Points ordered by period.
    pub points: Vec<SeriesPoint>,
}

/// An entry in a location picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationOption {
    /// Raw `geo` label, passed back to the API unchanged.
    pub geo: String,
    /// Human-readable name shown to the user.
    pub name: String,
}
