#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the crime statistics map API.
//!
//! The backend exposes four read-only endpoints under `/api/mapa`:
//!
//! 1. `periodos` - available periods, newest first.
//! 2. `tipologias` - offence categories.
//! 3. `delitos/agregado/{nivel}` - one aggregated row per region for a period.
//! 4. `delitos/evolucion/{nivel}` - time series for one or two regions.
//!
//! View controllers depend on the [`CrimeDataApi`] trait rather than on the
//! HTTP client directly so they can be exercised against in-memory data.
//! [`HttpCrimeDataApi`] is the `reqwest`-backed implementation.

pub mod client;

use async_trait::async_trait;
use chrono::NaiveDate;
use crime_atlas_crime_models::{CrimeRecord, GeoLevel, LocationSeries};
use thiserror::Error;

pub use client::HttpCrimeDataApi;

/// Base URL used when `CRIME_ATLAS_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Errors from API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Response status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Response body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured base URL could not be combined with an endpoint path.
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// Parser diagnostic.
        message: String,
    },
}

/// Connection settings for the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Scheme, host and optional path prefix, without a trailing slash.
    pub base_url: String,
}

impl ApiConfig {
    /// Creates a config for the given base URL, trimming trailing slashes.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads the base URL from `CRIME_ATLAS_API_URL`, falling back to
    /// [`DEFAULT_API_URL`].
    #[must_use]
    pub fn from_env() -> Self {
        let url = std::env::var("CRIME_ATLAS_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(&url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// Read access to the crime statistics backend.
#[async_trait]
pub trait CrimeDataApi: Send + Sync {
    /// Lists the available periods, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request or response parsing fails.
    async fn periods(&self) -> Result<Vec<NaiveDate>, ApiError>;

    /// Lists the offence categories.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request or response parsing fails.
    async fn categories(&self) -> Result<Vec<String>, ApiError>;

    /// Fetches one aggregated record per region of `level` for `period`,
    /// optionally restricted to a single offence `category`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request or response parsing fails.
    async fn aggregate(
        &self,
        level: GeoLevel,
        period: NaiveDate,
        category: Option<&str>,
    ) -> Result<Vec<CrimeRecord>, ApiError>;

    /// Fetches the time series for `geo1` and, when given, `geo2`.
    ///
    /// Locations are raw `geo` labels exactly as the aggregate endpoint
    /// returns them.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request or response parsing fails.
    async fn evolution(
        &self,
        level: GeoLevel,
        geo1: &str,
        geo2: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<LocationSeries>, ApiError>;
}
