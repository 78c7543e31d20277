#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary geometry for crime choropleth maps.
//!
//! Each administrative level has a static `GeoJSON` `FeatureCollection`
//! (`comunidades.geojson`, `provincias.geojson`, `municipios.geojson`) whose
//! features carry a display-name property (`NAMEUNIT`). Geometry is loaded
//! through the [`GeometryProvider`] trait, either from a local directory or
//! from a static-file URL, and styled with [`style::FeatureStyle`].

pub mod style;

use std::path::PathBuf;

use async_trait::async_trait;
use crime_atlas_crime_models::GeoLevel;
use geojson::{Feature, FeatureCollection, GeoJson};
use thiserror::Error;

/// Property holding a feature's display name in the boundary files.
pub const NAME_PROPERTY: &str = "NAMEUNIT";

/// Geometry location used when `CRIME_ATLAS_GEOMETRY` is not set.
pub const DEFAULT_GEOMETRY_BASE: &str = "data/mapas";

/// Errors from geometry loading.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// Reading a local geometry file failed.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// HTTP request for a remote geometry file failed.
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

    /// The document is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The document is valid `GeoJSON` but not a `FeatureCollection`.
    #[error("{origin} is not a FeatureCollection")]
    NotAFeatureCollection {
        /// File path or URL of the document.
        origin: String,
    },
}

/// Source of per-level boundary geometry.
#[async_trait]
pub trait GeometryProvider: Send + Sync {
    /// Loads the boundaries for `level`.
    ///
    /// Returns `Ok(None)` for levels without geometry (national).
    ///
    /// # Errors
    ///
    /// Returns [`GeographyError`] if the document cannot be read or parsed.
    async fn load(&self, level: GeoLevel) -> Result<Option<FeatureCollection>, GeographyError>;
}

/// Where the static geometry files live.
#[derive(Debug, Clone)]
pub enum GeometrySource {
    /// A local directory containing the level files.
    Directory(PathBuf),
    /// A base URL the level files are served under.
    Url {
        /// Base URL without a trailing slash.
        base: String,
        /// HTTP client.
        client: reqwest::Client,
    },
}

impl GeometrySource {
    /// Interprets `location` as a URL when it has an `http(s)://` scheme and
    /// as a directory otherwise.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url {
                base: location.trim_end_matches('/').to_string(),
                client: reqwest::Client::new(),
            }
        } else {
            Self::Directory(PathBuf::from(location))
        }
    }

    /// Reads the location from `CRIME_ATLAS_GEOMETRY`, falling back to
    /// [`DEFAULT_GEOMETRY_BASE`].
    #[must_use]
    pub fn from_env() -> Self {
        let location = std::env::var("CRIME_ATLAS_GEOMETRY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GEOMETRY_BASE.to_string());
        Self::parse(&location)
    }

    /// Where the file for `file_name` would be read from.
    #[must_use]
    pub fn locate(&self, file_name: &str) -> String {
        match self {
            Self::Directory(dir) => dir.join(file_name).to_string_lossy().into_owned(),
            Self::Url { base, .. } => format!("{base}/{file_name}"),
        }
    }

    async fn read(&self, file_name: &str) -> Result<String, GeographyError> {
        match self {
            Self::Directory(dir) => {
                let path = dir.join(file_name);
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| GeographyError::Io { path, source })
            }
            Self::Url { client, .. } => {
                let url = self.locate(file_name);
                let response = client.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(GeographyError::Status {
                        status: status.as_u16(),
                        url,
                    });
                }
                Ok(response.text().await?)
            }
        }
    }
}

#[async_trait]
impl GeometryProvider for GeometrySource {
    async fn load(&self, level: GeoLevel) -> Result<Option<FeatureCollection>, GeographyError> {
        let Some(file_name) = level.geometry_file() else {
            log::debug!("Level {level} has no geometry");
            return Ok(None);
        };

        let body = self.read(file_name).await?;
        let collection = parse_feature_collection(&body, &self.locate(file_name))?;
        log::info!(
            "Loaded {} features from {file_name}",
            collection.features.len()
        );
        Ok(Some(collection))
    }
}

/// Parses a `GeoJSON` document that must be a `FeatureCollection`.
///
/// # Errors
///
/// Returns [`GeographyError`] if the text is not `GeoJSON` or is a single
/// feature or geometry.
pub fn parse_feature_collection(
    body: &str,
    origin: &str,
) -> Result<FeatureCollection, GeographyError> {
    match body.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) | GeoJson::Geometry(_) => Err(GeographyError::NotAFeatureCollection {
            origin: origin.to_string(),
        }),
    }
}

/// A feature's display name, read from `property`.
#[must_use]
pub fn feature_name<'a>(feature: &'a Feature, property: &str) -> Option<&'a str> {
    feature.property(property).and_then(serde_json::Value::as_str)
}
