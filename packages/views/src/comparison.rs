//! Side-by-side evolution of up to two locations.

use std::sync::Arc;

use crime_atlas_api::{ApiError, CrimeDataApi};
use crime_atlas_choropleth::display_name;
use crime_atlas_crime_models::{GeoLevel, LocationOption};
use serde::Serialize;

use crate::chart::ChartConfig;
use crate::format::collate;

/// `geo` value of the only national location.
pub const NATIONAL_GEO: &str = "NACIONAL";

/// Display name of the only national location.
pub const NATIONAL_NAME: &str = "España (Nacional)";

/// User-facing status shown instead of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusMessage {
    /// No primary location picked.
    SelectLocation,
    /// A request is in flight.
    Loading,
    /// The API returned nothing for the selection.
    NoData,
    /// The request failed.
    LoadError,
}

impl StatusMessage {
    /// Spanish message text.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::SelectLocation => "Selecciona al menos una ubicación",
            Self::Loading => "Cargando datos...",
            Self::NoData => "No hay datos disponibles para esta selección",
            Self::LoadError => "Error al cargar los datos",
        }
    }
}

/// A comparison to draw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonRequest {
    /// Administrative level of both locations.
    pub level: GeoLevel,
    /// Primary location (raw `geo`); empty means none picked.
    pub geo1: String,
    /// Optional second location (raw `geo`).
    pub geo2: Option<String>,
    /// Offence category; `None` for all.
    pub category: Option<String>,
}

/// What the comparison area shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ComparisonOutcome {
    Chart(Box<ChartConfig>),
    Message(StatusMessage),
}

/// Location pickers and the evolution chart.
pub struct ComparisonView {
    api: Arc<dyn CrimeDataApi>,
    level: GeoLevel,
    locations: Vec<LocationOption>,
}

impl ComparisonView {
    /// Creates a view with no locations loaded.
    #[must_use]
    pub fn new(api: Arc<dyn CrimeDataApi>) -> Self {
        Self {
            api,
            level: GeoLevel::default(),
            locations: Vec::new(),
        }
    }

    /// Level the current locations belong to.
    #[must_use]
    pub const fn level(&self) -> GeoLevel {
        self.level
    }

    /// Picker entries, sorted by name.
    #[must_use]
    pub fn locations(&self) -> &[LocationOption] {
        &self.locations
    }

    /// Reloads the picker entries for `level`.
    ///
    /// On failure the previous entries are kept and the error is logged.
    pub async fn load_locations(&mut self, level: GeoLevel) -> &[LocationOption] {
        match self.fetch_locations(level).await {
            Ok(locations) => {
                log::info!("Loaded {} {level} locations", locations.len());
                self.locations = locations;
                self.level = level;
            }
            Err(e) => log::error!("Failed to load {level} locations: {e}"),
        }
        &self.locations
    }

    async fn fetch_locations(&self, level: GeoLevel) -> Result<Vec<LocationOption>, ApiError> {
        if level == GeoLevel::National {
            return Ok(vec![LocationOption {
                geo: NATIONAL_GEO.to_string(),
                name: NATIONAL_NAME.to_string(),
            }]);
        }

        let periods = self.api.periods().await?;
        let Some(&latest) = periods.first() else {
            log::warn!("No periods available");
            return Ok(Vec::new());
        };

        let mut locations: Vec<LocationOption> = self
            .api
            .aggregate(level, latest, None)
            .await?
            .into_iter()
            .map(|record| LocationOption {
                name: display_name(&record.geo, level),
                geo: record.geo,
            })
            .collect();
        locations.sort_by(|a, b| collate(&a.name, &b.name));
        Ok(locations)
    }

    /// Fetches the series for `request` and builds the chart.
    pub async fn compare(&self, request: &ComparisonRequest) -> ComparisonOutcome {
        if request.geo1.trim().is_empty() {
            return ComparisonOutcome::Message(StatusMessage::SelectLocation);
        }

        let geo2 = request.geo2.as_deref().filter(|g| !g.trim().is_empty());
        let category = request.category.as_deref().filter(|c| !c.trim().is_empty());

        match self
            .api
            .evolution(request.level, &request.geo1, geo2, category)
            .await
        {
            Ok(series) => ChartConfig::from_series(&series, request.level).map_or(
                ComparisonOutcome::Message(StatusMessage::NoData),
                |chart| ComparisonOutcome::Chart(Box::new(chart)),
            ),
            Err(e) => {
                log::error!("Failed to load evolution for {}: {e}", request.geo1);
                ComparisonOutcome::Message(StatusMessage::LoadError)
            }
        }
    }
}
