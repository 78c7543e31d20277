//! Choropleth map view.
//!
//! A filter change runs in two halves. [`MapLoader::load`] performs the
//! network work (aggregate records, then level geometry) and returns a
//! [`MapSnapshot`]. [`MapView::commit`] folds that snapshot into the
//! [`ViewState`]. Each load is tagged with a [`RequestTicket`] taken from
//! [`MapView::begin`], and only the most recently issued ticket may commit,
//! so a slow request for an old filter set never overwrites a newer render.

use std::sync::Arc;

use chrono::NaiveDate;
use crime_atlas_api::CrimeDataApi;
use crime_atlas_choropleth::{
    AliasTable, Legend, RegionIndex, classify, compute_thresholds, resolve_match,
};
use crime_atlas_crime_models::{CrimeRecord, GeoLevel, QuantileThresholds, SeverityBin};
use crime_atlas_geography::style::FeatureStyle;
use crime_atlas_geography::{GeometryProvider, NAME_PROPERTY, feature_name};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

use crate::info::InfoPanel;

/// Period shown before the user picks one.
pub const DEFAULT_PERIOD: (i32, u32, u32) = (2024, 6, 1);

/// Feature properties written from the matched record.
const DATA_PROPERTIES: [&str; 5] = ["geo", "total_delitos", "poblacion", "tasa_por_mil", "match"];

/// The user's current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapFilters {
    /// Administrative level.
    pub level: GeoLevel,
    /// First day of the period.
    pub period: NaiveDate,
    /// Offence category; `None` for all categories.
    pub category: Option<String>,
}

impl Default for MapFilters {
    fn default() -> Self {
        let (y, m, d) = DEFAULT_PERIOD;
        Self {
            level: GeoLevel::default(),
            period: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
            category: None,
        }
    }
}

/// Generation number of a filter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// What to do with the rendered layer after a load.
#[derive(Debug, Clone)]
pub enum GeometryUpdate {
    /// The level has no geometry; remove the layer.
    Clear,
    /// Replace the layer with freshly loaded boundaries.
    Replace(FeatureCollection),
    /// Geometry could not be loaded; keep what is displayed.
    Keep,
}

/// Result of one [`MapLoader::load`].
#[derive(Debug, Clone)]
pub struct MapSnapshot {
    /// Filters the data was fetched for.
    pub filters: MapFilters,
    /// Fetched records, or `None` if the fetch failed.
    pub records: Option<Vec<CrimeRecord>>,
    /// Layer change.
    pub geometry: GeometryUpdate,
}

/// Outcome of [`MapView::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The snapshot is now displayed.
    Applied,
    /// A newer request was issued after this one; nothing changed.
    Stale,
    /// The data fetch failed; the previous state is still displayed.
    Failed,
}

/// Fetches everything a render needs for one filter set.
#[derive(Clone)]
pub struct MapLoader {
    api: Arc<dyn CrimeDataApi>,
    geometry: Arc<dyn GeometryProvider>,
}

impl MapLoader {
    /// Creates a loader over the given backends.
    #[must_use]
    pub fn new(api: Arc<dyn CrimeDataApi>, geometry: Arc<dyn GeometryProvider>) -> Self {
        Self { api, geometry }
    }

    /// Fetches records and then geometry for `filters`.
    ///
    /// Geometry is not requested when the record fetch fails.
    pub async fn load(&self, filters: MapFilters) -> MapSnapshot {
        let records = match self
            .api
            .aggregate(filters.level, filters.period, filters.category.as_deref())
            .await
        {
            Ok(records) => records,
            Err(e) => {
                log::error!(
                    "Failed to fetch {} data for {}: {e}",
                    filters.level,
                    filters.period
                );
                return MapSnapshot {
                    filters,
                    records: None,
                    geometry: GeometryUpdate::Keep,
                };
            }
        };
        log::debug!("Fetched {} records for {}", records.len(), filters.level);

        let geometry = match self.geometry.load(filters.level).await {
            Ok(Some(collection)) => GeometryUpdate::Replace(collection),
            Ok(None) => GeometryUpdate::Clear,
            Err(e) => {
                log::warn!("Failed to load {} geometry: {e}", filters.level);
                GeometryUpdate::Keep
            }
        };

        MapSnapshot {
            filters,
            records: Some(records),
            geometry,
        }
    }
}

/// A boundary collection with every feature styled.
#[derive(Debug, Clone)]
pub struct StyledLayer {
    /// Level the boundaries belong to.
    pub level: GeoLevel,
    /// Styled features.
    pub collection: FeatureCollection,
    /// Features that resolved to a record.
    pub matched: usize,
    /// Features left grey.
    pub unmatched: usize,
}

/// Everything currently rendered.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Filters of the last applied load.
    pub filters: MapFilters,
    /// Records by canonical key.
    pub index: RegionIndex,
    /// Quantile breakpoints.
    pub thresholds: Option<QuantileThresholds>,
    /// Legend for the breakpoints.
    pub legend: Option<Legend>,
    /// Rendered boundaries, if any.
    pub layer: Option<StyledLayer>,
}

/// Owns the map state and applies filter changes to it.
pub struct MapView {
    loader: MapLoader,
    name_property: String,
    issued: u64,
    state: ViewState,
}

impl MapView {
    /// Creates an empty view.
    #[must_use]
    pub fn new(api: Arc<dyn CrimeDataApi>, geometry: Arc<dyn GeometryProvider>) -> Self {
        Self {
            loader: MapLoader::new(api, geometry),
            name_property: NAME_PROPERTY.to_string(),
            issued: 0,
            state: ViewState::default(),
        }
    }

    /// Reads display names from `property` instead of `NAMEUNIT`.
    #[must_use]
    pub fn with_name_property(mut self, property: impl Into<String>) -> Self {
        self.name_property = property.into();
        self
    }

    /// A loader that can run independently of `self`.
    #[must_use]
    pub fn loader(&self) -> MapLoader {
        self.loader.clone()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// Issues a ticket for a new filter change, invalidating older ones.
    pub const fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// Whether `ticket` is the most recent one issued.
    #[must_use]
    pub const fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Loads and commits `filters` in one step.
    pub async fn apply_filters(&mut self, filters: MapFilters) -> CommitOutcome {
        let ticket = self.begin();
        let snapshot = self.loader.load(filters).await;
        self.commit(ticket, snapshot)
    }

    /// Folds a snapshot into the state if `ticket` is still current.
    pub fn commit(&mut self, ticket: RequestTicket, snapshot: MapSnapshot) -> CommitOutcome {
        if !self.is_current(ticket) {
            log::debug!(
                "Dropping stale map data (ticket {} < {})",
                ticket.0,
                self.issued
            );
            return CommitOutcome::Stale;
        }

        let Some(records) = snapshot.records else {
            return CommitOutcome::Failed;
        };

        let level = snapshot.filters.level;
        self.state.index = RegionIndex::build(records, level);
        self.state.thresholds = compute_thresholds(&self.state.index);
        self.state.legend = Legend::from_thresholds(self.state.thresholds.as_ref());
        self.state.filters = snapshot.filters;

        match snapshot.geometry {
            GeometryUpdate::Clear => self.state.layer = None,
            GeometryUpdate::Replace(collection) => {
                self.state.layer = Some(self.style_layer(level, collection));
            }
            GeometryUpdate::Keep => {
                if let Some(layer) = self.state.layer.take() {
                    self.state.layer = Some(if layer.level == level {
                        self.style_layer(level, layer.collection)
                    } else {
                        layer
                    });
                }
            }
        }

        log::info!(
            "Map showing {} {} regions for {}",
            self.state.index.len(),
            level,
            self.state.filters.period
        );
        CommitOutcome::Applied
    }

    fn style_layer(&self, level: GeoLevel, mut collection: FeatureCollection) -> StyledLayer {
        let aliases = AliasTable::for_level(level);
        let mut matched = 0;

        for feature in &mut collection.features {
            let name = feature_name(feature, &self.name_property).map(str::to_string);
            let found = name
                .as_deref()
                .and_then(|n| resolve_match(n, &self.state.index, aliases));

            let rate = found.map_or(0.0, |m| m.record.rate());
            let bin = classify(rate, self.state.thresholds.as_ref());
            FeatureStyle::for_bin(bin).apply(feature);
            feature.set_property("severity", bin.as_ref());

            if let Some(props) = feature.properties.as_mut() {
                for key in DATA_PROPERTIES {
                    props.remove(key);
                }
            }
            if let Some(m) = found {
                matched += 1;
                feature.set_property("geo", m.record.geo.as_str());
                feature.set_property("total_delitos", m.record.total_incidents);
                feature.set_property("poblacion", m.record.population);
                feature.set_property("tasa_por_mil", m.record.rate_per_thousand);
                feature.set_property("match", m.kind.as_str());
            }
        }

        let unmatched = collection.features.len() - matched;
        if unmatched > 0 {
            log::debug!("{unmatched} {level} features have no data");
        }

        StyledLayer {
            level,
            collection,
            matched,
            unmatched,
        }
    }

    /// Record for a geometry display name, resolved the same way the layer
    /// is styled.
    #[must_use]
    pub fn record_for(&self, display_name: &str) -> Option<&CrimeRecord> {
        resolve_match(
            display_name,
            &self.state.index,
            AliasTable::for_level(self.state.filters.level),
        )
        .map(|m| m.record)
    }

    /// Severity bin for a geometry display name.
    #[must_use]
    pub fn bin_for(&self, display_name: &str) -> SeverityBin {
        let rate = self.record_for(display_name).map_or(0.0, CrimeRecord::rate);
        classify(rate, self.state.thresholds.as_ref())
    }

    /// Info panel contents for the hovered region, if any.
    #[must_use]
    pub fn info_panel(&self, hovered: Option<&str>) -> InfoPanel {
        hovered.map_or(InfoPanel::Placeholder, |name| {
            InfoPanel::region(name, self.record_for(name))
        })
    }

    /// Style for a hovered feature.
    #[must_use]
    pub fn highlight(&self, display_name: &str) -> FeatureStyle {
        FeatureStyle::for_bin(self.bin_for(display_name)).highlighted()
    }
}
