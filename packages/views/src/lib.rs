#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View controllers for the crime atlas.
//!
//! [`MapView`] keeps the choropleth state for the selected level, period
//! and category. [`ComparisonView`] loads location pickers and builds the
//! evolution chart for up to two locations. Neither propagates backend
//! errors: failures are logged and the view falls back to its previous
//! state or a [`StatusMessage`].

pub mod chart;
pub mod comparison;
pub mod format;
pub mod info;
pub mod map;

#[cfg(test)]
mod testing;

pub use chart::ChartConfig;
pub use comparison::{ComparisonOutcome, ComparisonRequest, ComparisonView, StatusMessage};
pub use info::InfoPanel;
pub use map::{
    CommitOutcome, GeometryUpdate, MapFilters, MapLoader, MapSnapshot, MapView, RequestTicket,
    StyledLayer, ViewState,
};
