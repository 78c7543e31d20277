#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data joining and color binning for crime choropleth maps.
//!
//! Turns a flat list of API records into something a map can be colored
//! from:
//!
//! - [`normalize`] derives a canonical uppercase key (and a display name)
//!   from the API's prefixed region labels.
//! - [`RegionIndex`] holds records by canonical key, in insertion order.
//! - [`matcher`] resolves a geometry's display name to a record via the
//!   [`AliasTable`], an exact key, or a substring fallback.
//! - [`quantile`] computes five-band breakpoints over positive rates and
//!   classifies rates into [`SeverityBin`](crime_atlas_crime_models::SeverityBin)s.
//! - [`Legend`] renders the breakpoints for display.

pub mod aliases;
pub mod index;
pub mod legend;
pub mod matcher;
pub mod normalize;
pub mod quantile;

pub use aliases::AliasTable;
pub use index::RegionIndex;
pub use legend::{Legend, LegendEntry, to_fixed};
pub use matcher::{MatchKind, RegionMatch, resolve, resolve_match};
pub use normalize::{display_name, normalize};
pub use quantile::{classify, compute_thresholds, thresholds_from_rates};
