//! Path styling for choropleth features.
//!
//! Styles use the option names of Leaflet path layers (`fillColor`,
//! `fillOpacity`, ...) so a styled feature's properties can be handed to the
//! map library unchanged.

use crime_atlas_crime_models::SeverityBin;
use geojson::Feature;
use serde::Serialize;

/// Stroke and fill options for one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    /// Fill color.
    pub fill_color: String,
    /// Stroke width in pixels.
    pub weight: f64,
    /// Stroke opacity.
    pub opacity: f64,
    /// Stroke color.
    pub color: String,
    /// Fill opacity.
    pub fill_opacity: f64,
}

impl FeatureStyle {
    /// Resting style for a feature in `bin`.
    #[must_use]
    pub fn for_bin(bin: SeverityBin) -> Self {
        Self {
            fill_color: bin.color().to_string(),
            weight: 1.0,
            opacity: 1.0,
            color: "white".to_string(),
            fill_opacity: 0.7,
        }
    }

    /// The hover style: heavier grey outline, denser fill.
    #[must_use]
    pub fn highlighted(&self) -> Self {
        Self {
            fill_color: self.fill_color.clone(),
            weight: 3.0,
            opacity: self.opacity,
            color: "#666".to_string(),
            fill_opacity: 0.9,
        }
    }

    /// Writes the style options into the feature's properties.
    pub fn apply(&self, feature: &mut Feature) {
        if let Ok(serde_json::Value::Object(options)) = serde_json::to_value(self) {
            for (key, value) in options {
                feature.set_property(key, value);
            }
        }
    }
}
