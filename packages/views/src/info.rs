//! Info panel shown when hovering a region.

use std::fmt::Write as _;

use crime_atlas_choropleth::to_fixed;
use crime_atlas_crime_models::CrimeRecord;
use serde::Serialize;

use crate::format::format_count;

/// Text shown when no region is hovered.
pub const PLACEHOLDER: &str = "Pasa el cursor sobre una región";

/// Text shown for a region without a matching record.
pub const NO_DATA: &str = "Sin datos disponibles";

const NOT_AVAILABLE: &str = "N/A";

/// Contents of the info panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InfoPanel {
    /// Nothing hovered.
    Placeholder,
    /// A hovered region.
    Region {
        /// Geometry display name.
        title: String,
        /// Figures, when a record resolved.
        details: Option<RegionDetails>,
    },
}

/// Formatted figures for a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDetails {
    /// Total offences, thousands-grouped, or `N/A`.
    pub total_incidents: String,
    /// Population, thousands-grouped, or `N/A`.
    pub population: String,
    /// Rate per 1,000 inhabitants with two decimals, or `N/A`.
    pub rate_per_thousand: String,
}

impl RegionDetails {
    /// Formats a record. Zero and missing figures both show as `N/A`.
    #[must_use]
    pub fn from_record(record: &CrimeRecord) -> Self {
        let count = |v: u64| {
            if v == 0 {
                NOT_AVAILABLE.to_string()
            } else {
                format_count(v)
            }
        };
        let rate = record
            .rate_per_thousand
            .filter(|r| *r != 0.0 && !r.is_nan())
            .map_or_else(|| NOT_AVAILABLE.to_string(), |r| to_fixed(r, 2));

        Self {
            total_incidents: count(record.total_incidents),
            population: count(record.population),
            rate_per_thousand: rate,
        }
    }
}

impl InfoPanel {
    /// Panel for a hovered region.
    #[must_use]
    pub fn region(title: &str, record: Option<&CrimeRecord>) -> Self {
        Self::Region {
            title: title.to_string(),
            details: record.map(RegionDetails::from_record),
        }
    }

    /// Plain-text rendering.
    #[must_use]
    pub fn render_text(&self) -> String {
        match self {
            Self::Placeholder => PLACEHOLDER.to_string(),
            Self::Region { title, details } => {
                let mut out = format!("{title}\n");
                match details {
                    Some(d) => {
                        let _ = writeln!(out, "Total delitos: {}", d.total_incidents);
                        let _ = writeln!(out, "Población: {}", d.population);
                        let _ = writeln!(out, "Tasa por 1000 hab: {}", d.rate_per_thousand);
                    }
                    None => {
                        let _ = writeln!(out, "{NO_DATA}");
                    }
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(total: u64, population: u64, rate: Option<f64>) -> CrimeRecord {
        CrimeRecord {
            geo: "CCAA 13 Madrid".to_string(),
            total_incidents: total,
            population,
            rate_per_thousand: rate,
            categories_count: None,
        }
    }

    #[test]
    fn formats_figures() {
        let panel = InfoPanel::region("Comunidad de Madrid", Some(&record(412_345, 6_871_903, Some(60.126))));
        let InfoPanel::Region { details: Some(d), .. } = &panel else {
            panic!("expected details: {panel:?}");
        };
        assert_eq!(d.total_incidents, "412.345");
        assert_eq!(d.population, "6.871.903");
        assert_eq!(d.rate_per_thousand, "60.13");
    }

    #[test]
    fn rate_ties_round_up() {
        let d = RegionDetails::from_record(&record(10, 1000, Some(10.125)));
        assert_eq!(d.rate_per_thousand, "10.13");
    }

    #[test]
    fn zero_figures_are_not_available() {
        let d = RegionDetails::from_record(&record(0, 0, Some(0.0)));
        assert_eq!(d.total_incidents, "N/A");
        assert_eq!(d.population, "N/A");
        assert_eq!(d.rate_per_thousand, "N/A");

        let d = RegionDetails::from_record(&record(5, 10, None));
        assert_eq!(d.rate_per_thousand, "N/A");
    }

    #[test]
    fn renders_no_data() {
        let text = InfoPanel::region("Galicia", None).render_text();
        assert_eq!(text, "Galicia\nSin datos disponibles\n");
    }

    #[test]
    fn renders_placeholder() {
        assert_eq!(InfoPanel::Placeholder.render_text(), PLACEHOLDER);
    }
}
