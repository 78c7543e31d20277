//! Map legend derived from quantile thresholds.

use std::fmt::Write as _;

use crime_atlas_crime_models::{QuantileThresholds, SeverityBin};
use serde::Serialize;

/// Legend heading.
pub const LEGEND_TITLE: &str = "Tasa por 1000 hab.";

/// Formats `value` with `digits` decimals, rounding ties away from zero.
///
/// `{:.N}` rounds an exact tie to even, so `12.25` would print as `12.2`.
/// Rates come rounded to two decimals, which makes such ties common.
#[must_use]
pub fn to_fixed(value: f64, digits: u8) -> String {
    let scale = 10_f64.powi(i32::from(digits));
    let rounded = (value * scale).round() / scale;
    format!("{rounded:.prec$}", prec = usize::from(digits))
}

/// One color swatch and its range label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Bin the swatch represents.
    pub bin: SeverityBin,
    /// Swatch color.
    pub color: &'static str,
    /// Range label, e.g. `"12.3 - 15.0"`.
    pub label: String,
}

/// A five-swatch legend, lowest severity first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    /// Heading.
    pub title: &'static str,
    /// Swatches.
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Builds the legend for `thresholds`; there is none without thresholds.
    #[must_use]
    pub fn from_thresholds(thresholds: Option<&QuantileThresholds>) -> Option<Self> {
        let t = thresholds?;
        let labels = [
            format!("< {}", to_fixed(t.q1, 1)),
            format!("{} - {}", to_fixed(t.q1, 1), to_fixed(t.q2, 1)),
            format!("{} - {}", to_fixed(t.q2, 1), to_fixed(t.q3, 1)),
            format!("{} - {}", to_fixed(t.q3, 1), to_fixed(t.q4, 1)),
            format!("> {}", to_fixed(t.q4, 1)),
        ];

        let entries = SeverityBin::graded()
            .iter()
            .zip(labels)
            .map(|(&bin, label)| LegendEntry {
                bin,
                color: bin.color(),
                label,
            })
            .collect();

        Some(Self {
            title: LEGEND_TITLE,
            entries,
        })
    }

    /// Plain-text rendering, one swatch per line.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = format!("{}\n", self.title);
        for entry in &self.entries {
            let _ = writeln!(out, "  {} {}", entry.color, entry.label);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> QuantileThresholds {
        QuantileThresholds {
            min: 20.04,
            q1: 31.26,
            q2: 38.0,
            q3: 41.449,
            q4: 52.95,
            max: 70.1,
        }
    }

    #[test]
    fn no_thresholds_no_legend() {
        assert!(Legend::from_thresholds(None).is_none());
    }

    #[test]
    fn labels_use_one_decimal() {
        let legend = Legend::from_thresholds(Some(&thresholds())).unwrap();
        let labels: Vec<&str> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["< 31.3", "31.3 - 38.0", "38.0 - 41.4", "41.4 - 53.0", "> 53.0"]
        );
    }

    #[test]
    fn tied_labels_round_up() {
        let t = QuantileThresholds {
            min: 1.0,
            q1: 12.25,
            q2: 20.75,
            q3: 30.05,
            q4: 40.5,
            max: 50.0,
        };
        let legend = Legend::from_thresholds(Some(&t)).unwrap();
        assert_eq!(legend.entries[0].label, "< 12.3");
        assert_eq!(legend.entries[1].label, "12.3 - 20.8");
    }

    #[test]
    fn to_fixed_rounds_ties_up() {
        assert_eq!(to_fixed(12.25, 1), "12.3");
        assert_eq!(to_fixed(10.125, 2), "10.13");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(38.0, 1), "38.0");
        assert_eq!(to_fixed(7.0, 0), "7");
    }

    #[test]
    fn swatches_follow_bin_colors() {
        let legend = Legend::from_thresholds(Some(&thresholds())).unwrap();
        let colors: Vec<&str> = legend.entries.iter().map(|e| e.color).collect();
        assert_eq!(
            colors,
            vec!["#fee5d9", "#fcae91", "#fb6a4a", "#de2d26", "#a50f15"]
        );
    }

    #[test]
    fn renders_text() {
        let legend = Legend::from_thresholds(Some(&thresholds())).unwrap();
        let text = legend.render_text();
        assert!(text.starts_with("Tasa por 1000 hab.\n"));
        assert_eq!(text.lines().count(), 6);
    }
}
