//! Line chart configuration for the comparison view.
//!
//! The shape follows Chart.js (`type`, `data.labels`, `data.datasets`,
//! `options`) so it can be serialized and handed to a chart widget as-is.
//! Label formatting that Chart.js would do in callbacks is done here and
//! carried alongside as [`ChartConfig::tick_labels`] and
//! [`ChartConfig::tooltip_titles`].

use chrono::NaiveDate;
use crime_atlas_choropleth::{display_name, to_fixed};
use crime_atlas_crime_models::{GeoLevel, LocationSeries};
use serde::Serialize;
use serde_json::json;

use crate::format::{format_count, month_long, month_short};

/// Line colors, primary location first.
pub const SERIES_COLORS: [&str; 2] = ["#2c3e50", "#e74c3c"];

/// X axis title.
pub const X_AXIS_TITLE: &str = "Periodo";

/// Y axis title.
pub const Y_AXIS_TITLE: &str = "Tasa por 1000 habitantes";

/// Every how many periods an X tick is labelled.
pub const TICK_STEP: usize = 4;

/// One point on a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Period.
    pub x: NaiveDate,
    /// Rate per 1,000 inhabitants.
    pub y: f64,
    /// Offences in the period.
    pub total: u64,
    /// Population.
    pub poblacion: u64,
    /// Rate per 1,000 inhabitants, repeated for tooltips.
    pub tasa: f64,
}

/// One line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Location display name.
    pub label: String,
    /// Points in period order.
    pub data: Vec<ChartPoint>,
    pub border_color: String,
    pub background_color: String,
    pub border_width: u32,
    pub fill: bool,
    pub tension: f64,
    pub point_radius: u32,
    pub point_hover_radius: u32,
}

impl Dataset {
    /// Builds the line for `series` drawn in `color`.
    #[must_use]
    pub fn from_series(series: &LocationSeries, level: GeoLevel, color: &str) -> Self {
        Self {
            label: display_name(&series.geo, level),
            data: series
                .points
                .iter()
                .map(|p| ChartPoint {
                    x: p.period,
                    y: p.rate_per_thousand,
                    total: p.total_incidents,
                    poblacion: p.population,
                    tasa: p.rate_per_thousand,
                })
                .collect(),
            border_color: color.to_string(),
            background_color: format!("{color}20"),
            border_width: 2,
            fill: false,
            tension: 0.1,
            point_radius: 3,
            point_hover_radius: 6,
        }
    }

    /// Tooltip body lines for the point at `index`.
    #[must_use]
    pub fn tooltip_lines(&self, index: usize) -> Option<Vec<String>> {
        let point = self.data.get(index)?;
        Some(vec![
            self.label.clone(),
            format!("Total delitos: {}", format_count(point.total)),
            format!("Tasa: {} por 1000 hab", to_fixed(point.tasa, 2)),
        ])
    }
}

/// Labels and lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// X categories: the periods of the primary location.
    pub labels: Vec<NaiveDate>,
    /// At most two lines.
    pub datasets: Vec<Dataset>,
}

/// A swatch in the legend drawn next to the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendItem {
    pub label: String,
    pub color: String,
}

/// A complete line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    /// Always `"line"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartData,
    /// Chart.js options object.
    pub options: serde_json::Value,
    /// Short label for each X category, blank except every [`TICK_STEP`]th.
    pub tick_labels: Vec<String>,
    /// Long label for each X category, used as the tooltip title.
    pub tooltip_titles: Vec<String>,
    /// Custom legend, one item per dataset.
    pub legend: Vec<LegendItem>,
}

impl ChartConfig {
    /// Builds the chart for up to two series.
    ///
    /// Returns `None` when there is no series or the first one is empty.
    #[must_use]
    pub fn from_series(series: &[LocationSeries], level: GeoLevel) -> Option<Self> {
        let primary = series.first().filter(|s| !s.points.is_empty())?;
        if series.len() > SERIES_COLORS.len() {
            log::warn!(
                "Got {} series, only the first {} are drawn",
                series.len(),
                SERIES_COLORS.len()
            );
        }

        let labels: Vec<NaiveDate> = primary.points.iter().map(|p| p.period).collect();
        let datasets: Vec<Dataset> = series
            .iter()
            .zip(SERIES_COLORS)
            .map(|(s, color)| Dataset::from_series(s, level, color))
            .collect();

        let tick_labels = labels
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                if i % TICK_STEP == 0 {
                    month_short(d)
                } else {
                    String::new()
                }
            })
            .collect();
        let tooltip_titles = labels.iter().copied().map(month_long).collect();
        let legend = datasets
            .iter()
            .map(|d| LegendItem {
                label: d.label.clone(),
                color: d.border_color.clone(),
            })
            .collect();

        Some(Self {
            kind: "line",
            data: ChartData { labels, datasets },
            options: default_options(),
            tick_labels,
            tooltip_titles,
            legend,
        })
    }
}

fn default_options() -> serde_json::Value {
    json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "interaction": { "mode": "nearest", "axis": "x", "intersect": false },
        "plugins": {
            "legend": { "display": false },
            "tooltip": {
                "enabled": true,
                "backgroundColor": "rgba(255, 255, 255, 0.95)",
                "titleColor": "#333",
                "bodyColor": "#666",
                "borderColor": "#ddd",
                "borderWidth": 1,
                "padding": 12,
                "displayColors": true
            }
        },
        "scales": {
            "x": {
                "type": "category",
                "title": { "display": true, "text": X_AXIS_TITLE },
                "ticks": { "maxRotation": 45 }
            },
            "y": {
                "title": { "display": true, "text": Y_AXIS_TITLE },
                "beginAtZero": false
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{date, series};

    fn quarterly(geo: &str, n: u32) -> LocationSeries {
        let points: Vec<(NaiveDate, f64)> = (0..n)
            .map(|i| (date(2022 + i32::try_from(i / 4).unwrap(), 3 * (i % 4) + 3), 40.0 + f64::from(i)))
            .collect();
        series(geo, &points)
    }

    #[test]
    fn empty_input_has_no_chart() {
        assert!(ChartConfig::from_series(&[], GeoLevel::Region).is_none());
        assert!(ChartConfig::from_series(&[series("CCAA 01 Andalucía", &[])], GeoLevel::Region).is_none());
    }

    #[test]
    fn builds_two_styled_lines() {
        let chart = ChartConfig::from_series(
            &[
                quarterly("CCAA 01 Andalucía", 6),
                quarterly("CCAA 13 Madrid, Comunidad de", 6),
            ],
            GeoLevel::Region,
        )
        .unwrap();

        assert_eq!(chart.kind, "line");
        assert_eq!(chart.data.labels.len(), 6);
        assert_eq!(chart.data.datasets.len(), 2);

        let second = &chart.data.datasets[1];
        assert_eq!(second.label, "Madrid, Comunidad de");
        assert_eq!(second.border_color, "#e74c3c");
        assert_eq!(second.background_color, "#e74c3c20");
        assert_eq!(chart.legend[0].label, "Andalucía");
        assert_eq!(chart.legend[0].color, "#2c3e50");

        let value = serde_json::to_value(&chart).unwrap();
        assert_eq!(value["type"], "line");
        assert_eq!(value["data"]["labels"][0], "2022-03-01");
        assert_eq!(value["data"]["datasets"][0]["pointHoverRadius"], 6);
        assert_eq!(value["data"]["datasets"][0]["data"][0]["poblacion"], 100_000);
        assert_eq!(value["options"]["scales"]["y"]["title"]["text"], Y_AXIS_TITLE);
    }

    #[test]
    fn labels_every_fourth_tick() {
        let chart =
            ChartConfig::from_series(&[quarterly("CCAA 01 Andalucía", 6)], GeoLevel::Region).unwrap();
        assert_eq!(chart.tick_labels, vec!["mar 22", "", "", "", "mar 23", ""]);
        assert_eq!(chart.tooltip_titles[1], "junio de 2022");
    }

    #[test]
    fn extra_series_are_dropped() {
        let chart = ChartConfig::from_series(
            &[
                quarterly("CCAA 01 Andalucía", 2),
                quarterly("CCAA 02 Aragón", 2),
                quarterly("CCAA 03 Asturias", 2),
            ],
            GeoLevel::Region,
        )
        .unwrap();
        assert_eq!(chart.data.datasets.len(), 2);
    }

    #[test]
    fn tooltip_lines() {
        let chart =
            ChartConfig::from_series(&[quarterly("CCAA 01 Andalucía", 2)], GeoLevel::Region).unwrap();
        assert_eq!(
            chart.data.datasets[0].tooltip_lines(1).unwrap(),
            vec!["Andalucía", "Total delitos: 1000", "Tasa: 41.00 por 1000 hab"]
        );
        assert!(chart.data.datasets[0].tooltip_lines(5).is_none());
    }

    #[test]
    fn tooltip_rate_rounds_ties_up() {
        let chart = ChartConfig::from_series(
            &[series("CCAA 13 Madrid", &[(date(2024, 6), 10.125)])],
            GeoLevel::Region,
        )
        .unwrap();
        let lines = chart.data.datasets[0].tooltip_lines(0).unwrap();
        assert_eq!(lines[2], "Tasa: 10.13 por 1000 hab");
    }
}
