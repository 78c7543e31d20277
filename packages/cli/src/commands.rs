//! Command implementations shared by the subcommands and the interactive
//! menu.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crime_atlas_api::{CrimeDataApi, HttpCrimeDataApi};
use crime_atlas_choropleth::Legend;
use crime_atlas_cli_utils::{MultiProgress, with_spinner};
use crime_atlas_crime_models::GeoLevel;
use crime_atlas_geography::GeometrySource;
use crime_atlas_views::format::month_long;
use crime_atlas_views::map::StyledLayer;
use crime_atlas_views::{
    CommitOutcome, ComparisonOutcome, ComparisonRequest, ComparisonView, InfoPanel, MapFilters,
    MapView, StatusMessage,
};
use geojson::FeatureCollection;
use serde::Serialize;

/// Backends and terminal handles every command needs.
pub struct Context {
    pub api: Arc<HttpCrimeDataApi>,
    pub geometry: GeometrySource,
    pub multi: MultiProgress,
}

impl Context {
    fn data_api(&self) -> Arc<dyn CrimeDataApi> {
        self.api.clone()
    }
}

/// Map output written by `map`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapDocument<'a> {
    filters: &'a MapFilters,
    legend: Option<&'a Legend>,
    layer: Option<&'a FeatureCollection>,
    info: Vec<InfoPanel>,
}

/// Writes `body` to `output`, or to stdout when no path is given.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_output(output: Option<&Path>, body: &str) -> std::io::Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, body)?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{body}"),
    }
    Ok(())
}

/// Lists the available periods, newest first.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn periods(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let periods = with_spinner(&ctx.multi, "Fetching periods...", ctx.api.periods()).await?;
    for period in &periods {
        println!("{period}  {}", month_long(*period));
    }
    log::info!("{} periods", periods.len());
    Ok(())
}

/// Lists the offence categories.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn categories(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let categories =
        with_spinner(&ctx.multi, "Fetching categories...", ctx.api.categories()).await?;
    for category in &categories {
        println!("{category}");
    }
    Ok(())
}

/// Renders the choropleth for `filters` and writes it as JSON.
///
/// `inspect` lists geometry names whose info panel is included in the
/// output and printed.
///
/// # Errors
///
/// Returns an error if the data cannot be fetched or the output cannot be
/// written.
pub async fn map(
    ctx: &Context,
    filters: MapFilters,
    inspect: &[String],
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = MapView::new(ctx.data_api(), Arc::new(ctx.geometry.clone()));
    let message = format!("Loading {} for {}...", filters.level.label(), filters.period);
    let outcome = with_spinner(&ctx.multi, &message, view.apply_filters(filters)).await;
    if outcome != CommitOutcome::Applied {
        return Err("Failed to load map data".into());
    }

    let state = view.state();
    if let Some(legend) = &state.legend {
        eprint!("{}", legend.render_text());
    }
    if let Some(StyledLayer {
        matched, unmatched, ..
    }) = &state.layer
    {
        log::info!("{matched} regions colored, {unmatched} without data");
    }

    let info: Vec<InfoPanel> = inspect
        .iter()
        .map(|name| view.info_panel(Some(name)))
        .collect();
    for panel in &info {
        eprintln!("{}", panel.render_text());
    }

    let document = MapDocument {
        filters: &state.filters,
        legend: state.legend.as_ref(),
        layer: state.layer.as_ref().map(|l| &l.collection),
        info,
    };
    write_output(output, &serde_json::to_string_pretty(&document)?)?;
    Ok(())
}

/// Prints the location picker entries for `level`.
pub async fn locations(ctx: &Context, level: GeoLevel) {
    let mut view = ComparisonView::new(ctx.data_api());
    let locations = with_spinner(
        &ctx.multi,
        "Fetching locations...",
        view.load_locations(level),
    )
    .await;
    for location in locations {
        println!("{}\t{}", location.geo, location.name);
    }
}

/// Builds the comparison chart and writes it as JSON, or prints the status
/// message when there is no chart.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub async fn compare(
    ctx: &Context,
    request: &ComparisonRequest,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = ComparisonView::new(ctx.data_api());
    let outcome = with_spinner(
        &ctx.multi,
        StatusMessage::Loading.text(),
        view.compare(request),
    )
    .await;
    match outcome {
        ComparisonOutcome::Chart(chart) => {
            write_output(output, &serde_json::to_string_pretty(&chart)?)?;
        }
        ComparisonOutcome::Message(message) => println!("{}", message.text()),
    }
    Ok(())
}

/// Reports the backend health.
///
/// # Errors
///
/// Returns an error if the request fails or the backend is unhealthy.
pub async fn health(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let health = with_spinner(&ctx.multi, "Checking health...", ctx.api.health()).await?;
    println!("api:      {}", health.api);
    println!("database: {}", health.database);
    if let Some(info) = health.database_info_text() {
        println!("info:     {info}");
    }
    if health.is_healthy() {
        Ok(())
    } else {
        Err(format!("{} is unhealthy", ctx.api.base_url()).into())
    }
}

/// Default path for a map written by the interactive menu.
#[must_use]
pub fn default_map_path(filters: &MapFilters) -> PathBuf {
    PathBuf::from(format!("mapa_{}_{}.json", filters.level, filters.period))
}
