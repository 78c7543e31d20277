//! Interactive menu for the crime atlas.
//!
//! Provides a `dialoguer` interface for the same operations as the
//! subcommands, picking levels, periods, categories and locations from the
//! values the API actually serves.

use std::path::PathBuf;

use crime_atlas_api::CrimeDataApi;
use crime_atlas_cli_utils::with_spinner;
use crime_atlas_crime_models::GeoLevel;
use crime_atlas_views::format::month_long;
use crime_atlas_views::{ComparisonRequest, ComparisonView, MapFilters};
use dialoguer::{Input, Select};

use crate::commands::{self, Context};

/// Label of the "no category filter" entry.
const ALL_CATEGORIES: &str = "Todos los delitos";

/// Label of the "no second location" entry.
const NO_SECOND_LOCATION: &str = "Sin comparar";

/// Top-level actions available in the menu.
enum Action {
    Map,
    Compare,
    Periods,
    Categories,
    Health,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Map,
        Self::Compare,
        Self::Periods,
        Self::Categories,
        Self::Health,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Map => "Render a map",
            Self::Compare => "Compare locations",
            Self::Periods => "List periods",
            Self::Categories => "List offence categories",
            Self::Health => "Check API health",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt, a request or writing the output fails.
pub async fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    println!("Crime Atlas");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Map => map(ctx).await?,
        Action::Compare => compare(ctx).await?,
        Action::Periods => commands::periods(ctx).await?,
        Action::Categories => commands::categories(ctx).await?,
        Action::Health => commands::health(ctx).await?,
    }

    Ok(())
}

fn select_level(levels: &[GeoLevel]) -> Result<GeoLevel, Box<dyn std::error::Error>> {
    let labels: Vec<&str> = levels.iter().map(|l| l.label()).collect();
    let default = levels
        .iter()
        .position(|&l| l == GeoLevel::default())
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Level")
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(levels[idx])
}

async fn select_category(ctx: &Context) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let mut categories =
        with_spinner(&ctx.multi, "Fetching categories...", ctx.api.categories()).await?;

    let mut labels = vec![ALL_CATEGORIES.to_string()];
    labels.extend(categories.iter().cloned());

    let idx = Select::new()
        .with_prompt("Offence category")
        .items(&labels)
        .default(0)
        .max_length(20)
        .interact()?;

    Ok(if idx == 0 {
        None
    } else {
        Some(categories.swap_remove(idx - 1))
    })
}

fn prompt_output(default: PathBuf) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let path: String = Input::new()
        .with_prompt("Output file (empty for stdout)")
        .default(default.display().to_string())
        .allow_empty(true)
        .interact_text()?;

    let path = path.trim();
    Ok((!path.is_empty()).then(|| PathBuf::from(path)))
}

async fn map(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let level = select_level(GeoLevel::all())?;

    let periods = with_spinner(&ctx.multi, "Fetching periods...", ctx.api.periods()).await?;
    if periods.is_empty() {
        println!("No periods available.");
        return Ok(());
    }
    let labels: Vec<String> = periods
        .iter()
        .map(|&p| format!("{} ({p})", month_long(p)))
        .collect();
    let default = periods
        .iter()
        .position(|&p| p == MapFilters::default().period)
        .unwrap_or(0);
    let idx = Select::new()
        .with_prompt("Period")
        .items(&labels)
        .default(default)
        .max_length(20)
        .interact()?;

    let category = select_category(ctx).await?;

    let filters = MapFilters {
        level,
        period: periods[idx],
        category,
    };
    let output = prompt_output(commands::default_map_path(&filters))?;

    let inspect: String = Input::new()
        .with_prompt("Regions to inspect (comma-separated, empty for none)")
        .allow_empty(true)
        .interact_text()?;
    let inspect: Vec<String> = inspect
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    commands::map(ctx, filters, &inspect, output.as_deref()).await
}

async fn compare(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let level = select_level(GeoLevel::all())?;

    let mut view = ComparisonView::new(ctx.api.clone());
    let locations = with_spinner(
        &ctx.multi,
        "Fetching locations...",
        view.load_locations(level),
    )
    .await
    .to_vec();
    if locations.is_empty() {
        println!("No locations available.");
        return Ok(());
    }

    let names: Vec<&str> = locations.iter().map(|l| l.name.as_str()).collect();
    let first = Select::new()
        .with_prompt("Location")
        .items(&names)
        .default(0)
        .max_length(20)
        .interact()?;

    let mut second_labels = vec![NO_SECOND_LOCATION];
    second_labels.extend(names.iter().copied());
    let second = Select::new()
        .with_prompt("Compare with")
        .items(&second_labels)
        .default(0)
        .max_length(20)
        .interact()?;

    let category = select_category(ctx).await?;

    let request = ComparisonRequest {
        level,
        geo1: locations[first].geo.clone(),
        geo2: (second > 0).then(|| locations[second - 1].geo.clone()),
        category,
    };
    let output = prompt_output(PathBuf::from("comparativa.json"))?;

    commands::compare(ctx, &request, output.as_deref()).await
}
