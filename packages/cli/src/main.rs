#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the crime atlas.
//!
//! Each subcommand drives one of the view controllers against the
//! statistics API and prints or writes its result. Without a subcommand an
//! interactive menu walks through the same operations.
//!
//! Uses `indicatif-log-bridge` (via [`crime_atlas_cli_utils::init_logger`])
//! so that log lines and spinners never fight for the terminal.

mod commands;
mod interactive;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use crime_atlas_api::{ApiConfig, HttpCrimeDataApi};
use crime_atlas_crime_models::GeoLevel;
use crime_atlas_geography::GeometrySource;
use crime_atlas_views::{ComparisonRequest, MapFilters};

use crate::commands::Context;

#[derive(Parser)]
#[command(name = "crime_atlas", about = "Regional crime statistics maps and comparisons")]
struct Cli {
    /// Base URL of the statistics API (overrides `CRIME_ATLAS_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the periods with data, newest first
    Periods,
    /// List the offence categories
    Categories,
    /// Render a choropleth map as styled `GeoJSON` plus legend
    Map {
        /// Administrative level (nacional, ccaa, provincia, municipio)
        #[arg(long, default_value = "ccaa")]
        level: GeoLevel,
        /// Period as `YYYY-MM-DD` (default: 2024-06-01)
        #[arg(long)]
        period: Option<NaiveDate>,
        /// Offence category (default: all)
        #[arg(long)]
        category: Option<String>,
        /// Directory or URL holding the level geometry files (overrides
        /// `CRIME_ATLAS_GEOMETRY`)
        #[arg(long)]
        geometry: Option<String>,
        /// Write the map document here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Print the info panel for this geometry name (repeatable)
        #[arg(long)]
        inspect: Vec<String>,
    },
    /// List the locations that can be compared at a level
    Locations {
        /// Administrative level
        #[arg(long, default_value = "ccaa")]
        level: GeoLevel,
    },
    /// Compare the evolution of one or two locations
    Compare {
        /// Primary location, as listed by `locations`
        #[arg(long)]
        geo1: String,
        /// Second location
        #[arg(long)]
        geo2: Option<String>,
        /// Administrative level
        #[arg(long, default_value = "ccaa")]
        level: GeoLevel,
        /// Offence category (default: all)
        #[arg(long)]
        category: Option<String>,
        /// Write the chart configuration here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Check the API and database health
    Health,
}

fn map_filters(level: GeoLevel, period: Option<NaiveDate>, category: Option<String>) -> MapFilters {
    let defaults = MapFilters::default();
    MapFilters {
        level,
        period: period.unwrap_or(defaults.period),
        category: category.filter(|c| !c.trim().is_empty()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_atlas_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = cli
        .api_url
        .as_deref()
        .map_or_else(ApiConfig::from_env, ApiConfig::new);
    log::debug!("Using API at {}", config.base_url);

    let mut ctx = Context {
        api: Arc::new(HttpCrimeDataApi::new(config)),
        geometry: GeometrySource::from_env(),
        multi,
    };

    let Some(command) = cli.command else {
        return interactive::run(&ctx).await;
    };

    match command {
        Commands::Periods => commands::periods(&ctx).await?,
        Commands::Categories => commands::categories(&ctx).await?,
        Commands::Map {
            level,
            period,
            category,
            geometry,
            output,
            inspect,
        } => {
            if let Some(location) = geometry {
                ctx.geometry = GeometrySource::parse(&location);
            }
            let filters = map_filters(level, period, category);
            commands::map(&ctx, filters, &inspect, output.as_deref()).await?;
        }
        Commands::Locations { level } => commands::locations(&ctx, level).await,
        Commands::Compare {
            geo1,
            geo2,
            level,
            category,
            output,
        } => {
            let request = ComparisonRequest {
                level,
                geo1,
                geo2,
                category,
            };
            commands::compare(&ctx, &request, output.as_deref()).await?;
        }
        Commands::Health => commands::health(&ctx).await?,
    }

    Ok(())
}
