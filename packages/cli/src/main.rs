#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line inspection of the GlobeTrotter city catalog.
//!
//! ```text
//! globetrotter summary
//! globetrotter cities [--limit 20] [--json]
//! globetrotter featured [--json]
//! globetrotter resolve <city> [--tried <url>]
//! globetrotter diagnostics
//! ```
//!
//! Configuration is read from the environment (see
//! [`CatalogConfig::from_env`]); the global flags override it.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use globetrotter_catalog::{CatalogConfig, init_catalog, report};
use globetrotter_catalog_models::CityRecord;

#[derive(Parser)]
#[command(name = "globetrotter", about = "Inspect the GlobeTrotter city catalog")]
struct Cli {
    /// Heritage dataset file (`.json` or `.csv`)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Image tables TOML file
    #[arg(long, global = true)]
    image_tables: Option<PathBuf>,

    /// Visitor total that maps to a popularity score of 100
    #[arg(long, global = true)]
    reference_visitors: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the catalog summary report
    Summary,
    /// List catalog cities in ranking order
    Cities {
        /// Maximum number of cities to show
        #[arg(long)]
        limit: Option<usize>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List the featured cities
    Featured {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Resolve the image for a city
    Resolve {
        /// City name
        city: String,
        /// Source that failed to load; prints the fallback instead
        #[arg(long)]
        tried: Option<String>,
    },
    /// List rows that were skipped while aggregating the dataset
    Diagnostics,
}

impl Cli {
    fn config(&self) -> Result<CatalogConfig, globetrotter_catalog::CatalogError> {
        let mut config = CatalogConfig::from_env()?;
        if let Some(path) = &self.dataset {
            config.dataset_path = Some(path.clone());
        }
        if let Some(path) = &self.image_tables {
            config.image_tables_path = Some(path.clone());
        }
        if let Some(reference_visitors) = self.reference_visitors {
            config.reference_visitors = reference_visitors;
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let build = init_catalog(&cli.config()?)?;

    match cli.command {
        Commands::Summary => {
            let summary = build.catalog.summary(&build.resolver, &build.aggregation);
            println!("Cities:            {}", summary.total_cities);
            println!("Featured:          {}", summary.featured_count);
            println!("Curated images:    {}", summary.custom_image_count);
            println!("Local images:      {}", summary.local_image_count);
            println!("Skipped rows:      {}", summary.skipped_rows);
            println!("Processing errors: {}", summary.processing_errors);
            println!("Total rows:        {}", summary.excluded_totals);
            println!();
            print_table(&summary.sample);
        }
        Commands::Cities { limit, json } => {
            let records = build.catalog.records();
            let records = &records[..limit.map_or(records.len(), |l| l.min(records.len()))];
            if json {
                println!("{}", serde_json::to_string_pretty(records)?);
            } else {
                print_table(records);
            }
        }
        Commands::Featured { json } => {
            let featured = build.catalog.featured();
            if json {
                println!("{}", serde_json::to_string_pretty(&featured)?);
            } else {
                print_table(&featured);
            }
        }
        Commands::Resolve { city, tried } => {
            let resolved = match tried {
                Some(tried) => build.resolver.resolve_fallback_with_source(&city, &tried),
                None => build.resolver.resolve_with_source(&city),
            };
            println!("{} ({})", resolved.url, resolved.source);
        }
        Commands::Diagnostics => {
            if build.aggregation.diagnostics.is_empty() {
                println!("No rows skipped.");
            }
            for diagnostic in &build.aggregation.diagnostics {
                println!("{}", report::format_diagnostic(diagnostic));
            }
        }
    }

    Ok(())
}

fn print_table(records: &[CityRecord]) {
    println!(
        "{:>3}  {:<16} {:>10} {:>5} {:>6} {:>8}  {}",
        "ID", "CITY", "POPULARITY", "COST", "RATING", "VISITORS", "IMAGE"
    );
    for record in records {
        println!(
            "{:>3}  {:<16} {:>10} {:>5} {:>6.1} {:>8}  {}",
            record.id,
            record.name,
            record.popularity_score,
            record.cost_index,
            record.rating,
            record.travelers_label,
            record.image_url
        );
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from([
            "globetrotter",
            "cities",
            "--limit",
            "5",
            "--reference-visitors",
            "2000000",
        ]);
        assert!((cli.reference_visitors.unwrap() - 2_000_000.0).abs() < f64::EPSILON);
        assert!(matches!(
            cli.command,
            Commands::Cities {
                limit: Some(5),
                json: false
            }
        ));
    }

    #[test]
    fn resolve_takes_city_and_tried() {
        let cli = Cli::parse_from(["globetrotter", "resolve", "Leh Mini", "--tried", "/x.jpg"]);
        let Commands::Resolve { city, tried } = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(city, "Leh Mini");
        assert_eq!(tried.as_deref(), Some("/x.jpg"));
    }
}
