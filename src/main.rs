//! ReelDB report runner
//!
//! Usage: `reeldb [dataset] [report|all] [fixture_dir]`
//!
//! Loads a JSON fixture dataset and prints every record of the selected
//! movie reports as one JSON line.

use std::env;

use reeldb::config::LoaderConfig;
use reeldb::database::Database;
use reeldb::movies::{self, Report};
use reeldb::storage::JsonFixtureSource;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let dataset = args.get(1).map(String::as_str).unwrap_or("movies");
    let reports: Vec<Report> = match args.get(2).map(String::as_str) {
        None | Some("all") => Report::ALL.to_vec(),
        Some(name) => vec![name.parse::<Report>()?],
    };

    let mut config = LoaderConfig::from_env()?;
    if let Some(dir) = args.get(3) {
        config = config.with_fixture_dir(dir);
    }

    tracing::info!(dataset, fixture_dir = ?config.fixture_dir, "Starting ReelDB");

    let source = JsonFixtureSource::new(&config.fixture_dir);
    let catalog = movies::schema()?;
    let db = Database::from_existing(&source, dataset, &catalog, &config).await?;

    for report in reports {
        let records = if report.is_single_row() {
            vec![db.select_single_row(&report.query())?]
        } else {
            db.select_multiple_rows(&report.query())?
        };
        for record in records {
            println!(
                "{}",
                serde_json::json!({ "report": report.name(), "record": record })
            );
        }
    }

    db.close();
    Ok(())
}
