use std::process::ExitCode;

use tracing::{error, info};

use fahrplan_extract::config::ExtractConfig;
use fahrplan_extract::crawl::{ExtractionReport, Extractor};
use fahrplan_extract::error::ExtractError;
use fahrplan_extract::fahrplan::FahrplanClient;
use fahrplan_extract::stations::load_stations;
use fahrplan_extract::store::{DocumentStore, JsonLinesStore};
use fahrplan_extract::telemetry::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ExtractConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.log_file) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(report) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("extraction aborted: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Check settings and load stations first; the previous run's output is only
/// cleared once the run can actually start.
async fn run(config: ExtractConfig) -> Result<ExtractionReport, ExtractError> {
    config.check_required()?;

    let mut stations = Vec::new();
    if let Some(source) = &config.stations_source {
        info!(source = %source, "loading stations");
        stations = load_stations(source, config.delimiter).await?;
    }

    let client = FahrplanClient::new(config.fahrplan_config())?;

    let store = JsonLinesStore::open(config.output_dir.clone())?;
    store.clear_all()?;
    info!(dir = %store.dir().display(), "cleared output collections");

    let mut extractor = Extractor::new(client, store, config.crawl_config());
    extractor.load_stations(stations)?;

    info!(date = %config.date, "starting extraction");
    Ok(extractor.run().await?)
}

fn print_summary(report: &ExtractionReport) {
    println!();
    println!("Stations crawled:  {}", report.stations.len());
    println!("  failed:          {}", report.failed_stations().count());
    println!("Trains accepted:   {}", report.trains_accepted());
    println!("Details stored:    {}", report.details_stored());
    println!("  failed:          {}", report.failed_details().count());
}
