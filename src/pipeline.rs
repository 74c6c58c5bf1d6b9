//! Acquisition stage: load, decode and aggregate the dataset in one step.

use anyhow::{Context, Result};
use tracing::info;

use crate::analyzers::Aggregates;
use crate::fetch::{HttpClient, load_source};
use crate::parser::parse_dataset;

/// Loads `source` and derives both aggregate tables.
///
/// Any failure is reported as a data acquisition failure; no aggregate is
/// produced from a partial download or a partially parsed file.
pub async fn acquire<C: HttpClient>(client: &C, source: &str) -> Result<Aggregates> {
    info!(source, "Fetching dataset");

    let aggregates = async {
        let bytes = load_source(client, source).await?;
        let rows = parse_dataset(&bytes)?;
        Ok::<_, anyhow::Error>(Aggregates::from_records(&rows))
    }
    .await
    .context("data acquisition failed")?;

    info!(
        municipalities = aggregates.by_municipality.len(),
        years = aggregates.by_year.len(),
        total = aggregates.by_year.total(),
        "Dataset aggregated"
    );

    Ok(aggregates)
}
