//! Retrieval of the raw dataset, either over HTTP or from a local file.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

/// Published monthly statistics per police district (CISP) from ISP-RJ.
pub const DATASET_URL: &str =
    "https://www.ispdados.rj.gov.br/Arquivos/BaseDPEvolucaoMensalCisp.csv";

/// Issues a single GET and returns the body. Non-success statuses are errors.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    let bytes = resp.bytes().await?;
    debug!(url, bytes = bytes.len(), "Dataset body received");
    Ok(bytes.to_vec())
}

/// Loads the dataset from a local file path or fetches it over HTTP.
#[tracing::instrument(skip(client))]
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http") {
        fetch_bytes(client, source)
            .await
            .with_context(|| format!("failed to download {source}"))
    } else {
        std::fs::read(source).with_context(|| format!("failed to read {source}"))
    }
}
