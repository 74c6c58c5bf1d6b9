//! Decoder for the ISP monthly CSV export.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

/// One row of the monthly dataset. Columns other than these are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    pub munic: String,
    pub ano: i32,
    /// Blank cells deserialize to `None` and count as zero when summed.
    pub hom_doloso: Option<u64>,
}

impl RawRecord {
    pub fn new(munic: &str, ano: i32, hom_doloso: u64) -> Self {
        Self {
            munic: munic.to_string(),
            ano,
            hom_doloso: Some(hom_doloso),
        }
    }

    pub fn homicides(&self) -> u64 {
        self.hom_doloso.unwrap_or(0)
    }
}

/// Columns every export must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = ["munic", "ano", "hom_doloso"];

/// Decodes Latin-1 bytes and parses the `;`-delimited table.
///
/// Uses the WINDOWS-1252 table, which agrees with ISO-8859-1 on every
/// printable character the export contains.
///
/// # Errors
///
/// Returns an error when a required column is absent from the header, or on
/// the first row the CSV reader rejects.
pub fn parse_dataset(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let (text, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
    if had_errors {
        debug!("Dataset contained bytes outside the Latin-1 table");
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().context("unreadable header row")?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            bail!("missing column `{column}`");
        }
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize().enumerate() {
        let record: RawRecord = result.with_context(|| format!("malformed row {}", idx + 1))?;
        rows.push(record);
    }

    debug!(rows = rows.len(), "Dataset parsed");
    Ok(rows)
}
