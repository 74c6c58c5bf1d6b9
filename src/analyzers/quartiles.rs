use crate::analyzers::types::{MunicipalityAggregate, QuartileBands, QuartileSummary};
use crate::analyzers::utility::{mean, percentile};
use anyhow::{Result, bail};

/// Multiplier of the IQR used for the box plot fences.
pub const FENCE_FACTOR: f64 = 1.5;

/// Computes quartiles, band counts and fences of the per-municipality totals.
///
/// # Errors
///
/// Fails when the aggregate is empty; there is nothing to describe.
pub fn summarize(by_municipality: &MunicipalityAggregate) -> Result<QuartileSummary> {
    let values: Vec<f64> = by_municipality.values().into_iter().map(|v| v as f64).collect();
    summarize_values(&values)
}

/// Same as [`summarize`] over raw values in any order.
pub fn summarize_values(values: &[f64]) -> Result<QuartileSummary> {
    if values.is_empty() {
        bail!("cannot summarize an empty distribution");
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let quantile = |p| percentile(&sorted, p).unwrap_or_default();
    let q1 = quantile(0.25);
    let median = quantile(0.5);
    let q3 = quantile(0.75);
    let iqr = q3 - q1;
    let lower_fence = q1 - FENCE_FACTOR * iqr;
    let upper_fence = q3 + FENCE_FACTOR * iqr;

    let mut bands = QuartileBands::default();
    for &v in &sorted {
        if v <= q1 {
            bands.lower += 1;
        } else if v <= median {
            bands.lower_middle += 1;
        } else if v <= q3 {
            bands.upper_middle += 1;
        } else {
            bands.upper += 1;
        }
    }

    let outliers = sorted
        .iter()
        .filter(|&&v| v < lower_fence || v > upper_fence)
        .count();

    Ok(QuartileSummary {
        count: sorted.len(),
        min: sorted[0],
        q1,
        median,
        q3,
        max: sorted[sorted.len() - 1],
        mean: mean(&sorted),
        iqr,
        lower_fence,
        upper_fence,
        outliers,
        bands,
    })
}
