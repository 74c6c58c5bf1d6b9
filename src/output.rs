//! Console output for the summary, ranking and yearly tables.
//!
//! Reports go to stdout; status lines go through `tracing` on stderr.

use anyhow::Result;
use std::fmt::Write;
use tracing::debug;

use crate::analyzers::{MunicipalityAggregate, QuartileSummary, YearAggregate};

/// Renders the quartile summary with a short plain-language reading.
pub fn format_report(summary: &QuartileSummary) -> String {
    let mut out = String::new();
    let b = &summary.bands;

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Intentional homicides per municipality");
    let _ = writeln!(out, "  municipalities     {:>12}", summary.count);
    let _ = writeln!(out, "  minimum            {:>12.2}", summary.min);
    let _ = writeln!(out, "  Q1 (25%)           {:>12.2}", summary.q1);
    let _ = writeln!(out, "  median (50%)       {:>12.2}", summary.median);
    let _ = writeln!(out, "  Q3 (75%)           {:>12.2}", summary.q3);
    let _ = writeln!(out, "  maximum            {:>12.2}", summary.max);
    let _ = writeln!(out, "  mean               {:>12.2}", summary.mean);
    let _ = writeln!(out, "  IQR (Q3 - Q1)      {:>12.2}", summary.iqr);
    let _ = writeln!(out);
    let _ = writeln!(out, "Municipalities per quartile band");
    let _ = writeln!(out, "  <= Q1              {:>12}", b.lower);
    let _ = writeln!(out, "  Q1 < x <= median   {:>12}", b.lower_middle);
    let _ = writeln!(out, "  median < x <= Q3   {:>12}", b.upper_middle);
    let _ = writeln!(out, "  > Q3               {:>12}", b.upper);
    let _ = writeln!(out);
    let _ = writeln!(out, "Reading");
    let _ = writeln!(
        out,
        "  A quarter of the municipalities recorded at most {:.0} homicides.",
        summary.q1
    );
    let _ = writeln!(
        out,
        "  Half recorded at most {:.0}; a quarter recorded more than {:.0}.",
        summary.median, summary.q3
    );
    let _ = writeln!(
        out,
        "  The middle half of the municipalities spans {:.0} homicides.",
        summary.iqr
    );
    if summary.mean > summary.median {
        let _ = writeln!(
            out,
            "  The mean ({:.0}) exceeds the median: a few municipalities concentrate the cases.",
            summary.mean
        );
    }
    let _ = writeln!(
        out,
        "  {} municipalities lie beyond the box plot fences [{:.0}, {:.0}].",
        summary.outliers, summary.lower_fence, summary.upper_fence
    );

    out
}

/// Prints [`format_report`] to stdout.
pub fn print_report(summary: &QuartileSummary) {
    print!("{}", format_report(summary));
}

/// Prints the summary as pretty-printed JSON.
pub fn print_json(summary: &QuartileSummary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Renders the top `limit` municipalities, highest first.
pub fn format_ranking(by_municipality: &MunicipalityAggregate, limit: usize) -> String {
    let top = by_municipality.top(limit);
    debug!(limit, rows = top.len(), "Formatting ranking");

    let width = top.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (rank, (name, total)) in top.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {:<width$}  {:>8}", rank + 1, name, total);
    }
    out
}

/// Renders one `year total` line per year, oldest first.
pub fn format_yearly(by_year: &YearAggregate) -> String {
    let mut out = String::new();
    for (year, total) in by_year.iter() {
        let _ = writeln!(out, "{year}  {total:>8}");
    }
    out
}
