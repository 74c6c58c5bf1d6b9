//! Pure layout computations for the histogram and box plot panels.

use crate::analyzers::QuartileSummary;

/// One equal-width histogram bin, `[lo, hi)` except the last which is `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Splits `[min, max]` of `values` into `bins` equal-width bins and counts members.
///
/// A zero-width range is widened to `[v - 0.5, v + 0.5]`. Empty input or
/// zero bins yields no bins.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lo: lo + width * i as f64,
            hi: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for &v in values {
        let mut idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        // Rounding can land a value on the wrong side of an interior edge.
        while idx > 0 && v < out[idx].lo {
            idx -= 1;
        }
        while idx + 1 < bins && v >= out[idx].hi {
            idx += 1;
        }
        out[idx].count += 1;
    }

    out
}

/// Whisker ends and fliers of a Tukey box plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Whiskers {
    pub low: f64,
    pub high: f64,
    pub fliers: Vec<f64>,
}

/// Whiskers reach the most extreme values still inside the fences.
pub fn whiskers(values: &[f64], summary: &QuartileSummary) -> Whiskers {
    let inside = values
        .iter()
        .copied()
        .filter(|v| *v >= summary.lower_fence && *v <= summary.upper_fence);

    let (low, high) = inside.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    let fliers = values
        .iter()
        .copied()
        .filter(|v| *v < summary.lower_fence || *v > summary.upper_fence)
        .collect();

    // Only reachable for empty input.
    if low > high {
        return Whiskers {
            low: summary.q1,
            high: summary.q3,
            fliers,
        };
    }

    Whiskers {
        low: low.min(summary.q1),
        high: high.max(summary.q3),
        fliers,
    }
}
