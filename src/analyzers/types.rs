//! Tables and summaries produced by the analysis stage.

use serde::Serialize;
use std::collections::BTreeMap;

/// Total intentional homicides per municipality, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MunicipalityAggregate(pub(crate) BTreeMap<String, u64>);

impl MunicipalityAggregate {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, munic: &str) -> Option<u64> {
        self.0.get(munic).copied()
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Rows in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Totals in key order.
    pub fn values(&self) -> Vec<u64> {
        self.0.values().copied().collect()
    }

    /// The `n` municipalities with the highest totals, descending.
    ///
    /// The sort is stable, so ties keep key order.
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut rows: Vec<_> = self.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows.truncate(n);
        rows
    }
}

/// Total intentional homicides per year, in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearAggregate(pub(crate) BTreeMap<i32, u64>);

impl YearAggregate {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, year: i32) -> Option<u64> {
        self.0.get(&year).copied()
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, u64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn first_year(&self) -> Option<i32> {
        self.0.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.0.keys().next_back().copied()
    }
}

/// Both tables derived from one parse of the dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregates {
    pub by_municipality: MunicipalityAggregate,
    pub by_year: YearAggregate,
}

/// Municipality counts in each quartile band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuartileBands {
    /// `v <= Q1`
    pub lower: usize,
    /// `Q1 < v <= median`
    pub lower_middle: usize,
    /// `median < v <= Q3`
    pub upper_middle: usize,
    /// `v > Q3`
    pub upper: usize,
}

impl QuartileBands {
    pub fn total(&self) -> usize {
        self.lower + self.lower_middle + self.upper_middle + self.upper
    }
}

/// Descriptive statistics of the per-municipality totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuartileSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    pub iqr: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    /// Municipalities outside `[lower_fence, upper_fence]`.
    pub outliers: usize,
    pub bands: QuartileBands,
}
