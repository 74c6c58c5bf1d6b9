//! Grouped sums and descriptive statistics over the parsed dataset.
//!
//! [`aggregate`] folds raw monthly rows into per-municipality and per-year
//! totals; [`quartiles`] describes the spread of the municipality totals.

pub mod aggregate;
pub mod quartiles;
pub mod types;
pub mod utility;

pub use quartiles::summarize;
pub use types::{Aggregates, MunicipalityAggregate, QuartileBands, QuartileSummary, YearAggregate};
