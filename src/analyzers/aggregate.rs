use crate::analyzers::types::{Aggregates, MunicipalityAggregate, YearAggregate};
use crate::parser::RawRecord;
use std::collections::BTreeMap;
use tracing::debug;

/// Sums `hom_doloso` per municipality. One output row per distinct name.
pub fn aggregate_by_municipality(rows: &[RawRecord]) -> MunicipalityAggregate {
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();

    for row in rows {
        *totals.entry(row.munic.clone()).or_default() += row.homicides();
    }

    MunicipalityAggregate(totals)
}

/// Sums `hom_doloso` per year. One output row per distinct year.
pub fn aggregate_by_year(rows: &[RawRecord]) -> YearAggregate {
    let mut totals: BTreeMap<i32, u64> = BTreeMap::new();

    for row in rows {
        *totals.entry(row.ano).or_default() += row.homicides();
    }

    YearAggregate(totals)
}

impl Aggregates {
    pub fn from_records(rows: &[RawRecord]) -> Self {
        let aggregates = Aggregates {
            by_municipality: aggregate_by_municipality(rows),
            by_year: aggregate_by_year(rows),
        };

        debug!(
            rows = rows.len(),
            municipalities = aggregates.by_municipality.len(),
            years = aggregates.by_year.len(),
            "Aggregated dataset"
        );

        aggregates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<RawRecord> {
        vec![
            RawRecord::new("A", 2020, 5),
            RawRecord::new("A", 2021, 3),
            RawRecord::new("B", 2020, 10),
        ]
    }

    #[test]
    fn test_aggregate_scenario() {
        let aggregates = Aggregates::from_records(&sample_rows());

        assert_eq!(aggregates.by_municipality.len(), 2);
        assert_eq!(aggregates.by_municipality.get("A"), Some(8));
        assert_eq!(aggregates.by_municipality.get("B"), Some(10));

        assert_eq!(aggregates.by_year.len(), 2);
        assert_eq!(aggregates.by_year.get(2020), Some(15));
        assert_eq!(aggregates.by_year.get(2021), Some(3));
    }

    #[test]
    fn test_totals_agree_with_raw_sum() {
        let rows = vec![
            RawRecord::new("Rio de Janeiro", 2019, 120),
            RawRecord::new("Niterói", 2019, 9),
            RawRecord::new("Rio de Janeiro", 2020, 98),
            RawRecord::new("Macaé", 2021, 14),
            RawRecord {
                munic: "Macaé".to_string(),
                ano: 2021,
                hom_doloso: None,
            },
            RawRecord::new("Niterói", 2022, 0),
        ];
        let raw: u64 = rows.iter().map(RawRecord::homicides).sum();

        let aggregates = Aggregates::from_records(&rows);

        assert_eq!(aggregates.by_municipality.total(), raw);
        assert_eq!(aggregates.by_year.total(), raw);
        assert_eq!(aggregates.by_municipality.len(), 3);
        assert_eq!(aggregates.by_year.len(), 4);
    }

    #[test]
    fn test_year_order_is_chronological() {
        let rows = vec![
            RawRecord::new("A", 2022, 1),
            RawRecord::new("A", 2003, 1),
            RawRecord::new("A", 2010, 1),
        ];

        let years: Vec<i32> = aggregate_by_year(&rows).iter().map(|(y, _)| y).collect();

        assert_eq!(years, vec![2003, 2010, 2022]);
    }

    #[test]
    fn test_empty_input() {
        let aggregates = Aggregates::from_records(&[]);
        assert!(aggregates.by_municipality.is_empty());
        assert!(aggregates.by_year.is_empty());
        assert_eq!(aggregates.by_year.first_year(), None);
    }

    #[test]
    fn test_top_is_descending_and_stable() {
        let rows = vec![
            RawRecord::new("D", 2020, 7),
            RawRecord::new("C", 2020, 9),
            RawRecord::new("B", 2020, 7),
            RawRecord::new("A", 2020, 1),
        ];

        let by_munic = aggregate_by_municipality(&rows);
        let top = by_munic.top(3);

        // B and D tie; key order puts B first.
        assert_eq!(top, vec![("C", 9), ("B", 7), ("D", 7)]);
    }

    #[test]
    fn test_top_length_is_capped() {
        let rows: Vec<_> = (0..20)
            .map(|i| RawRecord::new(&format!("M{i:02}"), 2020, i))
            .collect();
        let by_munic = aggregate_by_municipality(&rows);

        let top = by_munic.top(15);
        assert_eq!(top.len(), 15);
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
        assert_eq!(top[0], ("M19", 19));

        assert_eq!(by_munic.top(50).len(), 20);
    }
}
