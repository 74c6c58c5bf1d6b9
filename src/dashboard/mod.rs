//! Four-panel dashboard of the aggregated homicide data.
//!
//! The figure is rasterised with the [`plotters`] bitmap backend into a PNG and
//! then handed to the platform image viewer by [`display`].

pub mod display;
pub mod geometry;

use crate::analyzers::{Aggregates, MunicipalityAggregate, QuartileSummary, YearAggregate};
use chrono::Local;
use geometry::{histogram_bins, whiskers};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while drawing or showing the dashboard
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save figure: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Failed to open the image viewer: {0}")]
    Display(#[source] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, RenderError>;

pub const FIGURE_SIZE: (u32, u32) = (2000, 1500);
pub const HISTOGRAM_BINS: usize = 30;
pub const RANKING_SIZE: usize = 15;

const TITLE: &str = "Intentional Homicides in Rio de Janeiro";

const ROYAL_BLUE: RGBColor = RGBColor(65, 105, 225);
const FIREBRICK: RGBColor = RGBColor(178, 34, 34);
const FOREST_GREEN: RGBColor = RGBColor(34, 139, 34);
const GOLD: RGBColor = RGBColor(255, 215, 0);

fn drawing_area<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::DrawingArea(e.to_string())
}

fn chart_config<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::ChartConfig(e.to_string())
}

fn drawing<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

fn grid_style() -> RGBAColor {
    BLACK.mix(0.15)
}

/// Draws the 2x2 dashboard and writes it as a PNG to `output_path`.
///
/// Panels, row by row: histogram of municipality totals, top-15 ranking,
/// yearly series, box plot.
#[tracing::instrument(skip(aggregates, summary), fields(path = %output_path.display()))]
pub fn render_dashboard(
    aggregates: &Aggregates,
    summary: &QuartileSummary,
    output_path: &Path,
) -> Result<()> {
    if aggregates.by_municipality.is_empty() || aggregates.by_year.is_empty() {
        return Err(RenderError::InvalidData(
            "Aggregates cannot be empty".to_string(),
        ));
    }

    let values: Vec<f64> = aggregates
        .by_municipality
        .values()
        .into_iter()
        .map(|v| v as f64)
        .collect();

    let root = BitMapBackend::new(output_path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_area)?;

    let footer = format!(
        "Source: ISP-RJ monthly series per police district. Generated {}",
        Local::now().format("%Y-%m-%d %H:%M")
    );
    root.draw(&Text::new(
        footer,
        (20, FIGURE_SIZE.1 as i32 - 30),
        ("sans-serif", 16),
    ))
    .map_err(drawing)?;

    let titled = root
        .titled(TITLE, ("sans-serif", 44).into_font().style(FontStyle::Bold))
        .map_err(drawing_area)?;
    let body = titled.margin(0, 40, 0, 0);
    let panels = body.split_evenly((2, 2));

    draw_histogram(&panels[0], &values)?;
    draw_ranking(&panels[1], &aggregates.by_municipality)?;
    draw_timeline(&panels[2], &aggregates.by_year)?;
    draw_box_plot(&panels[3], &values, summary)?;

    root.present().map_err(drawing)?;
    info!("Dashboard rendered");

    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, values: &[f64]) -> Result<()> {
    let bins = histogram_bins(values, HISTOGRAM_BINS);
    let (x_lo, x_hi) = match (bins.first(), bins.last()) {
        (Some(first), Some(last)) => (first.lo, last.hi),
        _ => return Err(RenderError::InvalidData("No values to bin".to_string())),
    };
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0) as u32 + 1;
    debug!(bins = bins.len(), x_lo, x_hi, "Histogram layout");

    let mut chart = ChartBuilder::on(area)
        .caption("Where are the cases concentrated?", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, 0u32..y_max)
        .map_err(chart_config)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(grid_style())
        .light_line_style(TRANSPARENT)
        .x_desc("Total homicides")
        .y_desc("Municipalities")
        .label_style(("sans-serif", 16))
        .x_label_formatter(&|x| format!("{:.0}", x))
        .draw()
        .map_err(drawing)?;

    chart
        .draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.lo, 0), (b.hi, b.count as u32)], ROYAL_BLUE.filled())
        }))
        .map_err(drawing)?;
    chart
        .draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.lo, 0), (b.hi, b.count as u32)], BLACK.stroke_width(1))
        }))
        .map_err(drawing)?;

    Ok(())
}

fn draw_ranking<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    by_municipality: &MunicipalityAggregate,
) -> Result<()> {
    let top = by_municipality.top(RANKING_SIZE);
    let n = top.len();
    let x_max = (top.first().map(|(_, total)| *total).unwrap_or(0) * 11 / 10).max(1);

    // Row 0 is the bottom of the chart, so the highest total takes row n - 1.
    let names: Vec<&str> = top.iter().map(|(name, _)| *name).collect();
    let label = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) if *i < n => names[n - 1 - *i].to_string(),
        _ => String::new(),
    };

    let mut chart = ChartBuilder::on(area)
        .caption("Municipality ranking", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(240)
        .build_cartesian_2d(0u64..x_max, (0usize..n).into_segmented())
        .map_err(chart_config)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .bold_line_style(grid_style())
        .light_line_style(TRANSPARENT)
        .y_labels(n + 1)
        .y_label_formatter(&label)
        .x_desc("Total homicides")
        .label_style(("sans-serif", 16))
        .draw()
        .map_err(drawing)?;

    chart
        .draw_series(
            Histogram::horizontal(&chart)
                .style(FIREBRICK.filled())
                .margin(6)
                .data(
                    top.iter()
                        .enumerate()
                        .map(|(rank, (_, total))| (n - 1 - rank, *total)),
                ),
        )
        .map_err(drawing)?;

    Ok(())
}

fn draw_timeline<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, by_year: &YearAggregate) -> Result<()> {
    let points: Vec<(i32, u64)> = by_year.iter().collect();
    let (first, last) = match (by_year.first_year(), by_year.last_year()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(RenderError::InvalidData("No years to plot".to_string())),
    };
    let (x_lo, x_hi) = if first == last {
        (first - 1, last + 1)
    } else {
        (first, last)
    };
    let y_max = (points.iter().map(|(_, t)| *t).max().unwrap_or(0) * 11 / 10).max(1);

    let mut chart = ChartBuilder::on(area)
        .caption("Has violence risen or fallen?", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(90)
        .build_cartesian_2d(x_lo..x_hi, 0u64..y_max)
        .map_err(chart_config)?;

    chart
        .configure_mesh()
        .bold_line_style(grid_style())
        .light_line_style(TRANSPARENT)
        .x_labels((x_hi - x_lo + 1) as usize)
        .x_label_formatter(&|year| year.to_string())
        .label_style(("sans-serif", 16))
        .x_label_style(("sans-serif", 16).into_font().transform(FontTransform::Rotate90))
        .x_desc("Year")
        .y_desc("Total homicides in the state")
        .draw()
        .map_err(drawing)?;

    chart
        .draw_series(LineSeries::new(
            points.iter().copied(),
            FOREST_GREEN.stroke_width(2),
        ))
        .map_err(drawing)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, 5, FOREST_GREEN.filled())),
        )
        .map_err(drawing)?;

    Ok(())
}

fn draw_box_plot<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    values: &[f64],
    summary: &QuartileSummary,
) -> Result<()> {
    let w = whiskers(values, summary);
    let pad = (summary.max - summary.min).max(1.0) * 0.05;

    let mut chart = ChartBuilder::on(area)
        .caption("Statistical summary of the distribution", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(20)
        .build_cartesian_2d((summary.min - pad)..(summary.max + pad), 0.0f64..2.0f64)
        .map_err(chart_config)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .disable_y_axis()
        .bold_line_style(grid_style())
        .light_line_style(TRANSPARENT)
        .x_desc("Total homicides")
        .label_style(("sans-serif", 16))
        .x_label_formatter(&|x| format!("{:.0}", x))
        .draw()
        .map_err(drawing)?;

    let (box_lo, box_hi) = (0.7, 1.3);
    let (cap_lo, cap_hi) = (0.85, 1.15);

    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(summary.q1, box_lo), (summary.q3, box_hi)],
            GOLD.filled(),
        )))
        .map_err(drawing)?;
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(summary.q1, box_lo), (summary.q3, box_hi)],
            BLACK.stroke_width(2),
        )))
        .map_err(drawing)?;

    let segments = [
        // median
        vec![(summary.median, box_lo), (summary.median, box_hi)],
        // whiskers
        vec![(w.low, 1.0), (summary.q1, 1.0)],
        vec![(summary.q3, 1.0), (w.high, 1.0)],
        // caps
        vec![(w.low, cap_lo), (w.low, cap_hi)],
        vec![(w.high, cap_lo), (w.high, cap_hi)],
    ];
    chart
        .draw_series(
            segments
                .into_iter()
                .map(|points| PathElement::new(points, BLACK.stroke_width(2))),
        )
        .map_err(drawing)?;

    chart
        .draw_series(
            w.fliers
                .iter()
                .map(|&v| Circle::new((v, 1.0), 5, BLACK.stroke_width(1))),
        )
        .map_err(drawing)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::aggregate::{aggregate_by_municipality, aggregate_by_year};
    use crate::analyzers::quartiles::summarize_values;
    use crate::analyzers::summarize;
    use crate::parser::RawRecord;
    use plotters_backend::{
        BackendColor, BackendCoord, BackendTextStyle, DrawingErrorKind, FontTransform,
    };
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    #[derive(Debug, Clone)]
    struct DrawnText {
        text: String,
        rotated: bool,
        pos: BackendCoord,
    }

    /// Backend that needs no fonts: it records text calls and drops pixels.
    struct TextRecorder {
        size: (u32, u32),
        texts: Rc<RefCell<Vec<DrawnText>>>,
    }

    type BackendResult<T> = core::result::Result<T, DrawingErrorKind<std::io::Error>>;

    impl DrawingBackend for TextRecorder {
        type ErrorType = std::io::Error;

        fn get_size(&self) -> (u32, u32) {
            self.size
        }

        fn ensure_prepared(&mut self) -> BackendResult<()> {
            Ok(())
        }

        fn present(&mut self) -> BackendResult<()> {
            Ok(())
        }

        fn draw_pixel(&mut self, _point: BackendCoord, _color: BackendColor) -> BackendResult<()> {
            Ok(())
        }

        fn draw_text<TStyle: BackendTextStyle>(
            &mut self,
            text: &str,
            style: &TStyle,
            pos: BackendCoord,
        ) -> BackendResult<()> {
            self.texts.borrow_mut().push(DrawnText {
                text: text.to_string(),
                rotated: matches!(style.transform(), FontTransform::Rotate90),
                pos,
            });
            Ok(())
        }

        fn estimate_text_size<TStyle: BackendTextStyle>(
            &self,
            text: &str,
            _style: &TStyle,
        ) -> BackendResult<(u32, u32)> {
            Ok((text.chars().count() as u32 * 8, 16))
        }
    }

    fn recording_area() -> (DrawingArea<TextRecorder, Shift>, Rc<RefCell<Vec<DrawnText>>>) {
        let texts = Rc::new(RefCell::new(Vec::new()));
        let backend = TextRecorder {
            size: (1000, 700),
            texts: Rc::clone(&texts),
        };
        (backend.into_drawing_area(), texts)
    }

    fn label_pos(texts: &[DrawnText], label: &str) -> BackendCoord {
        texts
            .iter()
            .find(|t| t.text == label)
            .map(|t| t.pos)
            .unwrap_or_else(|| panic!("label {label:?} was not drawn"))
    }

    #[test]
    fn test_timeline_has_one_rotated_tick_per_year() {
        let rows: Vec<RawRecord> = (2003..=2024).map(|year| RawRecord::new("A", year, 10)).collect();
        let (area, texts) = recording_area();

        draw_timeline(&area, &aggregate_by_year(&rows)).unwrap();

        let texts = texts.borrow();
        for year in 2003..=2024 {
            let ticks: Vec<_> = texts.iter().filter(|t| t.text == year.to_string()).collect();
            assert_eq!(ticks.len(), 1, "year {year}");
            assert!(ticks[0].rotated, "year {year} label is not rotated");
        }
    }

    #[test]
    fn test_ranking_puts_highest_total_on_top() {
        let rows = vec![
            RawRecord::new("Niterói", 2020, 30),
            RawRecord::new("Rio de Janeiro", 2020, 900),
            RawRecord::new("Macaé", 2020, 45),
        ];
        let (area, texts) = recording_area();

        draw_ranking(&area, &aggregate_by_municipality(&rows)).unwrap();

        let texts = texts.borrow();
        let rio = label_pos(&texts, "Rio de Janeiro");
        let macae = label_pos(&texts, "Macaé");
        let niteroi = label_pos(&texts, "Niterói");
        // Smaller y is higher on screen.
        assert!(rio.1 < macae.1);
        assert!(macae.1 < niteroi.1);
        assert!(texts.iter().all(|t| !t.rotated));
    }

    #[test]
    fn test_ranking_lists_at_most_fifteen() {
        let rows: Vec<RawRecord> = (0..20)
            .map(|i| RawRecord::new(&format!("City {i:02}"), 2020, i + 1))
            .collect();
        let (area, texts) = recording_area();

        draw_ranking(&area, &aggregate_by_municipality(&rows)).unwrap();

        let texts = texts.borrow();
        let cities: HashSet<&str> = texts
            .iter()
            .filter(|t| t.text.starts_with("City "))
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(cities.len(), RANKING_SIZE);
        assert!(!texts.iter().any(|t| t.text == "City 00"));
        assert!(label_pos(&texts, "City 19").1 < label_pos(&texts, "City 05").1);
    }

    #[test]
    fn test_box_plot_draws_caption() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = summarize_values(&values).unwrap();
        let (area, texts) = recording_area();

        draw_box_plot(&area, &values, &summary).unwrap();

        assert!(
            texts
                .borrow()
                .iter()
                .any(|t| t.text == "Statistical summary of the distribution")
        );
    }

    fn sample_aggregates() -> Aggregates {
        let rows: Vec<RawRecord> = (0..40)
            .map(|i| RawRecord::new(&format!("Municipality {i}"), 2003 + (i % 20) as i32, i * i))
            .collect();
        Aggregates::from_records(&rows)
    }

    #[test]
    fn test_render_rejects_empty_aggregates() {
        let aggregates = Aggregates::default();
        let summary = summarize_values(&[1.0]).unwrap();
        let output = std::env::temp_dir().join("homicide_dashboard_empty.png");

        let result = render_dashboard(&aggregates, &summary, &output);

        assert!(matches!(result, Err(RenderError::InvalidData(_))));
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn test_render_dashboard_writes_png() {
        let aggregates = sample_aggregates();
        let summary = summarize(&aggregates.by_municipality).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("dashboard.png");

        render_dashboard(&aggregates, &summary, &output).unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}
