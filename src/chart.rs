//! Chart rendering via the `plotters` bitmap backend.
//!
//! Charts are saved as 1200x800 PNG files. The bitmap backend renders
//! fonts itself, so this works in headless environments (Docker/CI)
//! without system font dependencies.

use std::path::Path;

use plotters::prelude::*;

use crate::error::AnalysisError;

const CHART_SIZE: (u32, u32) = (1200, 800);
const CAPTION_AREA_HEIGHT: u32 = 40;

/// Attribution line drawn under every chart.
const ATTRIBUTION: &str = "Generated by csvbatch";

type Result<T> = std::result::Result<T, AnalysisError>;

// ---------------------------------------------------------------------------
// Series preparation
// ---------------------------------------------------------------------------

/// Frequency count per distinct value, sorted by value ascending.
pub fn frequency_counts(values: &[f64]) -> Vec<(f64, usize)> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut counts: Vec<(f64, usize)> = Vec::new();
    for v in sorted {
        match counts.last_mut() {
            Some((last, n)) if *last == v => *n += 1,
            _ => counts.push((v, 1)),
        }
    }
    counts
}

/// Tick label for a numeric value: integers without a decimal point.
fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e12 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

/// Render a frequency bar chart to `output`. One bar per distinct value,
/// ascending, with the formatted value as the tick label.
pub fn bar_chart(counts: &[(f64, usize)], column: &str, output: &Path) -> Result<()> {
    if counts.is_empty() {
        return Err(AnalysisError::Plot("no data points for bar chart".into()));
    }

    let root = BitMapBackend::new(output, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| AnalysisError::Plot(e.to_string()))?;

    let (chart_area, caption_area) =
        root.split_vertically((CHART_SIZE.1 - CAPTION_AREA_HEIGHT) as i32);

    let max_count = counts.iter().map(|&(_, n)| n).max().unwrap_or(1) as f64;
    let y_max = max_count * 1.2;

    let mut chart = ChartBuilder::on(&chart_area)
        .caption(format!("Bar Chart of {column}"), ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(0..counts.len() as i32, 0f64..y_max)
        .map_err(|e| AnalysisError::Plot(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(column)
        .y_desc("Frequency")
        .x_labels(counts.len().min(20))
        .x_label_formatter(&|x| {
            counts
                .get(*x as usize)
                .map(|&(v, _)| format_value(v))
                .unwrap_or_default()
        })
        .label_style(("sans-serif", 20))
        .axis_desc_style(("sans-serif", 25))
        .draw()
        .map_err(|e| AnalysisError::Plot(e.to_string()))?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, &(_, n))| {
            Rectangle::new(
                [(i as i32, 0.0), (i as i32 + 1, n as f64)],
                BLUE.mix(0.6).filled(),
            )
        }))
        .map_err(|e| AnalysisError::Plot(e.to_string()))?;

    draw_attribution(&caption_area)?;
    root.present()
        .map_err(|e| AnalysisError::Plot(e.to_string()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------

/// Render a scatter chart of paired values to `output`. Points use light
/// transparency so overlapping clusters stay readable.
pub fn scatter_chart(
    xs: &[f64],
    ys: &[f64],
    x_col: &str,
    y_col: &str,
    output: &Path,
) -> Result<()> {
    if xs.is_empty() || xs.len() != ys.len() {
        return Err(AnalysisError::Plot(
            "no paired data points for scatter chart".into(),
        ));
    }

    let root = BitMapBackend::new(output, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| AnalysisError::Plot(e.to_string()))?;

    let (chart_area, caption_area) =
        root.split_vertically((CHART_SIZE.1 - CAPTION_AREA_HEIGHT) as i32);

    let (x_min, x_max) = padded_range(xs);
    let (y_min, y_max) = padded_range(ys);

    let mut chart = ChartBuilder::on(&chart_area)
        .caption(
            format!("Scatter Plot: {y_col} vs {x_col}"),
            ("sans-serif", 40),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| AnalysisError::Plot(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_col)
        .y_desc(y_col)
        .label_style(("sans-serif", 20))
        .axis_desc_style(("sans-serif", 25))
        .draw()
        .map_err(|e| AnalysisError::Plot(e.to_string()))?;

    chart
        .draw_series(
            xs.iter()
                .zip(ys)
                .map(|(&x, &y)| Circle::new((x, y), 4, BLUE.mix(0.5).filled())),
        )
        .map_err(|e| AnalysisError::Plot(e.to_string()))?;

    draw_attribution(&caption_area)?;
    root.present()
        .map_err(|e| AnalysisError::Plot(e.to_string()))?;
    Ok(())
}

/// Axis range with 5% padding; degenerate single-value ranges widen by 1.
fn padded_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

fn draw_attribution<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
) -> Result<()> {
    let style = ("sans-serif", 18)
        .into_font()
        .color(&RGBColor(128, 128, 128));
    area.draw(&Text::new(ATTRIBUTION, (510, 8), style))
        .map_err(|e| AnalysisError::Plot(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_counts_sorted_ascending() {
        let counts = frequency_counts(&[2.0, 1.0, 2.0, 3.0, 1.0, 2.0]);
        assert_eq!(counts, vec![(1.0, 2), (2.0, 3), (3.0, 1)]);
    }

    #[test]
    fn test_frequency_counts_empty() {
        assert!(frequency_counts(&[]).is_empty());
    }

    #[test]
    fn test_format_value_trims_integers() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(-2.0), "-2");
        assert_eq!(format_value(2.5), "2.5");
    }

    #[test]
    fn test_padded_range_degenerate() {
        assert_eq!(padded_range(&[4.0, 4.0]), (3.0, 5.0));
    }

    #[test]
    fn test_bar_chart_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bar.png");
        bar_chart(&[(1.0, 3), (2.0, 1)], "x", &path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn test_bar_chart_rejects_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bar.png");
        assert!(bar_chart(&[], "x", &path).is_err());
    }

    #[test]
    fn test_scatter_chart_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scatter.png");
        scatter_chart(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0], "x", "y", &path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }
}
