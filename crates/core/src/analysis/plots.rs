//! SVG chart rendering with plotters.
//!
//! Categorical axes are drawn on `f64` coordinates with one unit per category
//! and integer key points mapped back to labels.

use std::path::Path;

use plotters::prelude::*;

use crate::analysis::{AnalysisError, ChristianSplit, CrossTab, Frequency};

pub(crate) const FONT: &str = "sans-serif";

/// matplotlib's `tab10` cycle.
pub const TAB10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

const VIRIDIS: [(u8, u8, u8); 5] =
    [(68, 1, 84), (59, 82, 139), (33, 145, 140), (94, 201, 98), (253, 231, 37)];

const COOLWARM: [(u8, u8, u8); 3] = [(59, 76, 192), (221, 221, 221), (180, 4, 38)];

pub(crate) fn render_err<E: std::fmt::Display>(err: E) -> AnalysisError {
    AnalysisError::Render(err.to_string())
}

fn interpolate(anchors: &[(u8, u8, u8)], t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (anchors.len() - 1) as f64;
    let idx = (scaled.floor() as usize).min(anchors.len() - 2);
    let frac = scaled - idx as f64;
    let (a, b) = (anchors[idx], anchors[idx + 1]);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Viridis colour at `t` in `[0, 1]`.
pub fn viridis(t: f64) -> RGBColor {
    interpolate(&VIRIDIS, t)
}

/// Diverging blue-grey-red colour at `t` in `[0, 1]`.
pub fn coolwarm(t: f64) -> RGBColor {
    interpolate(&COOLWARM, t)
}

pub fn tab10(idx: usize) -> RGBColor {
    TAB10[idx % TAB10.len()]
}

/// Label for an integer key point on a categorical axis, blank between categories.
fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn axis_upper(max: usize) -> f64 {
    let max = max.max(1) as f64;
    max * 1.08
}

/// Horizontal bars, first entry at the top.
pub fn bar_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    data: &[Frequency],
) -> Result<(), AnalysisError> {
    if data.is_empty() {
        return Err(AnalysisError::EmptyData(title.to_string()));
    }
    let n = data.len();
    // Reverse so the most frequent entry ends up on top.
    let labels: Vec<String> = data.iter().rev().map(|f| f.name.clone()).collect();
    let max = data.iter().map(|f| f.count).max().unwrap_or(0);

    let height = (32 * n as u32 + 140).max(400);
    let root = SVGBackend::new(path, (1000, height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(220)
        .build_cartesian_2d(0f64..axis_upper(max), -0.5f64..(n as f64 - 0.5))
        .map_err(render_err)?;

    let y_fmt = |y: &f64| category_label(&labels, *y);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&y_fmt)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(data.iter().rev().enumerate().map(|(i, f)| {
            let color = viridis(i as f64 / n.max(2).saturating_sub(1) as f64);
            let y = i as f64;
            Rectangle::new([(0.0, y - 0.4), (f.count as f64, y + 0.4)], color.filled())
        }))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Stacked horizontal bars of Christian (`yes`) and other (`no`) counts per motif.
///
/// Rows are drawn bottom-up in the order given.
pub fn christian_stacked_chart(
    path: &Path,
    title: &str,
    rows: &[ChristianSplit],
) -> Result<(), AnalysisError> {
    if rows.is_empty() {
        return Err(AnalysisError::EmptyData(title.to_string()));
    }
    let n = rows.len();
    let labels: Vec<String> = rows.iter().map(|r| r.motif.clone()).collect();
    let max = rows.iter().map(|r| r.yes + r.no).max().unwrap_or(0);
    let yes_color = RGBColor(188, 189, 34);
    let no_color = RGBColor(148, 103, 189);

    let height = (36 * n as u32 + 160).max(400);
    let root = SVGBackend::new(path, (1000, height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(220)
        .build_cartesian_2d(0f64..axis_upper(max), -0.5f64..(n as f64 - 0.5))
        .map_err(render_err)?;

    let y_fmt = |y: &f64| category_label(&labels, *y);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&y_fmt)
        .x_desc("Frequency")
        .y_desc("Motifs")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(rows.iter().enumerate().map(|(i, r)| {
            let y = i as f64;
            Rectangle::new([(0.0, y - 0.4), (r.yes as f64, y + 0.4)], yes_color.filled())
        }))
        .map_err(render_err)?
        .label("yes")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], yes_color.filled()));

    chart
        .draw_series(rows.iter().enumerate().map(|(i, r)| {
            let y = i as f64;
            let start = r.yes as f64;
            Rectangle::new([(start, y - 0.4), (start + r.no as f64, y + 0.4)], no_color.filled())
        }))
        .map_err(render_err)?
        .label("no")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], no_color.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// One line per column of `table` across its rows (time bins).
pub fn line_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    table: &CrossTab,
) -> Result<(), AnalysisError> {
    if table.is_empty() {
        return Err(AnalysisError::EmptyData(title.to_string()));
    }
    let n_rows = table.rows.len();
    let max = table.max_count();

    let root = SVGBackend::new(path, (1400, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n_rows as f64 - 0.5), 0f64..axis_upper(max))
        .map_err(render_err)?;

    let x_fmt = |x: &f64| category_label(&table.rows, *x);
    chart
        .configure_mesh()
        .x_labels(n_rows)
        .x_label_formatter(&x_fmt)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(render_err)?;

    for (j, name) in table.columns.iter().enumerate() {
        let color = tab10(j);
        let points = (0..n_rows).map(|i| (i as f64, table.get(i, j) as f64));
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(render_err)?
            .label(name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Heatmap with time bins on the x axis and `table` columns on the y axis (first on top).
pub fn heatmap(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    table: &CrossTab,
) -> Result<(), AnalysisError> {
    if table.is_empty() {
        return Err(AnalysisError::EmptyData(title.to_string()));
    }
    let n_rows = table.rows.len();
    let n_cols = table.columns.len();
    let max = table.max_count().max(1) as f64;
    let y_labels: Vec<String> = table.columns.iter().rev().cloned().collect();

    let height = (28 * n_cols as u32 + 200).max(500);
    let root = SVGBackend::new(path, (1400, height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{title} (max {})", max as usize), (FONT, 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(220)
        .build_cartesian_2d(-0.5f64..(n_rows as f64 - 0.5), -0.5f64..(n_cols as f64 - 0.5))
        .map_err(render_err)?;

    let x_fmt = |x: &f64| category_label(&table.rows, *x);
    let y_fmt = |y: &f64| category_label(&y_labels, *y);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n_rows)
        .y_labels(n_cols)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(render_err)?;

    let cells = (0..n_rows).flat_map(|i| (0..n_cols).map(move |j| (i, j)));
    chart
        .draw_series(cells.map(|(i, j)| {
            let count = table.get(i, j) as f64;
            let (x, y) = (i as f64, (n_cols - 1 - j) as f64);
            Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], coolwarm(count / max).filled())
        }))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}
