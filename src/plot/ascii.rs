//! ASCII chart rendering for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Renderers by chart kind:
//! - pie: one gauge row per slice with count and share
//! - bar: vertical `#` columns; when there are more values than columns,
//!   neighbouring values collapse into their maximum
//! - line: one glyph per series (`-`, `=`, `*`, `+`), overlaps keep the
//!   earlier series

use crate::domain::{ChartKind, ChartSpec, SeriesSpec};

const LINE_GLYPHS: [char; 4] = ['-', '=', '*', '+'];

/// Render one chart spec as fixed-width text.
pub fn render_chart(chart: &ChartSpec, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    match chart.kind {
        ChartKind::Pie => render_pie(chart, width),
        ChartKind::Bar => render_bar(chart, width, height),
        ChartKind::Line => render_line(chart, width, height),
    }
}

fn render_pie(chart: &ChartSpec, width: usize) -> String {
    let values = chart.series.first().map(|s| s.values.as_slice()).unwrap_or(&[]);
    let total: f64 = values.iter().sum();

    let mut out = format!("{}: {:.0} total\n", chart.title, total);
    if values.is_empty() || total <= 0.0 {
        out.push_str("  (no data)\n");
        return out;
    }

    let gauge_w = (width / 2).clamp(8, 40);
    for (i, &v) in values.iter().enumerate() {
        let label = chart
            .labels
            .get(i)
            .cloned()
            .unwrap_or_else(|| (i + 1).to_string());
        let share = v / total;
        let filled = ((share * gauge_w as f64).round() as usize).min(gauge_w);
        let gauge: String = "#".repeat(filled);
        out.push_str(&format!(
            "  {:<16} {:<gw$} {:>6.0} {:>5.1}%\n",
            truncate(&label, 16),
            gauge,
            v,
            share * 100.0,
            gw = gauge_w
        ));
    }
    out
}

fn render_bar(chart: &ChartSpec, width: usize, height: usize) -> String {
    let values = chart.series.first().map(|s| s.values.as_slice()).unwrap_or(&[]);
    if values.is_empty() {
        return format!("{}: (no data)\n", chart.title);
    }

    // Collapse to at most `width` columns, keeping the envelope.
    let chunk = values.len().div_ceil(width);
    let bars: Vec<f64> = values
        .chunks(chunk)
        .map(|c| c.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        .collect();

    let y_min = bars.iter().copied().fold(0.0_f64, f64::min);
    let mut y_max = bars.iter().copied().fold(0.0_f64, f64::max);
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }

    let slot = (width / bars.len()).max(1);
    let ink = if slot > 1 { slot - 1 } else { 1 };

    let mut grid = vec![vec![' '; width]; height];
    let zero_row = map_y(0.0, y_min, y_max, height);
    for (c, &v) in bars.iter().enumerate() {
        if v == 0.0 {
            continue;
        }
        let value_row = map_y(v, y_min, y_max, height);
        let (top, bottom) = if value_row <= zero_row {
            (value_row, zero_row)
        } else {
            (zero_row, value_row)
        };
        for row in grid.iter_mut().take(bottom + 1).skip(top) {
            for dx in 0..ink {
                let x = c * slot + dx;
                if x < width {
                    row[x] = '#';
                }
            }
        }
    }

    let mut out = format!(
        "{}: y=[{y_min:.2}, {y_max:.2}] | bars={}\n",
        chart.title,
        bars.len()
    );
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&bar_footer(chart, bars.len(), slot, width));
    out
}

fn bar_footer(chart: &ChartSpec, bars: usize, slot: usize, width: usize) -> String {
    if chart.labels.is_empty() {
        return String::new();
    }
    // One label under each bar when they fit, otherwise just the span.
    if chart.labels.len() == bars && slot >= 2 {
        let mut row = vec![' '; width];
        for (c, label) in chart.labels.iter().enumerate() {
            for (dx, ch) in label.chars().take(slot - 1).enumerate() {
                let x = c * slot + dx;
                if x < width {
                    row[x] = ch;
                }
            }
        }
        let mut out: String = row.into_iter().collect();
        out.push('\n');
        out
    } else {
        format!(
            "x: {}..{}\n",
            chart.labels.first().map(String::as_str).unwrap_or(""),
            chart.labels.last().map(String::as_str).unwrap_or("")
        )
    }
}

fn render_line(chart: &ChartSpec, width: usize, height: usize) -> String {
    let drawn: Vec<&SeriesSpec> = chart.series.iter().filter(|s| !s.values.is_empty()).collect();
    let points = drawn.iter().map(|s| s.values.len()).max().unwrap_or(0);
    if points == 0 {
        return format!("{}: (no data)\n", chart.title);
    }

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for series in &drawn {
        for &v in &series.values {
            y_min = y_min.min(v);
            y_max = y_max.max(v);
        }
    }
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for (si, series) in drawn.iter().enumerate() {
        let glyph = LINE_GLYPHS[si % LINE_GLYPHS.len()];
        draw_series(&mut grid, &series.values, points, y_min, y_max, glyph);
    }

    let mut out = format!(
        "{}: x=[1, {points}] | y=[{y_min:.2}, {y_max:.2}]\n",
        chart.title
    );
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    let legend: Vec<String> = drawn
        .iter()
        .enumerate()
        .map(|(si, s)| format!("{} {}", LINE_GLYPHS[si % LINE_GLYPHS.len()], s.name))
        .collect();
    out.push_str(&legend.join("  "));
    out.push('\n');
    out
}

fn draw_series(
    grid: &mut [Vec<char>],
    values: &[f64],
    points: usize,
    y_min: f64,
    y_max: f64,
    glyph: char,
) {
    let height = grid.len();
    let width = grid[0].len();

    if values.len() == 1 || points == 1 {
        let y = map_y(values[0], y_min, y_max, height);
        if grid[y][0] == ' ' {
            grid[y][0] = glyph;
        }
        return;
    }

    let mut prev: Option<(usize, usize)> = None;
    for (i, &v) in values.iter().enumerate() {
        let x = map_x(i as f64, 0.0, (points - 1) as f64, width);
        let y = map_y(v, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, y, glyph);
        } else if grid[y][x] == ' ' {
            grid[y][x] = glyph;
        }
        prev = Some((x, y));
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    if t_max <= t_min {
        return 0;
    }
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only blank cells are written, so
/// earlier series keep their pixels on overlap.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChartKind;

    fn spec(title: &str, kind: ChartKind, labels: &[&str], series: &[(&str, &[f64])]) -> ChartSpec {
        ChartSpec {
            title: title.to_string(),
            kind,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            series: series
                .iter()
                .map(|(name, values)| SeriesSpec {
                    name: name.to_string(),
                    values: values.to_vec(),
                })
                .collect(),
        }
    }

    #[test]
    fn line_golden_snapshot_small() {
        let chart = spec(
            "Price vs Discounted Price",
            ChartKind::Line,
            &[],
            &[
                ("actual price", &[100.0, 50.0, 20.0]),
                ("discounted price", &[80.0, 50.0, 15.0]),
            ],
        );
        let txt = render_chart(&chart, 10, 5);
        let expected = concat!(
            "Price vs Discounted Price: x=[1, 3] | y=[10.75, 104.25]\n",
            "--        \n",
            "==--      \n",
            "   =--    \n",
            "      --  \n",
            "        --\n",
            "- actual price  = discounted price\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn bar_columns_rise_from_the_baseline() {
        let chart = spec(
            "Ratings Distribution",
            ChartKind::Bar,
            &["1", "2", "3", "4", "5"],
            &[("ratings", &[0.0, 0.0, 1.0, 1.0, 1.0])],
        );
        let txt = render_chart(&chart, 10, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Ratings Distribution: y=[0.00, 1.00] | bars=5");
        for line in &lines[1..=5] {
            assert_eq!(*line, "    # # # ");
        }
        assert_eq!(lines[6], "1 2 3 4 5 ");
    }

    #[test]
    fn wide_bar_charts_collapse_to_the_envelope() {
        let values: Vec<f64> = (0..40).map(|i| (i % 7) as f64).collect();
        let labels: Vec<String> = (1..=40).map(|i| i.to_string()).collect();
        let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let chart = spec(
            "Distribution of rating",
            ChartKind::Bar,
            &label_refs,
            &[("rating", &values)],
        );
        let txt = render_chart(&chart, 10, 5);
        assert!(txt.starts_with("Distribution of rating: "));
        assert!(txt.contains("bars=10"));
        assert!(txt.trim_end().ends_with("x: 1..40"));
    }

    #[test]
    fn pie_gauges_show_counts_and_shares() {
        let chart = spec(
            "Category Distribution",
            ChartKind::Pie,
            &["Electronics", "Books"],
            &[("products", &[2.0, 1.0])],
        );
        let txt = render_chart(&chart, 40, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Category Distribution: 3 total");
        assert!(lines[1].starts_with("  Electronics"));
        assert!(lines[1].contains("#############"));
        assert!(lines[1].ends_with("66.7%"));
        assert!(lines[2].ends_with("33.3%"));
    }

    #[test]
    fn empty_charts_say_so_instead_of_panicking() {
        let pie = spec("Category Distribution", ChartKind::Pie, &[], &[("products", &[])]);
        assert!(render_chart(&pie, 40, 5).contains("(no data)"));
        let line = spec("Price vs Discounted Price", ChartKind::Line, &[], &[]);
        assert!(render_chart(&line, 40, 5).contains("(no data)"));
    }

    #[test]
    fn renders_are_deterministic() {
        let chart = spec(
            "Distribution of x",
            ChartKind::Bar,
            &["1", "2"],
            &[("x", &[3.0, 9.0])],
        );
        assert_eq!(render_chart(&chart, 20, 8), render_chart(&chart, 20, 8));
    }
}
