//! Ratatui-based terminal UI.
//!
//! The TUI renders the dashboard interactively: a summary header, one chart at
//! a time (pie and bars via Ratatui widgets, price lines via Plotters), the
//! narrative tabs, and a file picker overlay for switching datasets.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, ListState, Paragraph,
        Tabs, Wrap,
    },
};

use crate::app::pipeline::{self, DashboardConfig, DashboardOutput, DataSource};
use crate::charts::ChartOptions;
use crate::cli::ReportArgs;
use crate::domain::{ChartKind, ChartSpec, RoleBindings};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{LineChartWidget, TEXT_COLORS};

const NARRATIVE_TABS: [&str; 4] = ["Insights", "Strategies", "Strengths", "Weaknesses"];

/// Start the TUI.
pub fn run(args: ReportArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::render(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(&args)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::render(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::render(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct PickerState {
    files: Vec<PathBuf>,
    selected: usize,
}

struct App {
    bindings: RoleBindings,
    chart_options: ChartOptions,
    source: Option<DataSource>,
    dashboard: Option<DashboardOutput>,
    chart_index: usize,
    narrative_tab: usize,
    status: String,
    picker: Option<PickerState>,
}

impl App {
    fn new(args: &ReportArgs) -> Result<Self, AppError> {
        let source = crate::app::source_from_args(args)?;
        let mut app = Self {
            bindings: RoleBindings {
                category: args.category_column.clone(),
                rating: args.rating_column.clone(),
                price: args.price_column.clone(),
                discounted_price: args.discounted_price_column.clone(),
            },
            chart_options: ChartOptions {
                price_points: args.price_points,
                numeric_charts: args.numeric_charts,
            },
            source,
            dashboard: None,
            chart_index: 0,
            narrative_tab: 0,
            status: "No dataset loaded. Press o to pick a file.".to_string(),
            picker: None,
        };
        // Errors on an explicitly requested source are fatal; interactive
        // reloads later only touch the status line.
        if app.source.is_some() {
            app.rebuild()?;
        }
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::render(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::render(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::render(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.picker.is_some() {
            self.handle_picker_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Left => self.step_chart(-1),
            KeyCode::Right => self.step_chart(1),
            KeyCode::Tab => {
                self.narrative_tab = (self.narrative_tab + 1) % NARRATIVE_TABS.len();
            }
            KeyCode::Char('o') => {
                let files = crate::cli::picker::discover_data_files();
                if files.is_empty() {
                    self.status =
                        "No .csv/.xlsx files found under the current directory.".to_string();
                } else {
                    self.picker = Some(PickerState { files, selected: 0 });
                }
            }
            KeyCode::Char('r') => {
                if let Some(DataSource::Demo { seed, .. }) = &mut self.source {
                    *seed = seed.wrapping_add(1);
                }
                if self.source.is_none() {
                    self.status = "No dataset loaded. Press o to pick a file.".to_string();
                } else if let Err(err) = self.rebuild() {
                    self.status = format!("Reload failed: {err}");
                }
            }
            KeyCode::Char('e') => self.export_dashboard(),
            KeyCode::Char('c') => {
                self.source = None;
                self.dashboard = None;
                self.chart_index = 0;
                self.status = "Cleared. Press o to pick a dataset.".to_string();
            }
            _ => {}
        }

        false
    }

    fn handle_picker_key(&mut self, code: KeyCode) {
        let Some(picker) = &mut self.picker else {
            return;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.picker = None;
                self.status = "Canceled.".to_string();
            }
            KeyCode::Up => picker.selected = picker.selected.saturating_sub(1),
            KeyCode::Down => {
                if picker.selected + 1 < picker.files.len() {
                    picker.selected += 1;
                }
            }
            KeyCode::Enter => {
                let path = picker.files[picker.selected].clone();
                self.picker = None;
                self.source = Some(DataSource::File(path));
                if let Err(err) = self.rebuild() {
                    self.status = format!("Load failed: {err}");
                }
            }
            _ => {}
        }
    }

    fn step_chart(&mut self, delta: isize) {
        let Some(out) = &self.dashboard else {
            return;
        };
        let n = out.charts.len();
        if n == 0 {
            return;
        }
        let n = n as isize;
        self.chart_index = ((self.chart_index as isize + delta + n) % n) as usize;
    }

    fn rebuild(&mut self) -> Result<(), AppError> {
        let Some(source) = self.source.clone() else {
            return Ok(());
        };
        let config = DashboardConfig {
            source,
            bindings: self.bindings.clone(),
            charts: self.chart_options,
        };
        let out = pipeline::run_dashboard(&config)?;
        if self.chart_index >= out.charts.len() {
            self.chart_index = 0;
        }
        self.status = format!(
            "Loaded {} rows from {}",
            out.ingest.dataset.row_count(),
            out.ingest.source
        );
        self.dashboard = Some(out);
        Ok(())
    }

    fn export_dashboard(&mut self) {
        let Some(out) = &self.dashboard else {
            self.status = "Nothing to export yet.".to_string();
            return;
        };
        let path = PathBuf::from(format!(
            "dashboard-{}.json",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));
        let numeric = crate::profile::numeric_columns(&out.profiles);
        let file = crate::io::dashboard::build_dashboard_file(
            &out.ingest,
            &numeric,
            out.summary.stats(),
            &out.charts,
            &out.narratives,
        );
        match crate::io::dashboard::write_dashboard_json(&path, &file) {
            Ok(()) => self.status = format!("Wrote {}", path.display()),
            Err(err) => self.status = format!("Export failed: {err}"),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
        self.draw_picker(frame, size);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("dg", Style::default().fg(Color::Cyan)),
            Span::raw(" - dataset dashboard"),
        ]));

        match &self.dashboard {
            Some(out) => {
                let numeric = out.profiles.iter().filter(|p| p.is_numeric()).count();
                lines.push(Line::from(Span::styled(
                    format!(
                        "source: {} | rows: {} used / {} read | columns: {} ({numeric} numeric)",
                        out.ingest.source,
                        out.ingest.dataset.row_count(),
                        out.ingest.rows_read,
                        out.profiles.len(),
                    ),
                    Style::default().fg(Color::Gray),
                )));

                let stats = out.summary.stats();
                lines.push(Line::from(Span::styled(
                    format!(
                        "avg rating: {} | avg price: {} | avg discounted: {} | dominant: {}",
                        fmt_opt(stats.avg_rating),
                        fmt_opt(stats.avg_price),
                        fmt_opt(stats.avg_discounted_price),
                        stats.dominant_category.as_deref().unwrap_or("-"),
                    ),
                    Style::default().fg(Color::Gray),
                )));
            }
            None => {
                lines.push(Line::from(Span::styled(
                    "no dataset loaded",
                    Style::default().fg(Color::Gray),
                )));
            }
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);

        self.draw_chart_panel(frame, chunks[0]);
        self.draw_narrative_panel(frame, chunks[1]);
    }

    fn draw_chart_panel(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (title, chart) = match &self.dashboard {
            Some(out) if !out.charts.is_empty() => {
                let chart = &out.charts[self.chart_index.min(out.charts.len() - 1)];
                (
                    format!(
                        "{} [{}/{}]",
                        chart.title,
                        self.chart_index + 1,
                        out.charts.len()
                    ),
                    Some(chart),
                )
            }
            _ => ("Charts".to_string(), None),
        };

        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(chart) = chart else {
            let msg = Paragraph::new("No dataset loaded. Press o to pick a file, or run `dg --demo`.")
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: true });
            frame.render_widget(msg, inner);
            return;
        };

        match chart.kind {
            ChartKind::Pie => self.draw_pie(frame, inner, chart),
            ChartKind::Bar => self.draw_bars(frame, inner, chart),
            ChartKind::Line => self.draw_lines(frame, inner, chart),
        }
    }

    fn draw_pie(&self, frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartSpec) {
        let values = chart.series.first().map(|s| s.values.as_slice()).unwrap_or(&[]);
        let total: f64 = values.iter().sum();
        if values.is_empty() || total <= 0.0 {
            frame.render_widget(Paragraph::new("(no data)"), area);
            return;
        }

        let gauge_w = (area.width as usize).saturating_sub(36).clamp(10, 40);
        let mut lines: Vec<Line> = Vec::new();
        for (i, &v) in values.iter().enumerate().take(area.height as usize) {
            let label = chart
                .labels
                .get(i)
                .cloned()
                .unwrap_or_else(|| (i + 1).to_string());
            let share = v / total;
            let filled = ((share * gauge_w as f64).round() as usize).min(gauge_w);
            let color = TEXT_COLORS[i % TEXT_COLORS.len()];
            lines.push(Line::from(vec![
                Span::styled("█".repeat(filled), Style::default().fg(color)),
                Span::raw(" ".repeat(gauge_w - filled)),
                Span::raw(format!(
                    " {:<18} {:>6.0} {:>5.1}%",
                    clip(&label, 18),
                    v,
                    share * 100.0
                )),
            ]));
        }
        frame.render_widget(Paragraph::new(Text::from(lines)), area);
    }

    fn draw_bars(&self, frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartSpec) {
        let values = chart.series.first().map(|s| s.values.as_slice()).unwrap_or(&[]);
        if values.is_empty() {
            frame.render_widget(Paragraph::new("(no data)"), area);
            return;
        }

        // 5 cells per bar plus a gap; collapse surplus values into chunk maxima.
        let capacity = (area.width as usize / 6).max(1);
        let chunk = values.len().div_ceil(capacity);
        let mut bars: Vec<Bar> = Vec::new();
        for (c, group) in values.chunks(chunk).enumerate() {
            let v = group.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let label = chart
                .labels
                .get(c * chunk)
                .cloned()
                .unwrap_or_else(|| (c * chunk + 1).to_string());
            let text = if v.fract() == 0.0 {
                format!("{v:.0}")
            } else {
                format!("{v:.1}")
            };
            // BarChart is integer-valued; keep two decimals of resolution.
            bars.push(
                Bar::default()
                    .value((v.max(0.0) * 100.0).round() as u64)
                    .text_value(text)
                    .label(Line::from(clip(&label, 5))),
            );
        }

        let widget = BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(5)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
        frame.render_widget(widget, area);
    }

    fn draw_lines(&self, frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartSpec) {
        let series: Vec<&crate::domain::SeriesSpec> =
            chart.series.iter().filter(|s| !s.values.is_empty()).collect();
        let points = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
        if points == 0 {
            frame.render_widget(Paragraph::new("(no data)"), area);
            return;
        }

        let lines: Vec<Vec<(f64, f64)>> = series
            .iter()
            .map(|s| {
                s.values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| ((i + 1) as f64, v))
                    .collect()
            })
            .collect();

        let x_bounds = [1.0, (points as f64).max(2.0)];
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for line in &lines {
            for &(_, y) in line {
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
        }
        if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
            y_min = 0.0;
            y_max = 1.0;
        }
        let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
        let y_bounds = [y_min - pad, y_max + pad];

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let (chart_rect, insets) = chart_layout(chunks[0]);
        let widget = LineChartWidget {
            lines: &lines,
            x_bounds,
            y_bounds,
            fmt_x: fmt_axis_x,
            fmt_y: fmt_axis_y,
        };
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(
                frame, chunks[0], chart_rect, insets, x_bounds, y_bounds, "product #", "price",
            );
        }

        let mut spans: Vec<Span> = Vec::new();
        for (i, s) in series.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            spans.push(Span::styled(
                "── ",
                Style::default().fg(TEXT_COLORS[i % TEXT_COLORS.len()]),
            ));
            spans.push(Span::raw(s.name.clone()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), chunks[1]);
    }

    fn draw_narrative_panel(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Narrative").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let tabs = Tabs::new(NARRATIVE_TABS.to_vec())
            .select(self.narrative_tab)
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);

        let Some(out) = &self.dashboard else {
            frame.render_widget(Paragraph::new("(no data)"), chunks[1]);
            return;
        };

        let items = match self.narrative_tab {
            0 => &out.narratives.insights,
            1 => &out.narratives.strategies,
            2 => &out.narratives.strengths,
            _ => &out.narratives.weaknesses,
        };
        let mut text = String::new();
        for item in items {
            text.push_str(&format!("- {item}\n"));
        }
        if items.is_empty() {
            text.push_str("(none)\n");
        }
        frame.render_widget(
            Paragraph::new(text).wrap(Wrap { trim: true }),
            chunks[1],
        );
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ chart  Tab narrative  o open  r reload  e export  c clear  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_picker(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(picker) = &self.picker else {
            return;
        };
        let rect = centered_rect(70, 60, area);
        frame.render_widget(Clear, rect);

        let items: Vec<ListItem> = picker
            .files
            .iter()
            .map(|p| ListItem::new(p.display().to_string()))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .title("Pick a dataset (Enter load, Esc cancel)")
                    .borders(Borders::ALL),
            )
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(picker.selected));
        frame.render_stateful_widget(list, rect, &mut state);
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

fn fmt_axis_x(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_y(v: f64) -> String {
    format!("{v:.0}")
}

fn centered_rect(pct_x: u16, pct_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

#[allow(clippy::too_many_arguments)]
fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_label: &str,
    y_label: &str,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format!("{x_val:.0}");
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.0}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_title = Paragraph::new(x_label.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_title, x_rect);
    }

    let y_title = Paragraph::new(y_label.to_string())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_title, y_rect);
}
