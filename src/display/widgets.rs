//! Custom TUI Widgets for the Dashboard
//!
//! KPI header, filter chips, charts, the paginated release table, the status
//! line and the full-screen load error.

use super::state::{DashboardState, Pane, STABILITY_ROWS};
use crate::preferences::Theme;
use crate::reports::{format_change_tags, format_published, truncate};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Clear, Gauge, List, ListItem, ListState,
        Paragraph, Row, Table, TableState, Wrap,
    },
    Frame,
};

/// Style set for one theme
pub struct AppTheme {
    pub primary: Style,
    pub secondary: Style,
    pub accent: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub muted: Style,
    pub highlight: Style,
}

impl AppTheme {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                primary: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                secondary: Style::default().fg(Color::Cyan),
                accent: Style::default().fg(Color::Yellow),
                success: Style::default().fg(Color::Green),
                warning: Style::default().fg(Color::Yellow),
                error: Style::default().fg(Color::Red),
                muted: Style::default().fg(Color::DarkGray),
                highlight: Style::default()
                    .bg(Color::DarkGray)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            },
            Theme::Light => Self {
                primary: Style::default().fg(Color::Black).add_modifier(Modifier::BOLD),
                secondary: Style::default().fg(Color::Blue),
                accent: Style::default().fg(Color::Magenta),
                success: Style::default().fg(Color::Green),
                warning: Style::default().fg(Color::Rgb(176, 112, 0)),
                error: Style::default().fg(Color::Red),
                muted: Style::default().fg(Color::Gray),
                highlight: Style::default()
                    .bg(Color::LightBlue)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            },
        }
    }

    /// Border style for a pane, brighter when focused
    fn border(&self, focused: bool) -> Style {
        if focused {
            self.accent
        } else {
            self.secondary
        }
    }
}

impl Default for AppTheme {
    fn default() -> Self {
        Self::for_theme(Theme::default())
    }
}

fn pane_block<'a>(pane: Pane, state: &DashboardState, theme: &AppTheme) -> Block<'a> {
    titled_pane_block(pane, pane.title().to_string(), state, theme)
}

fn titled_pane_block<'a>(
    pane: Pane,
    title: String,
    state: &DashboardState,
    theme: &AppTheme,
) -> Block<'a> {
    let focused = state.focus() == pane;
    Block::default()
        .title(title)
        .title_style(theme.primary)
        .borders(Borders::ALL)
        .border_style(theme.border(focused))
}

/// Main layout: header, chips, charts row, ranking + table row, status line
pub fn create_main_layout(area: Rect) -> Vec<Rect> {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // KPIs
            Constraint::Length(3), // Filter chips
            Constraint::Length(10), // Charts
            Constraint::Min(8),    // Ranking + table
            Constraint::Length(1), // Status line
        ])
        .split(area);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(45),
            Constraint::Percentage(30),
        ])
        .split(rows[2]);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[3]);

    vec![
        rows[0], rows[1], charts[0], charts[1], charts[2], lower[0], lower[1], rows[4],
    ]
}

pub struct HeaderWidget<'a> {
    state: &'a DashboardState,
    theme: &'a AppTheme,
}

impl<'a> HeaderWidget<'a> {
    pub fn new(state: &'a DashboardState, theme: &'a AppTheme) -> Self {
        Self { state, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let kpis = &self.state.view().kpis;
        let block = Block::default()
            .title("Release Dashboard")
            .title_style(self.theme.primary)
            .borders(Borders::ALL)
            .border_style(self.theme.secondary);

        let line = Line::from(vec![
            Span::styled("Releases: ", self.theme.muted),
            Span::styled(kpis.total_releases.to_string(), self.theme.success),
            Span::styled("  |  Repositories: ", self.theme.muted),
            Span::styled(kpis.repositories.to_string(), self.theme.success),
            Span::styled("  |  Authors: ", self.theme.muted),
            Span::styled(kpis.authors.to_string(), self.theme.success),
            Span::styled("  |  Avg working days: ", self.theme.muted),
            Span::styled(kpis.avg_working_days.to_string(), self.theme.success),
        ]);

        let paragraph = Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
    }
}

/// Active filters as chips
pub struct ChipsWidget<'a> {
    state: &'a DashboardState,
    theme: &'a AppTheme,
}

impl<'a> ChipsWidget<'a> {
    pub fn new(state: &'a DashboardState, theme: &'a AppTheme) -> Self {
        Self { state, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Filters (c to clear)")
            .title_style(self.theme.primary)
            .borders(Borders::ALL)
            .border_style(self.theme.secondary);

        let chips = self.state.controller().selection().chips();
        let line = if chips.is_empty() {
            Line::from(Span::styled("none", self.theme.muted))
        } else {
            let mut spans = Vec::with_capacity(chips.len() * 2);
            for (dimension, value) in chips {
                spans.push(Span::styled(
                    format!("[{}: {}]", dimension, value),
                    self.theme.accent,
                ));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        };

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

pub struct StabilityWidget<'a> {
    state: &'a DashboardState,
    theme: &'a AppTheme,
}

impl<'a> StabilityWidget<'a> {
    pub fn new(state: &'a DashboardState, theme: &'a AppTheme) -> Self {
        Self { state, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = pane_block(Pane::Stability, self.state, self.theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(2)])
            .split(inner);

        let stability = self.state.view().stability;
        let total = stability.stable + stability.prerelease;
        let ratio = if total == 0 {
            0.0
        } else {
            stability.stable as f64 / total as f64
        };
        let gauge = Gauge::default()
            .gauge_style(self.theme.success)
            .ratio(ratio)
            .label(format!("{:.0}% stable", ratio * 100.0));
        frame.render_widget(gauge, parts[0]);

        let counts = [stability.stable, stability.prerelease];
        let items: Vec<ListItem> = STABILITY_ROWS
            .iter()
            .zip(counts)
            .map(|(tag, count)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<11}", tag.as_str()), self.theme.secondary),
                    Span::styled(count.to_string(), self.theme.primary),
                ]))
            })
            .collect();

        let mut list_state = ListState::default();
        if self.state.focus() == Pane::Stability {
            list_state.select(Some(self.state.cursor(Pane::Stability)));
        }
        let list = List::new(items)
            .highlight_style(self.theme.highlight)
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, parts[1], &mut list_state);
    }
}

/// Horizontal bar chart over `(label, value)` pairs, showing a window around the cursor
fn render_bar_chart(
    frame: &mut Frame,
    area: Rect,
    block: Block<'_>,
    data: &[(String, u64)],
    cursor: Option<usize>,
    theme: &AppTheme,
) {
    if data.is_empty() {
        let empty = Paragraph::new("No data")
            .style(theme.muted)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let visible = (area.height.saturating_sub(2) as usize).max(1);
    let focus = cursor.unwrap_or(0);
    let start = focus.saturating_sub(visible - 1).min(data.len().saturating_sub(visible));

    let bars: Vec<Bar> = data
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .map(|(index, (label, value))| {
            let style = if Some(index) == cursor {
                theme.highlight
            } else {
                theme.secondary
            };
            Bar::default()
                .label(Line::from(label.clone()))
                .value(*value)
                .style(style)
                .value_style(theme.primary)
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

pub struct MonthlyChartWidget<'a> {
    state: &'a DashboardState,
    theme: &'a AppTheme,
}

impl<'a> MonthlyChartWidget<'a> {
    pub fn new(state: &'a DashboardState, theme: &'a AppTheme) -> Self {
        Self { state, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let data: Vec<(String, u64)> = self
            .state
            .view()
            .monthly_frequency
            .iter()
            .map(|m| (m.month.clone(), m.count as u64))
            .collect();
        let cursor = (self.state.focus() == Pane::Monthly)
            .then(|| self.state.cursor(Pane::Monthly));
        let block = pane_block(Pane::Monthly, self.state, self.theme);
        render_bar_chart(frame, area, block, &data, cursor, self.theme);
    }
}

pub struct ChangeTypeChartWidget<'a> {
    state: &'a DashboardState,
    theme: &'a AppTheme,
}

impl<'a> ChangeTypeChartWidget<'a> {
    pub fn new(state: &'a DashboardState, theme: &'a AppTheme) -> Self {
        Self { state, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let data: Vec<(String, u64)> = self
            .state
            .view()
            .change_types
            .iter()
            .map(|t| (t.change_type.to_string(), t.total as u64))
            .collect();
        let cursor = (self.state.focus() == Pane::ChangeTypes)
            .then(|| self.state.cursor(Pane::ChangeTypes));
        let block = pane_block(Pane::ChangeTypes, self.state, self.theme);
        render_bar_chart(frame, area, block, &data, cursor, self.theme);
    }
}

pub struct RankingWidget<'a> {
    state: &'a DashboardState,
    theme: &'a AppTheme,
}

impl<'a> RankingWidget<'a> {
    pub fn new(state: &'a DashboardState, theme: &'a AppTheme) -> Self {
        Self { state, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = pane_block(Pane::Repositories, self.state, self.theme);
        let ranking = &self.state.view().duration_ranking;

        if ranking.is_empty() {
            let empty = Paragraph::new("No working-day data")
                .style(self.theme.muted)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let width = area.width.saturating_sub(14) as usize;
        let items: Vec<ListItem> = ranking
            .iter()
            .enumerate()
            .map(|(rank, entry)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:>2}. ", rank + 1), self.theme.muted),
                    Span::styled(
                        format!("{:<width$} ", truncate(&entry.repo, width), width = width),
                        self.theme.secondary,
                    ),
                    Span::styled(format!("{:>5.1}", entry.avg_working_days), self.theme.success),
                ]))
            })
            .collect();

        let mut list_state = ListState::default();
        if self.state.focus() == Pane::Repositories {
            list_state.select(Some(self.state.cursor(Pane::Repositories)));
        }
        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.highlight);
        frame.render_stateful_widget(list, area, &mut list_state);
    }
}

pub struct ReleaseTableWidget<'a> {
    state: &'a DashboardState,
    theme: &'a AppTheme,
}

impl<'a> ReleaseTableWidget<'a> {
    pub fn new(state: &'a DashboardState, theme: &'a AppTheme) -> Self {
        Self { state, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let controller = self.state.controller();
        let title = format!(
            "{} - page {}/{} (←/→)",
            Pane::Releases.title(),
            controller.page(),
            self.state.total_pages()
        );
        let block = titled_pane_block(Pane::Releases, title, self.state, self.theme);

        let page_rows = self.state.page_rows();
        if page_rows.is_empty() {
            let empty = Paragraph::new("No releases match the current filters")
                .style(self.theme.muted)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(vec![
            "Published", "Repository", "Package", "Version", "Author", "Days", "Changes",
        ])
        .style(self.theme.primary);

        let rows: Vec<Row> = page_rows
            .iter()
            .map(|record| {
                let stability_style = if record.is_prerelease {
                    self.theme.warning
                } else {
                    Style::default()
                };
                Row::new(vec![
                    format_published(record),
                    record.repo().to_string(),
                    record.package().to_string(),
                    record.version().to_string(),
                    record.author().to_string(),
                    record.working_days.to_string(),
                    format_change_tags(record),
                ])
                .style(stability_style)
            })
            .collect();

        let widths = [
            Constraint::Length(16),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
            Constraint::Length(10),
            Constraint::Percentage(14),
            Constraint::Length(5),
            Constraint::Min(10),
        ];

        let mut table_state = TableState::default();
        if self.state.focus() == Pane::Releases {
            table_state.select(Some(self.state.cursor(Pane::Releases)));
        }

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(self.theme.highlight)
            .highlight_symbol("> ");
        frame.render_stateful_widget(table, area, &mut table_state);
    }
}

pub struct StatusWidget<'a> {
    status: Option<&'a str>,
    theme: &'a AppTheme,
}

impl<'a> StatusWidget<'a> {
    pub fn new(status: Option<&'a str>, theme: &'a AppTheme) -> Self {
        Self { status, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let line = match self.status {
            Some(message) => Line::from(Span::styled(message, self.theme.accent)),
            None => Line::from(vec![
                Span::styled("Tab", self.theme.accent),
                Span::styled(" focus  ", self.theme.muted),
                Span::styled("Enter", self.theme.accent),
                Span::styled(" filter  ", self.theme.muted),
                Span::styled("r/p/a", self.theme.accent),
                Span::styled(" row filter  ", self.theme.muted),
                Span::styled("t", self.theme.accent),
                Span::styled(" theme  ", self.theme.muted),
                Span::styled("R", self.theme.accent),
                Span::styled(" reload  ", self.theme.muted),
                Span::styled("q", self.theme.accent),
                Span::styled(" quit", self.theme.muted),
            ]),
        };

        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }
}

/// Full-screen replacement shown when the data could not be loaded
pub struct ErrorScreenWidget<'a> {
    error_message: &'a str,
    theme: &'a AppTheme,
}

impl<'a> ErrorScreenWidget<'a> {
    pub fn new(error_message: &'a str, theme: &'a AppTheme) -> Self {
        Self { error_message, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 40, area);
        frame.render_widget(Clear, area);

        let error_block = Block::default()
            .title("Error")
            .title_style(self.theme.error)
            .borders(Borders::ALL)
            .border_style(self.theme.error);

        let error_text = Text::from(vec![
            Line::from(Span::styled("Failed to load release data", self.theme.error)),
            Line::from(""),
            Line::from(Span::styled(self.error_message, self.theme.primary)),
            Line::from(""),
            Line::from(Span::styled("Press R to reload or q to quit", self.theme.muted)),
        ]);

        let error_paragraph = Paragraph::new(error_text)
            .block(error_block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(error_paragraph, popup_area);
    }
}

/// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Render the whole dashboard, or only the error screen after a failed load
pub fn render_dashboard(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let theme = AppTheme::for_theme(state.theme());

    if let Some(error) = state.load_error() {
        ErrorScreenWidget::new(error, &theme).render(frame, area);
        return;
    }

    let chunks = create_main_layout(area);
    HeaderWidget::new(state, &theme).render(frame, chunks[0]);
    ChipsWidget::new(state, &theme).render(frame, chunks[1]);
    StabilityWidget::new(state, &theme).render(frame, chunks[2]);
    MonthlyChartWidget::new(state, &theme).render(frame, chunks[3]);
    ChangeTypeChartWidget::new(state, &theme).render(frame, chunks[4]);
    RankingWidget::new(state, &theme).render(frame, chunks[5]);
    ReleaseTableWidget::new(state, &theme).render(frame, chunks[6]);
    StatusWidget::new(state.status(), &theme).render(frame, chunks[7]);
}
