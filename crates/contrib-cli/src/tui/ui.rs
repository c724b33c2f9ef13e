use contrib_core::{WidgetSettings, DAYS_PER_WEEK};
use contrib_layout::{day_labels, stats_row, GridView};
use contrib_sync::ViewState;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::app::App;

const GUTTER: usize = 4;
const CELL_GLYPH: &str = "■";

/// Render the full TUI frame.
pub fn render(f: &mut Frame, app: &App) {
    let settings = &app.frame.settings;
    let header = if settings.show_header { 1 } else { 0 };
    let footer = if settings.show_footer { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header), // login, year, stats
            Constraint::Min(3),         // grid
            Constraint::Length(footer), // legend
            Constraint::Length(1),      // status bar
        ])
        .split(f.area());

    if settings.show_header {
        render_header(f, app, chunks[0]);
    }
    render_body(f, app, chunks[1]);
    if settings.show_footer {
        render_legend(f, settings, chunks[2]);
    }
    render_status_bar(f, app, chunks[3]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let ViewState::Ready {
        profile,
        summary,
        year,
    } = &app.frame.state
    else {
        return;
    };
    let mut spans = vec![
        Span::styled(
            format!(" {}", profile.login),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" · {year}"), Style::default().fg(Color::DarkGray)),
    ];
    if app.frame.settings.show_stats {
        for (label, value) in stats_row(summary) {
            spans.push(Span::raw(format!("   {value} ")));
            spans.push(Span::styled(label, Style::default().fg(Color::DarkGray)));
        }
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_body(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Contributions ");

    // A previous grid stays on screen while a refresh is in flight.
    let showing_grid = matches!(app.frame.state, ViewState::Ready { .. } | ViewState::Loading);
    if let (true, Some(grid)) = (showing_grid, app.grid()) {
        let inner = block.inner(area);
        f.render_widget(block, area);
        let lines = grid_lines(grid, &app.frame.settings, app.selected, inner.width as usize);
        f.render_widget(Paragraph::new(lines), inner);
        return;
    }

    let (text, style) = match &app.frame.state {
        ViewState::Connecting => (
            "Connecting to GitHub… press r to retry once a token is configured".to_string(),
            Style::default().fg(Color::Yellow),
        ),
        ViewState::Loading => ("Loading…".to_string(), Style::default().fg(Color::Cyan)),
        ViewState::Error { title, message } => {
            (format!("{title}\n{message}\n\npress r to retry"), Style::default().fg(Color::Red))
        }
        ViewState::Ready { .. } => ("No contributions to show".to_string(), Style::default()),
    };
    let message = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(message, area);
}

/// Month row plus seven weekday rows. Cells are two columns wide when the
/// whole grid fits, one otherwise.
fn grid_lines(
    grid: &GridView,
    settings: &WidgetSettings,
    selected: (usize, usize),
    width: usize,
) -> Vec<Line<'static>> {
    let palette = palette(settings);
    let gutter = if settings.show_day_labels { GUTTER } else { 0 };
    let cell_width = if gutter + grid.weeks.len() * 2 <= width { 2 } else { 1 };

    let mut lines = Vec::with_capacity(DAYS_PER_WEEK + 1);
    if settings.show_labels {
        lines.push(Line::from(month_row(grid, gutter, cell_width)));
    }

    let labels = day_labels(&settings.language);
    for day in 0..DAYS_PER_WEEK {
        let mut spans = Vec::with_capacity(grid.weeks.len() + 1);
        if gutter > 0 {
            let (name, visible) = labels[day];
            let text = if visible { name } else { "" };
            spans.push(Span::styled(
                format!("{text:<gutter$}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        for week in 0..grid.weeks.len() {
            let Some(level) = grid.level_at(week, day) else {
                spans.push(Span::raw(" ".repeat(cell_width)));
                continue;
            };
            let mut style = Style::default().fg(palette[usize::from(level)]);
            if (week, day) == selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let glyph = if cell_width == 2 {
                format!("{CELL_GLYPH} ")
            } else {
                CELL_GLYPH.to_string()
            };
            spans.push(Span::styled(glyph, style));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn month_row(grid: &GridView, gutter: usize, cell_width: usize) -> String {
    let mut row = " ".repeat(gutter + grid.weeks.len() * cell_width);
    let mut next_free = 0;
    for (&week, name) in &grid.month_labels {
        let at = gutter + week * cell_width;
        if at < next_free || at + name.len() > row.len() {
            continue;
        }
        row.replace_range(at..at + name.len(), name);
        next_free = at + name.len() + 1;
    }
    row
}

fn render_legend(f: &mut Frame, settings: &WidgetSettings, area: Rect) {
    let mut spans = vec![Span::styled(" Less ", Style::default().fg(Color::DarkGray))];
    for color in palette(settings) {
        spans.push(Span::styled(format!("{CELL_GLYPH} "), Style::default().fg(color)));
    }
    spans.push(Span::styled("More", Style::default().fg(Color::DarkGray)));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let pause_indicator = if app.paused { " [PAUSED]" } else { "" };
    let (text, style) = match (&app.frame.state, app.tooltip()) {
        (ViewState::Error { title, .. }, _) => (
            format!(" ERROR: {title}"),
            Style::default().fg(Color::White).bg(Color::Red),
        ),
        (ViewState::Ready { .. }, Some(tip)) => (
            format!(" {} {}{pause_indicator}", tip.headline, tip.detail),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ),
        (state, _) => (
            format!(
                " {}{pause_indicator} | r:retry  f:refresh  m:mode  [/]:year  l/d/s:labels  Space:pause  q:quit",
                state.phase()
            ),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ),
    };
    let bar = Paragraph::new(Line::from(Span::styled(text, style)));
    f.render_widget(bar, area);
}

fn palette(settings: &WidgetSettings) -> [Color; 5] {
    settings
        .color_levels()
        .map(|hex| parse_hex(hex).unwrap_or(Color::DarkGray))
}

/// `#rrggbb` or `#rgb`.
fn parse_hex(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    let channel = |i: usize, len: usize| -> Option<u8> {
        let v = u8::from_str_radix(hex.get(i * len..(i + 1) * len)?, 16).ok()?;
        Some(if len == 1 { v * 17 } else { v })
    };
    let len = match hex.len() {
        6 => 2,
        3 => 1,
        _ => return None,
    };
    Some(Color::Rgb(channel(0, len)?, channel(1, len)?, channel(2, len)?))
}
