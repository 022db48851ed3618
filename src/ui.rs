//! Terminal user interface with ratatui.

use crate::api::QuoteProvider;
use crate::app::App;
use crate::export::{HEADERS, format_change, format_percent, format_price, row_cells};
use crate::models::TickerRow;
use crate::signals::Verdict;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

/// Colors for the UI.
pub struct UiColors {
    pub sell: Color,
    pub buy: Color,
    pub muted: Color,
    pub header_bg: Color,
    pub selected_bg: Color,
    pub border: Color,
}

impl Default for UiColors {
    fn default() -> Self {
        Self {
            sell: Color::Red,
            buy: Color::Green,
            muted: Color::DarkGray,
            header_bg: Color::DarkGray,
            selected_bg: Color::Rgb(40, 40, 60),
            border: Color::DarkGray,
        }
    }
}

/// Render the main UI.
pub fn render<P: QuoteProvider>(frame: &mut Frame, app: &App<P>) {
    let colors = UiColors::default();

    let header_height = if app.show_header { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    if app.show_header {
        render_header(frame, app, chunks[0], &colors);
    }

    if app.show_details {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
            .split(chunks[1]);
        render_tickers_table(frame, app, panes[0], &colors);
        render_details(frame, app.selected_row(), panes[1], &colors);
    } else {
        render_tickers_table(frame, app, chunks[1], &colors);
    }

    render_footer(frame, app, chunks[2], &colors);

    if app.show_help {
        render_help_overlay(frame, &colors);
    }

    if let Some(ref error) = app.error {
        render_error(frame, error, &colors);
    }
}

/// Render the header with signal counts.
fn render_header<P: QuoteProvider>(frame: &mut Frame, app: &App<P>, area: Rect, colors: &UiColors) {
    let summary = app.summary();

    let header_text = vec![
        Line::from(vec![
            Span::styled(
                "Stock Analyzer ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("- {} tickers", app.rows.len())),
        ]),
        Line::from(vec![
            Span::styled(format!("{} ", summary.sell), Style::default().fg(colors.sell)),
            Span::raw("sell  "),
            Span::styled(format!("{} ", summary.buy), Style::default().fg(colors.buy)),
            Span::raw("buy  "),
            Span::raw(format!("{} n/a  ", summary.unclassifiable)),
            Span::raw(format!("{} no data  ", summary.no_data)),
            Span::raw(format!("Updated: {}", app.time_since_refresh())),
        ]),
    ];

    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(colors.border)),
    );

    frame.render_widget(header, area);
}

fn verdict_style(verdict: &Verdict, colors: &UiColors) -> Style {
    match verdict {
        Verdict::Signals(_) if verdict.has_sell() => Style::default().fg(colors.sell),
        Verdict::Signals(_) if verdict.has_buy() => Style::default().fg(colors.buy),
        Verdict::Signals(_) => Style::default(),
        Verdict::NoData | Verdict::Unclassifiable(_) => Style::default().fg(colors.muted),
    }
}

/// Render the tickers table.
fn render_tickers_table<P: QuoteProvider>(
    frame: &mut Frame,
    app: &App<P>,
    area: Rect,
    colors: &UiColors,
) {
    let header_cells = HEADERS
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::White)));

    let header = Row::new(header_cells)
        .style(Style::default().bg(colors.header_bg))
        .height(1);

    let rows = app.rows.iter().enumerate().map(|(i, row)| {
        let row_style = if i == app.selected {
            Style::default().bg(colors.selected_bg)
        } else {
            Style::default()
        };

        let change_color = match row.change() {
            Some(c) if c > 0.0 => colors.buy,
            Some(c) if c < 0.0 => colors.sell,
            _ => Color::White,
        };

        let cells = row_cells(row).into_iter().enumerate().map(|(col, text)| {
            let cell = Cell::from(text);
            match col {
                8 | 9 => cell.style(Style::default().fg(change_color)),
                10 => cell.style(verdict_style(&row.verdict, colors)),
                _ => cell,
            }
        });

        Row::new(cells).style(row_style)
    });

    let widths = [
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::NONE))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(table, area, &mut state);
}

/// Param/value pairs for the highlighted row.
fn detail_pairs(row: &TickerRow) -> Vec<(&'static str, String)> {
    let quote = row.quote.as_ref();
    let text = |value: Option<&String>| value.cloned().unwrap_or_else(|| "-".to_string());

    let mut pairs = vec![
        ("Symbol", row.symbol.to_string()),
        ("Name", text(quote.and_then(|q| q.name.as_ref()))),
        ("Exchange", text(quote.and_then(|q| q.exchange.as_ref()))),
        ("Currency", text(quote.and_then(|q| q.currency.as_ref()))),
        (
            "Market",
            quote.map_or_else(|| "-".to_string(), |q| q.market_state.to_string()),
        ),
        ("Price", format_price(row.price())),
        ("Bid", format_price(row.bid())),
        ("Ask", format_price(row.ask())),
        ("Change", format_change(row.change())),
        ("Change %", format_percent(row.change_percent())),
        (
            "Range 1y",
            format!("{} - {}", format_price(row.year_low()), format_price(row.year_high())),
        ),
        (
            "Range 1d",
            format!("{} - {}", format_price(row.day_low()), format_price(row.day_high())),
        ),
        (
            "As of",
            quote.map_or_else(
                || "-".to_string(),
                |q| q.timestamp.format("%Y-%m-%d %H:%M UTC").to_string(),
            ),
        ),
    ];

    let verdict = match &row.verdict {
        Verdict::Unclassifiable(e) => e.to_string(),
        Verdict::Signals(advisories) if advisories.is_empty() => "hold".to_string(),
        v => v.to_string(),
    };
    pairs.push(("Thoughts", verdict));
    pairs
}

/// Render the details pane.
fn render_details(frame: &mut Frame, row: Option<&TickerRow>, area: Rect, colors: &UiColors) {
    let header = Row::new(["Param", "Value"])
        .style(Style::default().bg(colors.header_bg))
        .height(1);

    let rows: Vec<Row> = row
        .map(detail_pairs)
        .unwrap_or_default()
        .into_iter()
        .map(|(param, value)| Row::new([Cell::from(param), Cell::from(value)]))
        .collect();

    let table = Table::new(rows, [Constraint::Length(10), Constraint::Min(10)])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::LEFT)
                .border_style(Style::default().fg(colors.border)),
        );

    frame.render_widget(table, area);
}

/// Render the footer: status on the left, key hints on the right.
fn render_footer<P: QuoteProvider>(frame: &mut Frame, app: &App<P>, area: Rect, colors: &UiColors) {
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(33), Constraint::Percentage(67)])
        .split(area);

    let status = Paragraph::new(format!(" {}", app.status))
        .style(Style::default().bg(colors.header_bg));

    let keys = Line::from(vec![
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(":quit "),
        Span::styled("u", Style::default().fg(Color::Yellow)),
        Span::raw(":update "),
        Span::styled("d", Style::default().fg(Color::Yellow)),
        Span::raw(":details "),
        Span::styled("h", Style::default().fg(Color::Yellow)),
        Span::raw(":help "),
        Span::raw(format!("| Iter: {}", app.iteration)),
    ])
    .right_aligned();

    let footer = Paragraph::new(keys).style(Style::default().bg(colors.header_bg));

    frame.render_widget(status, parts[0]);
    frame.render_widget(footer, parts[1]);
}

/// Render help overlay.
fn render_help_overlay(frame: &mut Frame, colors: &UiColors) {
    let area = centered_rect(60, 70, frame.area());

    let help_text = vec![
        Line::from(Span::styled(
            "TICKRS HELP",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  ↑/k       Move up"),
        Line::from("  ↓/j       Move down"),
        Line::from("  g/Home    Go to top"),
        Line::from("  G/End     Go to bottom"),
        Line::from("  PgUp      Page up"),
        Line::from("  PgDn      Page down"),
        Line::from(""),
        Line::from("Display:"),
        Line::from("  d         Toggle details pane"),
        Line::from(""),
        Line::from("Actions:"),
        Line::from("  u/Space/R Update now"),
        Line::from("  q/Esc     Quit"),
        Line::from("  h/?       Toggle help"),
        Line::from(""),
        Line::from("Thoughts:"),
        Line::from("  sell/buy when within 20% of the 52-week high/low"),
        Line::from(""),
        Line::from("Press any key to close"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

/// Render error message.
fn render_error(frame: &mut Frame, error: &str, colors: &UiColors) {
    let area = centered_rect(50, 20, frame.area());

    let error_widget = Paragraph::new(error)
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.sell)),
        )
        .style(Style::default().fg(colors.sell))
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(error_widget, area);
}

/// Create a centered rectangle.
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
