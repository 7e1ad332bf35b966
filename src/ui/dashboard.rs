//! Dashboard view rendering.
//!
//! Three status cards on top, the recent workflow runs when there are any,
//! and the live record table below.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::DashboardState;

/// Rows shown in the record table while the first load is outstanding.
const PLACEHOLDER_ROWS: usize = 3;

/// Message shown when the backend returned no records or never answered.
pub const EMPTY_STATE_MESSAGE: &str = "No data available. Is the backend running?";

/// Render the Dashboard view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.state();

    let workflows_height = if state.shows_workflows() {
        state.visible_workflows().len() as u16 + 2
    } else {
        0
    };

    let chunks = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(workflows_height),
        Constraint::Min(5),
    ])
    .split(area);

    render_cards(frame, app, chunks[0]);
    if state.shows_workflows() {
        render_workflows(frame, app, chunks[1]);
    }
    render_live_data(frame, app, chunks[2]);
}

fn card<'a>(app: &App, title: &'a str, value: Span<'a>, subtitle: &'a str) -> Paragraph<'a> {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    Paragraph::new(vec![
        Line::from(value),
        Line::from(Span::styled(
            subtitle,
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .block(block)
}

fn render_cards(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.state();
    let columns = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let backend = Span::styled(
        state.connectivity.label(),
        app.theme.connectivity_style(state.connectivity).add_modifier(Modifier::BOLD),
    );

    frame.render_widget(
        card(app, "Backend Status", backend, "Flask API Connection"),
        columns[0],
    );
    frame.render_widget(
        card(
            app,
            "Metrics",
            Span::styled("Prometheus", bold),
            "Exposed at /metrics",
        ),
        columns[1],
    );
    frame.render_widget(
        card(
            app,
            "Infrastructure",
            Span::styled("Dockerized", bold),
            "NGINX Proxy",
        ),
        columns[2],
    );
}

fn render_workflows(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .state()
        .visible_workflows()
        .iter()
        .map(|run| {
            let outcome = run.outcome();
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", outcome.symbol()), app.theme.outcome_style(outcome)),
                Span::styled(run.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(
                    run.created_at_local(),
                    Style::default().add_modifier(Modifier::DIM),
                ),
                Span::raw("  "),
                Span::raw(run.status.clone()),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Recent Workflow Runs ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(list, area);
}

fn render_live_data(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.state();
    let block = Block::default()
        .title(live_data_title(state))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if state.shows_empty_state() {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                EMPTY_STATE_MESSAGE,
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![Cell::from("ID"), Cell::from("Name"), Cell::from("Status")])
        .height(1)
        .style(app.theme.header);

    let widths = [
        Constraint::Length(8),
        Constraint::Fill(3),
        Constraint::Fill(1),
    ];

    if state.shows_placeholders() {
        let rows = (0..PLACEHOLDER_ROWS).map(|_| {
            Row::new(vec![Cell::from("··"), Cell::from("··········"), Cell::from("·····")])
                .style(app.theme.placeholder)
        });
        let table = Table::new(rows, widths).header(header).block(block);
        frame.render_widget(table, area);
        return;
    }

    let rows: Vec<Row> = state
        .records
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.id.to_string()),
                Cell::from(r.name.clone()),
                Cell::from(r.status.clone()).style(app.theme.record_status_style(r.is_active())),
            ])
        })
        .collect();

    let selected = app.selected_record_index.min(state.records.len().saturating_sub(1));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut table_state = TableState::default();
    table_state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut table_state);
}

fn live_data_title(state: &DashboardState) -> String {
    if state.records.is_empty() {
        " Live Data ".to_string()
    } else {
        format!(" Live Data ({}) ", state.records.len())
    }
}
