//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use chrono::Utc;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::ConnectivityStatus;

/// Render the header bar with backend connectivity and counts.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.state();
    let status_style = app.theme.connectivity_style(state.connectivity);

    let mut spans = vec![
        Span::styled(" ● ", status_style),
        Span::styled("OPSBOARD ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ Backend: "),
        Span::styled(state.connectivity.label(), status_style),
        Span::raw(" │ "),
        Span::styled(
            format!("{}", state.records.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" records │ "),
        Span::styled(
            format!("{}", state.workflows.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" runs"),
    ];
    if state.is_loading {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            "Loading...",
            Style::default().fg(app.theme.highlight),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Dashboard "), Line::from(" 2:Stack ")];

    let selected = match app.current_view {
        View::Dashboard => 0,
        View::Stack => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows the age of the record snapshot and the available controls, or a
/// temporary status message.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let state = app.state();
    let controls = match app.current_view {
        View::Dashboard => "↑↓:select r:refresh e:export Tab:switch ?:help q:quit",
        View::Stack => "Tab:switch ?:help q:quit",
    };

    let status = match (state.records_updated_at, state.connectivity) {
        (_, ConnectivityStatus::Offline) => {
            format!(" Backend unreachable | r:retry | {}", controls)
        }
        (Some(at), _) => {
            let elapsed = (Utc::now() - at).num_milliseconds().max(0) as f64 / 1000.0;
            format!(" Updated {:.1}s ago | {}", elapsed, controls)
        }
        (None, _) => format!(" {} | {}", app.source_description(), controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  1/2         Dashboard / Stack"),
        Line::from("  ↑/↓ j/k     Navigate records"),
        Line::from("  PgUp/PgDn   Jump 10 records"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Refresh live data"),
        Line::from("  e         Export to JSON"),
        Line::from("  ?         Toggle this help"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 19u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use tokio::runtime::Handle;

    use crate::app::App;
    use crate::data::{ReconcilePolicy, Record};
    use crate::error::FetchError;
    use crate::refresh::{Dashboard, RefreshPhase};
    use crate::source::test_support::{FixedRecords, FixedWorkflows};
    use crate::ui::test_support::render_text;
    use crate::ui::Theme;

    fn app(outcome: Result<Vec<Record>, FetchError>) -> App {
        let dashboard = Dashboard::new(
            FixedRecords::new(outcome),
            FixedWorkflows::new(Ok(vec![])),
            Handle::current(),
        );
        App::with_theme(dashboard, ReconcilePolicy::default(), Theme::dark())
    }

    async fn settle(app: &mut App) {
        while app.phase() == RefreshPhase::Loading {
            tokio::task::yield_now().await;
            app.poll_updates();
        }
    }

    #[tokio::test]
    async fn test_header_before_mount() {
        let text = render_text(&app(Ok(vec![])), 100, 20);
        let header = text.lines().next().unwrap();
        assert!(header.contains("Backend: Checking"));
        assert!(header.contains("0 records"));
        assert!(!header.contains("Loading..."));
    }

    #[tokio::test]
    async fn test_header_while_loading() {
        let mut app = app(Ok(vec![]));
        app.mount();
        let text = render_text(&app, 100, 20);
        assert!(text.lines().next().unwrap().contains("Loading..."));
    }

    #[tokio::test]
    async fn test_header_online_and_offline() {
        let mut online = app(Ok(vec![Record::new(1, "svc-a", "active")]));
        online.mount();
        settle(&mut online).await;
        let text = render_text(&online, 100, 20);
        assert!(text.lines().next().unwrap().contains("Backend: Online"));
        assert!(text.lines().next().unwrap().contains("1 records"));
        assert!(text.contains("Updated"));

        let mut offline = app(Err(FetchError::Transport("refused".into())));
        offline.mount();
        settle(&mut offline).await;
        let text = render_text(&offline, 100, 20);
        assert!(text.lines().next().unwrap().contains("Backend: Offline"));
        assert!(text.contains("Backend unreachable"));
    }

    #[tokio::test]
    async fn test_status_message_replaces_controls() {
        let mut app = app(Ok(vec![]));
        app.set_status_message("Exported to dashboard_export.json".to_string());
        let text = render_text(&app, 100, 20);
        assert!(text.lines().last().unwrap().contains("Exported to dashboard_export.json"));
    }
}
