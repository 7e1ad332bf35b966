//! Terminal rendering.

pub mod common;
pub mod dashboard;
pub mod stack;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, View};

/// Minimum terminal width for usable display.
pub const MIN_WIDTH: u16 = 60;
/// Minimum terminal height for usable display.
pub const MIN_HEIGHT: u16 = 12;

/// Draw one full frame: header, tabs, current view, status bar and overlays.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5)
            .intersection(area);
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(1), // Tabs
        Constraint::Min(8),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_tabs(frame, app, chunks[1]);

    match app.current_view {
        View::Dashboard => dashboard::render(frame, app, chunks[2]),
        View::Stack => stack::render(frame, app, chunks[2]),
    }

    common::render_status_bar(frame, app, chunks[3]);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::render_text;
    use super::*;
    use tokio::runtime::Handle;

    use crate::data::ReconcilePolicy;
    use crate::refresh::Dashboard;
    use crate::source::test_support::{FixedRecords, FixedWorkflows};

    fn app() -> App {
        let dashboard = Dashboard::new(
            FixedRecords::new(Ok(vec![])),
            FixedWorkflows::new(Ok(vec![])),
            Handle::current(),
        );
        App::with_theme(dashboard, ReconcilePolicy::default(), Theme::dark())
    }

    #[tokio::test]
    async fn test_too_small_terminal() {
        let text = render_text(&app(), 40, 10);
        assert!(text.contains("Terminal too small: 40x10"));
    }

    #[tokio::test]
    async fn test_help_overlay() {
        let mut app = app();
        app.toggle_help();
        let text = render_text(&app, 80, 30);
        assert!(text.contains("Keyboard Shortcuts"));
        assert!(text.contains("Refresh live data"));
    }
}
