//! Stack view: how the deployment is put together.
//!
//! Static content, it does not depend on the dashboard state.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;

/// A technology in the stack and the role it plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackEntry {
    pub name: &'static str,
    pub category: &'static str,
}

/// The technology stack, in display order.
pub const TECH_STACK: [StackEntry; 8] = [
    StackEntry { name: "Next.js 14", category: "Frontend" },
    StackEntry { name: "Flask", category: "Backend" },
    StackEntry { name: "Docker", category: "Container" },
    StackEntry { name: "Nginx", category: "Proxy" },
    StackEntry { name: "Terraform", category: "IaC" },
    StackEntry { name: "Ansible", category: "Config" },
    StackEntry { name: "GitHub Actions", category: "CI/CD" },
    StackEntry { name: "Let's Encrypt", category: "SSL" },
];

/// Render the Stack view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let columns =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).split(area);

    render_architecture(frame, app, columns[0]);
    render_tech_stack(frame, app, columns[1]);
}

fn render_architecture(frame: &mut Frame, app: &App, area: Rect) {
    let layer = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
        ))
    };
    let arrow = || Line::from(Span::styled("        ▼", Style::default().add_modifier(Modifier::DIM)));

    let lines = vec![
        layer(" Client Layer"),
        Line::from("   Browser ── HTTPS ──▶ Nginx"),
        arrow(),
        layer(" VPS Layer"),
        Line::from("   Nginx     :443   TLS termination, reverse proxy"),
        Line::from("   Frontend  :57001 Next.js"),
        Line::from("   Backend   :5000  Flask, /api/data, /metrics"),
        arrow(),
        layer(" Automation"),
        Line::from("   GitHub Actions  build and deploy"),
        Line::from("   Terraform       provision the VPS"),
        Line::from("   Ansible         configure the host"),
    ];

    let block = Block::default()
        .title(" System Architecture ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_tech_stack(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![Cell::from("Technology"), Cell::from("Role")])
        .height(1)
        .style(app.theme.header);

    let rows = TECH_STACK.iter().map(|entry| {
        Row::new(vec![
            Cell::from(entry.name),
            Cell::from(entry.category).style(Style::default().add_modifier(Modifier::DIM)),
        ])
    });

    let table = Table::new(rows, [Constraint::Fill(2), Constraint::Fill(1)])
        .header(header)
        .block(
            Block::default()
                .title(" Technology Stack ")
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );

    frame.render_widget(table, area);
}
