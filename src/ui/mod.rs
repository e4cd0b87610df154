mod components;

use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::analyzer::{AnalysisEvent, Backend};
use crate::app::{App, Focus, Popup};
use crate::theme::Theme;

// Load theme colors once at startup
static THEME: OnceLock<Theme> = OnceLock::new();

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::load)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn danger() -> Color { theme().danger }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn disabled() -> Color { theme().disabled }
fn bg_selected() -> Color { theme().bg_selected }
fn inactive() -> Color { theme().inactive }
fn header() -> Color { theme().header }

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let composer_height = components::composer_height(&app.composer.view(app.loading));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1),                // Info line
            Constraint::Length(composer_height),  // Field, submit, examples
            Constraint::Min(3),                   // Result panel
            Constraint::Length(1),                // Footer
        ])
        .split(area);

    draw_info_line(f, app, chunks[0]);
    components::draw_composer(f, &app.composer, app.loading, app.focus, chunks[1]);
    draw_result(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);

    if app.popup == Popup::Help {
        draw_help_popup(f, app);
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    // Priority: status message > loading > mode hint
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status, Style::default().fg(warning())))
    } else if app.loading {
        Line::from(vec![
            Span::styled("󰔟 ", Style::default().fg(warning())),
            Span::styled("Waiting for the analyze command", Style::default().fg(text_dim())),
        ])
    } else {
        match app.backend {
            Backend::Pick => Line::from(Span::styled(
                "No analyze command configured: the question is printed on submit",
                Style::default().fg(text_dim()),
            )),
            Backend::Command { .. } => Line::from(Span::styled("Ready", Style::default().fg(text_dim()))),
        }
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_result(f: &mut Frame, app: &App, area: Rect) {
    let (title, color, lines) = match &app.last_result {
        Some(AnalysisEvent::Finished { question, output }) => {
            let mut lines = vec![
                Line::from(Span::styled(question.as_str(), Style::default().fg(header()).add_modifier(Modifier::BOLD))),
                Line::from(""),
            ];
            lines.extend(output.lines().map(|l| Line::styled(l, Style::default().fg(text()))));
            (" Answer ", success(), lines)
        }
        Some(AnalysisEvent::Failed { question, error }) => (
            " Failed ",
            danger(),
            vec![
                Line::from(Span::styled(question.as_str(), Style::default().fg(header()).add_modifier(Modifier::BOLD))),
                Line::from(""),
            ]
            .into_iter()
            .chain(error.lines().map(|l| Line::styled(l, Style::default().fg(danger()))))
            .collect::<Vec<_>>(),
        ),
        None => (
            " Answer ",
            inactive(),
            vec![Line::styled("No analysis yet", Style::default().fg(text_dim()))],
        ),
    };

    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(color)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let result = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll.min(app.max_result_scroll()), 0))
        .block(block);

    f.render_widget(result, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let mut hints = match app.focus {
        Focus::Field => vec![("Enter", "analyze"), ("Tab", "examples"), ("^U", "clear")],
        Focus::Presets => vec![("↑/↓", "move"), ("Enter", "use"), ("Tab", "question")],
    };
    hints.extend([("PgUp/PgDn", "scroll"), ("F1", "help"), ("Esc", "quit")]);

    let mut spans = Vec::new();
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(inactive())));
        }
        spans.push(Span::styled(*key, Style::default().fg(accent())));
        spans.push(Span::styled(format!(" {}", action), Style::default().fg(text_dim())));
    }

    if app.focus == Focus::Presets {
        spans.push(Span::styled(" │ ", Style::default().fg(inactive())));
        spans.push(Span::styled(format!("1-{}", app.preset_count()), Style::default().fg(accent())));
        spans.push(Span::styled(" pick", Style::default().fg(text_dim())));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn draw_help_popup(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 30 { 95 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(header()).add_modifier(Modifier::BOLD)))
    };
    let key_line = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", key), Style::default().fg(accent())),
            Span::raw(desc),
        ])
    };

    let mode = match &app.backend {
        Backend::Pick => "  Submitted question is printed to stdout".to_string(),
        Backend::Command { command, .. } => format!("  Running: {}", command),
    };

    let help_text = vec![
        section("═══ Question ═══"),
        key_line("Enter", "Send the question (disabled while an analysis runs)"),
        key_line("Ctrl-U", "Clear the question"),
        key_line("Tab", "Switch between question and examples"),
        Line::from(""),
        section("═══ Examples ═══"),
        key_line("↑/↓ j/k", "Move between examples"),
        key_line("Enter", "Copy the example into the question"),
        key_line("1-9", "Copy example by number"),
        Line::from(""),
        section("═══ Analyze Command ═══"),
        Line::styled(mode, Style::default().fg(text_dim())),
        Line::from(vec![
            Span::styled("  ~/.config/soru/config.toml", Style::default().fg(text_dim())),
            Span::raw(" analyze_command, question is $1"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("F1", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" soru Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_draw_failed_result() {
        let mut app = App::new(AppConfig::default(), Backend::Pick);
        app.last_result = Some(AnalysisEvent::Failed {
            question: "En pahalı 5 ürün nedir?".to_string(),
            error: "analyze command exited with 1: no table".to_string(),
        });

        let text = screen(&app);
        assert!(text.contains("Failed"));
        assert!(text.contains("no table"));
    }

    #[test]
    fn test_draw_help_popup() {
        let mut app = App::new(AppConfig::default(), Backend::Pick);
        app.popup = Popup::Help;
        assert!(screen(&app).contains("soru Help"));
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(50, 50, outer);
        assert!(inner.x >= outer.x && inner.right() <= outer.right());
        assert!(inner.y >= outer.y && inner.bottom() <= outer.bottom());
    }
}
