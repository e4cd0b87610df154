//! Question composer widgets
//!
//! The text field, the submit control and the example list. Every
//! enabled/disabled decision comes from [`QuestionComposer::view`].

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{accent, bg_selected, disabled, inactive, text, text_dim, warning};
use crate::app::Focus;
use crate::composer::{ComposerView, QuestionComposer};

const PLACEHOLDER: &str = "Ask a question about your data...";

/// Height the composer needs: field row plus one line per example
pub fn composer_height(view: &ComposerView) -> u16 {
    3 + view.presets.len() as u16 + 2
}

pub fn draw_composer(f: &mut Frame, composer: &QuestionComposer, loading: bool, focus: Focus, area: Rect) {
    let view = composer.view(loading);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(2)])
        .split(area);

    let submit_width = view.submit_label.width() as u16 + 6;
    let form = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(submit_width)])
        .split(rows[0]);

    draw_field(f, composer, &view, focus == Focus::Field, form[0]);
    draw_submit(f, &view, form[1]);
    draw_presets(f, composer, &view, focus == Focus::Presets, rows[1]);
}

fn border_color(is_disabled: bool, is_focused: bool) -> ratatui::style::Color {
    if is_disabled {
        disabled()
    } else if is_focused {
        accent()
    } else {
        inactive()
    }
}

fn draw_field(f: &mut Frame, composer: &QuestionComposer, view: &ComposerView, is_focused: bool, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Question ", Style::default().fg(border_color(view.field_disabled, is_focused))))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color(view.field_disabled, is_focused)));

    // Keep the end of a long draft (where the cursor is) in view
    let inner_width = area.width.saturating_sub(3) as usize;
    let visible = visible_tail(composer.draft(), inner_width);

    let line = if composer.draft().is_empty() {
        let color = if view.field_disabled { disabled() } else { text_dim() };
        Line::from(Span::styled(PLACEHOLDER, Style::default().fg(color)))
    } else if view.field_disabled {
        Line::from(Span::styled(visible, Style::default().fg(disabled())))
    } else {
        Line::from(Span::styled(visible, Style::default().fg(text())))
    };

    f.render_widget(Paragraph::new(line).block(block), area);

    if is_focused && !view.field_disabled {
        let x = area.x + 1 + visible.width() as u16;
        f.set_cursor_position(Position::new(x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// Longest suffix of `text` that fits in `width` terminal columns
fn visible_tail(text: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();

    for (i, c) in text.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > width {
            break;
        }
        start = i;
    }

    &text[start..]
}

fn draw_submit(f: &mut Frame, view: &ComposerView, area: Rect) {
    let label_style = if view.in_progress {
        Style::default().fg(warning()).add_modifier(Modifier::ITALIC)
    } else if view.submit_disabled {
        Style::default().fg(disabled())
    } else {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    };

    let border = if view.submit_disabled { disabled() } else { accent() };

    let button = Paragraph::new(Line::from(Span::styled(view.submit_label, label_style)))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );

    f.render_widget(button, area);
}

fn draw_presets(f: &mut Frame, composer: &QuestionComposer, view: &ComposerView, is_focused: bool, area: Rect) {
    let color = border_color(view.presets_disabled, is_focused);
    let block = Block::default()
        .title(Span::styled(" Examples (Tab) ", Style::default().fg(color)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let items: Vec<ListItem> = view
        .presets
        .iter()
        .enumerate()
        .map(|(i, preset)| {
            let (number_style, text_style) = if view.presets_disabled {
                (Style::default().fg(disabled()), Style::default().fg(disabled()))
            } else {
                (Style::default().fg(accent()), Style::default().fg(text()))
            };

            let row_style = if is_focused && !view.presets_disabled && i == composer.highlighted() {
                Style::default().bg(bg_selected())
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!(" {}. ", i + 1), number_style),
                Span::styled(*preset, text_style),
            ]))
            .style(row_style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
