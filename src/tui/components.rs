//! Module to define reusable TUI components for the app

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style, Stylize as _};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};

/// Bold styling
pub fn bold(title: &str) -> Span<'_> {
    Span::styled(title, Style::default().bold())
}

/// Bordered block with a bold title.
pub fn new_simple_box(title: &str) -> Block<'_> {
    Block::bordered().title(bold(title))
}

/// Returns a rectangle of the given size, centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// Message shown over the current page until a key is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    /// Whether the message reports a failure
    is_error: bool,
    /// Text of the popup
    message: String,
    /// Title of the popup
    title: String,
}

impl Popup {
    /// Creates a popup reporting a failure.
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { is_error: true, message: message.into(), title: title.into() }
    }

    /// Creates an informative popup.
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { is_error: false, message: message.into(), title: title.into() }
    }

    /// Returns the text of the popup.
    #[cfg(test)]
    pub fn as_message(&self) -> &str {
        &self.message
    }

    /// Draws the popup in the middle of the frame.
    pub fn render(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let width = area.width.saturating_sub(4).min(70);
        let text_lines =
            u16::try_from(self.message.lines().count()).unwrap_or(u16::MAX);
        let height = text_lines.saturating_add(4).min(area.height);
        let rect = centered(area, width, height);

        let colour = if self.is_error { Color::Red } else { Color::Cyan };
        let mut lines: Vec<Line<'_>> =
            self.message.lines().map(Line::from).collect();
        lines.push(Line::from(""));
        lines.push(Line::from("Press any key to close").italic());

        let block = new_simple_box(&self.title)
            .border_style(Style::new().fg(colour));
        let popup = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(Clear, rect);
        frame.render_widget(popup, rect);
    }
}
