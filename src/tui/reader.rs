//! Draws the email explorer and the email viewer.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{List, ListItem, Paragraph, Wrap};

use super::components::new_simple_box;
use crate::app::App;
use crate::fetch::parser::MessageSummary;

/// Draws the list of emails and, if one is opened, its content.
pub fn draw_emails(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let [explorer, viewer] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(2)])
            .areas(area);
    frame.render_widget(email_explorer_widget(app), explorer);
    match app.opened_message() {
        Some(email) => draw_email_viewer(frame, viewer, email),
        None => frame.render_widget(
            Paragraph::new(placeholder(app))
                .wrap(Wrap { trim: false })
                .block(new_simple_box("Email viewer")),
            viewer,
        ),
    }
}

/// Hint displayed in the viewer when no email is opened.
fn placeholder(app: &App) -> &'static str {
    if app.active_label().is_none() {
        "Add an account with 'a'."
    } else if app.as_messages().is_empty() {
        "Press 'r' to load emails for the active account."
    } else {
        "Select an email with 'j'/'k' and open it with 'l'."
    }
}

/// Creates the widget representing the email explorer
///
/// This is left panel of the window, giving the list of received emails and
/// enabling the user to select an email to display.
fn email_explorer_widget(app: &App) -> List<'_> {
    let items = app.as_messages().iter().enumerate().map(|(id, email)| {
        let date = email.date.as_deref().unwrap_or("No date");
        let raw_text = Text::from(vec![
            Line::from(email.subject.as_str()),
            Line::from(date),
        ]);
        let styled_text = if app.current_id() == id {
            raw_text.style(Style::new().bg(Color::DarkGray))
        } else {
            raw_text
        };
        ListItem::from(styled_text)
    });
    List::new(items).block(new_simple_box("Recent emails"))
}

/// Draws the panel displaying the content of the selected email.
fn draw_email_viewer(
    frame: &mut Frame<'_>,
    rect: Rect,
    email: &MessageSummary,
) {
    let block = new_simple_box("Email viewer");
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let [from_area, to_area, subject_area, body_area] = Layout::vertical([
        Constraint::Max(3),
        Constraint::Max(3),
        Constraint::Max(4),
        Constraint::Fill(1),
    ])
    .areas(inner);

    frame.render_widget(field("From", &email.from), from_area);
    frame.render_widget(field("To", &email.to), to_area);
    frame.render_widget(field("Subject", &email.subject), subject_area);
    let body = Paragraph::new(Text::from(email.body.as_str()))
        .wrap(Wrap { trim: false });
    frame.render_widget(body, body_area);
}

/// Bordered paragraph showing one header of the email.
fn field<'email>(
    title: &'email str,
    value: &'email str,
) -> Paragraph<'email> {
    Paragraph::new(Text::from(value))
        .wrap(Wrap { trim: false })
        .block(new_simple_box(title))
}
