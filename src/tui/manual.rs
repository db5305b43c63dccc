//! Defines the manual page to render on the screen
//!
//! This manual explains usage and the different keybindings for the app.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Paragraph, Wrap};

use super::components::bold;

/// Displays the manual page to the given area
pub fn manual_page(frame: &mut Frame<'_>, area: Rect) {
    let lines = vec![
        Line::from(bold("mailclerk")),
        Line::from(""),
        Line::from("A terminal app to read and write emails."),
        Line::from("Several accounts can be set up, one of them is active."),
        Line::from(""),
        Line::from("> Press 'q' to exit the application."),
        Line::from("> Press 'Esc' to come back to the inbox."),
        Line::from(""),
        Line::from(bold("Inbox")),
        Line::from(""),
        Line::from("- 'r': load the 20 most recent emails"),
        Line::from("- 'j' / 'k': select next / previous email"),
        Line::from("- 'l' or 'Enter': open the selected email"),
        Line::from("- 'h': close the email viewer"),
        Line::from("- 'w': write an email"),
        Line::from("- 'm': show this manual"),
        Line::from(""),
        Line::from(bold("Accounts")),
        Line::from(""),
        Line::from("- 'a': add an account"),
        Line::from("- 'e': edit the active account"),
        Line::from("- 's': switch to or delete an account"),
        Line::from(""),
        Line::from(bold("Writer")),
        Line::from(""),
        Line::from("- 't', 's', 'b': edit the destination(s), subject or body"),
        Line::from("- 'Esc': stop editing, then discard the email"),
        Line::from("- 'Enter' when no field is edited: send the email"),
        Line::from(""),
        Line::from("Destinations are separated with commas."),
    ];

    let help = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
    frame.render_widget(help, area);
}
