//! Composer page, to write an email and send it with the active account.

use ratatui::Frame;
use ratatui::crossterm::event::{Event, KeyCode};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Text;
use ratatui::widgets::{Paragraph, Wrap};
use tui_input::backend::crossterm::EventHandler as _;
use tui_input::{Input, InputRequest};

use super::components::new_simple_box;
use crate::send::Draft;

/// What the composer asks the TUI to do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum WriterAction {
    /// Leave the composer without sending
    Cancel,
    /// Key was consumed by the composer
    Handled,
    /// Key is not a composer key
    Ignored,
    /// Send the draft
    Send,
}

/// Representation of the writer, with the different boxes.
#[derive(Default)]
pub struct Writer {
    /// Address of the active account, displayed as sender
    from: String,
    /// Input to enter the subject of the email
    subject: Input,
    /// Input to enter the destination(s) of the email
    ///
    /// If there are multiple destinations, they must be separated with a
    /// comma. Spaces are ignored.
    to: Input,
    /// Input to enter the body of the email
    body: Input,
    /// State of the writer
    ///
    /// Specifies what Input is being edited
    state: WriterState,
}

impl Writer {
    /// Returns the email written so far.
    pub fn draft(&self) -> Draft {
        Draft {
            to: self.to.value().trim().to_owned(),
            subject: self.subject.value().to_owned(),
            body: self.body.value().to_owned(),
        }
    }

    /// Handler to manage keypresses.
    pub fn handle_key_events(&mut self, event: &Event) -> WriterAction {
        let Event::Key(key) = event else {
            return WriterAction::Ignored;
        };
        match (&self.state, key.code) {
            (WriterState::None, KeyCode::Char('t')) =>
                self.state = WriterState::To,
            (WriterState::None, KeyCode::Char('s')) =>
                self.state = WriterState::Subject,
            (WriterState::None, KeyCode::Char('b')) =>
                self.state = WriterState::Body,
            (WriterState::None, KeyCode::Enter) => return WriterAction::Send,
            (WriterState::None, KeyCode::Esc) => return WriterAction::Cancel,
            (
                WriterState::To | WriterState::Subject | WriterState::Body,
                KeyCode::Esc,
            ) => self.state = WriterState::None,
            (WriterState::Body, KeyCode::Enter) => {
                self.body.handle(InputRequest::InsertChar('\n'));
            }
            (WriterState::Subject, _) => {
                self.subject.handle_event(event);
            }
            (WriterState::Body, _) => {
                self.body.handle_event(event);
            }
            (WriterState::To, _) => {
                self.to.handle_event(event);
            }
            (WriterState::None, _) => return WriterAction::Ignored,
        }
        WriterAction::Handled
    }

    /// Creates an empty writer sending from `from`.
    pub fn new(from: &str) -> Self {
        Self { from: from.to_owned(), ..Self::default() }
    }

    /// Main method to display the layout on every re-render of the page
    pub fn writer_page(&self, frame: &mut Frame<'_>, area: Rect) {
        let [from_area, to_area, subject_area, body_area, hint_area] =
            Layout::vertical([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Fill(1),
                Constraint::Length(1),
            ])
            .areas(area);

        let from =
            Paragraph::new(self.from.as_str()).block(new_simple_box("From"));
        frame.render_widget(from, from_area);
        self.render_input(frame, to_area, "To (t)", &self.to, WriterState::To);
        self.render_input(
            frame,
            subject_area,
            "Subject (s)",
            &self.subject,
            WriterState::Subject,
        );
        self.render_input(
            frame,
            body_area,
            "Body (b)",
            &self.body,
            WriterState::Body,
        );
        frame.render_widget(
            Text::from("Esc: stop editing / cancel   Enter: send"),
            hint_area,
        );
    }

    /// Renders one input, highlighted when it is being edited.
    fn render_input(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        title: &str,
        input: &Input,
        state: WriterState,
    ) {
        let style = if self.state == state {
            Style::new().fg(Color::Yellow)
        } else {
            Style::new()
        };
        let widget = Paragraph::new(input.value())
            .wrap(Wrap { trim: false })
            .block(new_simple_box(title).border_style(style));
        frame.render_widget(widget, area);
    }
}

/// State of the writer, informing on which input is being edited by the client.
#[derive(Default, PartialEq, Eq)]
enum WriterState {
    /// No Input is being edited.
    ///
    /// Press `Esc` to enter this mode.
    #[default]
    None,
    /// The destination input is being edited.
    ///
    /// Press `t` to enter this mode.
    To,
    /// The subject input is being edited.
    ///
    /// Press `s` to enter this mode.
    Subject,
    /// The body input is being edited.
    ///
    /// Press `b` to enter this mode.
    Body,
}
