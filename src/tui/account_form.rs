//! Settings form, to add an account or edit the active one.

use ratatui::Frame;
use ratatui::crossterm::event::{Event, KeyCode};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Text;
use ratatui::widgets::Paragraph;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler as _;

use super::components::new_simple_box;
use crate::accounts::Account;

/// Labels of the form fields, in display order.
const FIELDS: [&str; 7] = [
    "Account name",
    "Email (username)",
    "Password",
    "IMAP server",
    "IMAP port",
    "SMTP server",
    "SMTP port",
];

/// Index of the password field, rendered masked.
const PASSWORD_FIELD: usize = 2;

/// What the form asks the TUI to do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum FormAction {
    /// Close the form without saving
    Cancel,
    /// Key was consumed by the form
    Handled,
    /// Save the account
    Save,
}

/// Form holding one input per account field.
pub struct AccountForm {
    /// Index of the edited field in [`FIELDS`]
    focus: usize,
    /// Inputs, in the order of [`FIELDS`]
    inputs: [Input; 7],
    /// Whether the form adds an account, or edits the active one
    is_new: bool,
}

impl AccountForm {
    /// Builds the account typed in the form.
    ///
    /// Ports must be integers. Text fields are trimmed, except the password.
    pub fn to_account(&self) -> Result<Account, &'static str> {
        let [
            label,
            email,
            password,
            imap_server,
            imap_port,
            smtp_server,
            smtp_port,
        ] = &self.inputs;
        let port = |input: &Input| input.value().trim().parse::<u16>();
        let (Ok(imap_port), Ok(smtp_port)) = (port(imap_port), port(smtp_port))
        else {
            return Err("IMAP and SMTP ports must be integers.");
        };
        Ok(Account {
            label: label.value().trim().to_owned(),
            email: email.value().trim().to_owned(),
            password: password.value().to_owned(),
            imap_server: imap_server.value().trim().to_owned(),
            imap_port,
            smtp_server: smtp_server.value().trim().to_owned(),
            smtp_port,
        })
    }

    /// Opens the form pre-filled with `account`.
    pub fn edit(account: &Account) -> Self {
        Self {
            focus: 0,
            inputs: [
                Input::new(account.label.clone()),
                Input::new(account.email.clone()),
                Input::new(account.password.clone()),
                Input::new(account.imap_server.clone()),
                Input::new(account.imap_port.to_string()),
                Input::new(account.smtp_server.clone()),
                Input::new(account.smtp_port.to_string()),
            ],
            is_new: false,
        }
    }

    /// Handler to manage keypresses.
    pub fn handle_key_events(&mut self, event: &Event) -> FormAction {
        if let Event::Key(key) = event {
            match key.code {
                KeyCode::Esc => return FormAction::Cancel,
                KeyCode::Enter => return FormAction::Save,
                KeyCode::Tab | KeyCode::Down =>
                    self.focus = (self.focus + 1) % FIELDS.len(),
                KeyCode::BackTab | KeyCode::Up =>
                    self.focus = (self.focus + FIELDS.len() - 1) % FIELDS.len(),
                _ => {
                    if let Some(input) = self.inputs.get_mut(self.focus) {
                        input.handle_event(event);
                    }
                }
            }
        }
        FormAction::Handled
    }

    /// Returns `true` if the form adds a new account.
    pub const fn is_new(&self) -> bool {
        self.is_new
    }

    /// Opens an empty form, with the default ports.
    pub fn new() -> Self {
        Self { is_new: true, ..Self::edit(&Account::default()) }
    }

    /// Draws the form, one bordered input per field.
    pub fn form_page(&self, frame: &mut Frame<'_>, area: Rect) {
        let title =
            if self.is_new { "Add account" } else { "Edit active account" };
        let block = new_simple_box(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut constraints = vec![Constraint::Length(3); FIELDS.len()];
        constraints.push(Constraint::Length(1));
        let rows = Layout::vertical(constraints).split(inner);

        let fields = FIELDS.iter().zip(&self.inputs).zip(rows.iter());
        for (index, ((label, input), row)) in fields.enumerate() {
            let value = if index == PASSWORD_FIELD {
                "*".repeat(input.value().chars().count())
            } else {
                input.value().to_owned()
            };
            let style = if index == self.focus {
                Style::new().fg(Color::Yellow)
            } else {
                Style::new()
            };
            let block = new_simple_box(label).border_style(style);
            frame.render_widget(Paragraph::new(value).block(block), *row);
        }
        if let Some(hint) = rows.last() {
            let keys = "Tab/Up/Down: change field   Enter: save   Esc: cancel";
            frame.render_widget(Text::from(keys), *hint);
        }
    }
}

#[cfg(test)]
mod test {
    use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

    use super::{AccountForm, FormAction};
    use crate::accounts::Account;

    fn press(form: &mut AccountForm, code: KeyCode) -> FormAction {
        form.handle_key_events(&Event::Key(KeyEvent::new(
            code,
            KeyModifiers::NONE,
        )))
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn edit_form_round_trips_account() {
        let mut account = Account::new("work");
        account.email = "bob@example.com".to_owned();
        account.password = " spaced ".to_owned();
        account.smtp_port = 465;

        let form = AccountForm::edit(&account);
        assert!(!form.is_new());
        assert_eq!(form.to_account().unwrap(), account);
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn typing_fills_focused_field() {
        let mut form = AccountForm::new();
        for ch in "home".chars() {
            press(&mut form, KeyCode::Char(ch));
        }
        press(&mut form, KeyCode::Tab);
        for ch in "h@example.com".chars() {
            press(&mut form, KeyCode::Char(ch));
        }
        assert_eq!(press(&mut form, KeyCode::Enter), FormAction::Save);

        let account = form.to_account().unwrap();
        assert_eq!(account.label, "home");
        assert_eq!(account.email, "h@example.com");
        assert_eq!(account.imap_port, 993);
        assert_eq!(account.smtp_port, 587);
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let mut form = AccountForm::new();
        press(&mut form, KeyCode::Up);
        press(&mut form, KeyCode::Char('x'));
        assert_eq!(
            form.to_account(),
            Err("IMAP and SMTP ports must be integers.")
        );
        assert_eq!(press(&mut form, KeyCode::Esc), FormAction::Cancel);
    }
}
