//! Runs and manages the TUI and its interactions.

mod account_form;
mod account_menu;
mod components;
mod manual;
mod reader;
mod states;
mod writer;

use core::time::Duration;
use std::io;

use ratatui::crossterm::event::{Event, KeyCode, KeyEventKind, poll, read};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Style, Stylize as _};
use ratatui::text::{Line, Span};
use ratatui::{DefaultTerminal, Frame};

use self::account_form::{AccountForm, FormAction};
use self::account_menu::{AccountMenu, MenuAction};
use self::components::Popup;
use self::manual::manual_page;
use self::reader::draw_emails;
use self::states::TuiMode;
use self::writer::{Writer, WriterAction};
use crate::accounts::Account;
use crate::app::App;
use crate::errors::Result;
use crate::send::Draft;
use crate::worker::{Job, Outcome, Worker};

/// Time waited for a key press before checking the worker again.
const TICK: Duration = Duration::from_millis(100);

/// Hint shown when an action needs an active account.
const NO_ACCOUNT: &str = "No active account. Add one with 'a'.";

/// Follows the state of the TUI application.
pub struct Tui {
    /// Accounts and fetched emails
    app: App,
    /// Current mode of the TUI, describing what is the current base of action
    /// of the client.
    mode: TuiMode,
    /// Message covering the page until a key is pressed
    popup: Option<Popup>,
    /// Indicates whether the app is running
    running: bool,
    /// Description of the operation in flight, shown in the status bar
    status: Option<&'static str>,
    /// Runs the network operations
    worker: Worker,
}

impl Tui {
    /// Applies the outcome of the finished operation, if any.
    fn collect_outcome(&mut self) {
        let Some(outcome) = self.worker.try_recv() else {
            return;
        };
        self.status = None;
        match outcome {
            Outcome::Refreshed { label, result: Ok(messages) } => {
                let is_empty = messages.is_empty();
                if self.app.set_messages(&label, messages) && is_empty {
                    self.popup =
                        Some(Popup::info("Refresh", "INBOX is empty."));
                }
            }
            Outcome::Refreshed { label, result: Err(err) } => {
                log::error!("Refresh of '{label}' failed: {err}");
                self.popup = Some(Popup::error(
                    "IMAP error",
                    format!("Error while fetching emails:\n{err}"),
                ));
            }
            Outcome::Sent(Ok(())) => {
                if matches!(self.mode, TuiMode::Writing(_)) {
                    self.mode = TuiMode::Reading;
                }
                self.popup =
                    Some(Popup::info("Compose", "Email sent successfully."));
            }
            Outcome::Sent(Err(err)) => {
                log::error!("Sending failed: {err}");
                self.popup = Some(Popup::error("SMTP error", err.to_string()));
            }
            Outcome::Lost =>
                self.popup = Some(Popup::error(
                    "Error",
                    "The operation stopped unexpectedly, please try again.",
                )),
        }
    }

    /// Deletes an account from the account menu.
    fn delete_account(&mut self, label: &str) {
        let was_active = self.app.active_label() == Some(label);
        match self.app.delete_account(label) {
            Ok(()) => {
                self.open_account_menu();
                if was_active {
                    self.popup = Some(Popup::info(
                        "Delete account",
                        "Active account deleted. \
                         Add or switch to another account.",
                    ));
                }
            }
            Err(err) => self.report("Delete account", &err),
        }
    }

    /// Main drawer for the TUI
    ///
    /// This function is called every loop to re-render the TUI.
    pub fn draw_tui(&self, frame: &mut Frame<'_>) {
        let [status_area, main_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)])
                .areas(frame.area());
        frame.render_widget(self.status_line(), status_area);
        match &self.mode {
            TuiMode::AccountForm(form) => form.form_page(frame, main_area),
            TuiMode::AccountMenu(menu) =>
                menu.menu_page(frame, main_area, self.app.active_label()),
            TuiMode::Help => manual_page(frame, main_area),
            TuiMode::Reading => draw_emails(frame, main_area, &self.app),
            TuiMode::Writing(writer) => writer.writer_page(frame, main_area),
        }
        if let Some(popup) = &self.popup {
            popup.render(frame);
        }
    }

    /// Handles one terminal event
    pub fn handle_event(&mut self, event: &Event) {
        if matches!(event, Event::Key(key) if key.kind != KeyEventKind::Press) {
            return;
        }
        if self.popup.is_some() {
            if matches!(event, Event::Key(_)) {
                self.popup = None;
            }
            return;
        }
        match &mut self.mode {
            TuiMode::Writing(writer) => match writer.handle_key_events(event) {
                WriterAction::Send => {
                    let draft = writer.draft();
                    self.send(draft);
                }
                WriterAction::Cancel => self.mode = TuiMode::Reading,
                WriterAction::Handled | WriterAction::Ignored => (),
            },
            TuiMode::AccountForm(form) => match form.handle_key_events(event) {
                FormAction::Save => {
                    let is_new = form.is_new();
                    match form.to_account() {
                        Ok(account) => self.save_account(is_new, account),
                        Err(msg) =>
                            self.popup = Some(Popup::error("Error", msg)),
                    }
                }
                FormAction::Cancel => self.mode = TuiMode::Reading,
                FormAction::Handled => (),
            },
            TuiMode::AccountMenu(menu) => match menu.handle_key_events(event) {
                MenuAction::Switch(label) => self.switch_account(&label),
                MenuAction::Delete(label) => self.delete_account(&label),
                MenuAction::Cancel => self.mode = TuiMode::Reading,
                MenuAction::Handled => (),
            },
            TuiMode::Help | TuiMode::Reading => self.handle_reader_keys(event),
        }
    }

    /// Handles the keys of the inbox and manual pages.
    fn handle_reader_keys(&mut self, event: &Event) {
        let Event::Key(key) = event else {
            return;
        };
        let reading = self.mode.is_reading();
        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Esc => self.mode = TuiMode::Reading,
            KeyCode::Char('j') | KeyCode::Down if reading =>
                self.app.select_next(),
            KeyCode::Char('k') | KeyCode::Up if reading =>
                self.app.select_previous(),
            KeyCode::Char('l') | KeyCode::Enter if reading =>
                self.app.open_current(),
            KeyCode::Char('h') if reading => self.app.close_message(),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('w') => self.open_writer(),
            KeyCode::Char('a') =>
                self.mode = TuiMode::AccountForm(AccountForm::new()),
            KeyCode::Char('e') => self.open_account_editor(),
            KeyCode::Char('s') => self.open_account_menu(),
            KeyCode::Char('m' | '?') => self.mode = TuiMode::Help,
            _ => (),
        }
    }

    /// Creates a new [`Tui`]
    pub fn new(app: App, worker: Worker) -> Self {
        Self {
            app,
            mode: TuiMode::default(),
            popup: None,
            running: false,
            status: None,
            worker,
        }
    }

    /// Opens the form editing the active account.
    fn open_account_editor(&mut self) {
        match self.app.active_account() {
            Some(account) =>
                self.mode = TuiMode::AccountForm(AccountForm::edit(account)),
            None =>
                self.popup = Some(Popup::info(
                    "Edit account",
                    "No active account to edit.",
                )),
        }
    }

    /// Opens the account menu on the current labels.
    fn open_account_menu(&mut self) {
        let labels = self
            .app
            .as_store()
            .labels()
            .into_iter()
            .map(str::to_owned)
            .collect();
        self.mode = TuiMode::AccountMenu(AccountMenu::new(
            labels,
            self.app.active_label(),
        ));
    }

    /// Opens the writer, sending from the active account.
    fn open_writer(&mut self) {
        match self.app.active_account() {
            Some(account) =>
                self.mode = TuiMode::Writing(Writer::new(&account.email)),
            None => self.popup = Some(Popup::info("Compose", NO_ACCOUNT)),
        }
    }

    /// Starts fetching the inbox of the active account.
    fn refresh(&mut self) {
        let Some(account) = self.app.active_account().cloned() else {
            self.popup = Some(Popup::info("Refresh", NO_ACCOUNT));
            return;
        };
        self.submit(Job::Refresh(account), "Loading emails from server...");
    }

    /// Logs a failed action and shows it to the user.
    fn report(&mut self, title: &str, err: &dyn core::fmt::Display) {
        log::error!("{title}: {err}");
        self.popup = Some(Popup::error(title, err.to_string()));
    }

    /// Runs the [`Tui`]
    ///
    /// Handles key events and frame renders
    pub fn run(&mut self) -> Result {
        let mut terminal = ratatui::init();
        self.running = true;
        let result = self.run_loop(&mut terminal);
        ratatui::restore();
        result
    }

    /// Renders and reacts to events until the user quits.
    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result {
        while self.running {
            terminal
                .draw(|frame| self.draw_tui(frame))
                .map_err(Error::Drawing)?;
            if poll(TICK).map_err(Error::IoKeyboard)? {
                let event = read().map_err(Error::IoKeyboard)?;
                self.handle_event(&event);
            }
            self.collect_outcome();
        }
        Ok(())
    }

    /// Adds or edits an account from the form.
    fn save_account(&mut self, is_new: bool, account: Account) {
        let had_active = self.app.active_label().is_some();
        let result = if is_new {
            self.app.add_account(account)
        } else {
            self.app.edit_active_account(account)
        };
        match result {
            Ok(()) => {
                self.mode = TuiMode::Reading;
                if is_new && !had_active {
                    self.popup = Some(Popup::info(
                        "Add account",
                        "New account added. Press 'r' to load emails.",
                    ));
                }
            }
            Err(err) => self.report("Error", &err),
        }
    }

    /// Starts sending `draft` with the active account.
    fn send(&mut self, draft: Draft) {
        let Some(account) = self.app.active_account().cloned() else {
            self.popup = Some(Popup::info("Compose", NO_ACCOUNT));
            return;
        };
        self.submit(Job::Send(account, draft), "Sending email...");
    }

    /// Returns the line at the top of the window.
    fn status_line(&self) -> Line<'_> {
        let account = self.app.active_label().unwrap_or("(no account)");
        let mut spans = vec![
            Span::styled(" Account: ", Style::new().bold()),
            Span::from(account),
        ];
        if let Some(status) = self.status {
            spans.push(Span::from("  |  "));
            spans.push(Span::from(status).italic());
        }
        spans.push(Span::from("  |  m: manual  q: quit"));
        Line::from(spans)
    }

    /// Hands a job to the worker, or reports why it cannot start.
    fn submit(&mut self, job: Job, status: &'static str) {
        match self.worker.submit(job) {
            Ok(()) => self.status = Some(status),
            Err(err) =>
                self.popup = Some(Popup::info("Please wait", err.to_string())),
        }
    }

    /// Switches account from the account menu.
    fn switch_account(&mut self, label: &str) {
        match self.app.switch_account(label) {
            Ok(()) => self.mode = TuiMode::Reading,
            Err(err) => self.report("Switch account", &err),
        }
    }
}

/// Errors than occur because of the TUI rendering
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error occurred while drawing a frame.
    #[error("failed to draw the window: {0}")]
    Drawing(io::Error),
    /// Error occurred while reading the keyboard presses.
    #[error("failed to read the keyboard: {0}")]
    IoKeyboard(io::Error),
}
