//! Account menu, to switch to another account or delete one.

use ratatui::Frame;
use ratatui::crossterm::event::{Event, KeyCode};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Text;
use ratatui::widgets::{List, ListItem};

use super::components::new_simple_box;

/// What the menu asks the TUI to do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum MenuAction {
    /// Close the menu
    Cancel,
    /// Delete the account with this label
    Delete(String),
    /// Key was consumed by the menu
    Handled,
    /// Make the account with this label active
    Switch(String),
}

/// Sorted account labels with a cursor.
pub struct AccountMenu {
    /// Index of the hovered label
    cursor: usize,
    /// Account labels, sorted
    labels: Vec<String>,
}

impl AccountMenu {
    /// Returns the hovered label, if there are any accounts.
    fn current(&self) -> Option<String> {
        self.labels.get(self.cursor).cloned()
    }

    /// Handler to manage keypresses.
    pub fn handle_key_events(&mut self, event: &Event) -> MenuAction {
        let Event::Key(key) = event else {
            return MenuAction::Handled;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => MenuAction::Cancel,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.cursor.saturating_add(1) < self.labels.len() {
                    self.cursor = self.cursor.saturating_add(1);
                }
                MenuAction::Handled
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                MenuAction::Handled
            }
            KeyCode::Enter =>
                self.current().map_or(MenuAction::Handled, MenuAction::Switch),
            KeyCode::Char('d') =>
                self.current().map_or(MenuAction::Handled, MenuAction::Delete),
            _ => MenuAction::Handled,
        }
    }

    /// Opens the menu on `labels`, hovering `active` if present.
    pub fn new(labels: Vec<String>, active: Option<&str>) -> Self {
        let cursor = active
            .and_then(|label| labels.iter().position(|other| other == label))
            .unwrap_or(0);
        Self { cursor, labels }
    }

    /// Draws the list of accounts.
    pub fn menu_page(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        active: Option<&str>,
    ) {
        let [list_area, hint_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)])
                .areas(area);
        let items: Vec<ListItem<'_>> = if self.labels.is_empty() {
            vec![ListItem::from("(no accounts)")]
        } else {
            self.labels
                .iter()
                .enumerate()
                .map(|(index, label)| {
                    let is_active = Some(label.as_str()) == active;
                    let marker = if is_active { "* " } else { "  " };
                    let item = ListItem::from(format!("{marker}{label}"));
                    if index == self.cursor {
                        item.style(Style::new().bg(Color::DarkGray))
                    } else {
                        item
                    }
                })
                .collect()
        };
        let list = List::new(items).block(new_simple_box("Accounts"));
        frame.render_widget(list, list_area);
        frame.render_widget(
            Text::from("Enter: switch   d: delete   Esc: back"),
            hint_area,
        );
    }
}
