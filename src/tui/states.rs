//! File to handle the states
//!
//! A user changes states with the keybindings listed in the manual page.

use super::account_form::AccountForm;
use super::account_menu::AccountMenu;
use super::writer::Writer;

/// Current mode of the TUI, specifying what is the user doing
#[derive(Default)]
pub enum TuiMode {
    /// Adding or editing an account
    AccountForm(AccountForm),
    /// Choosing an account to switch to or delete
    AccountMenu(AccountMenu),
    /// Display the help window, with different keybindings
    Help,
    /// Displaying emails of the active account
    #[default]
    Reading,
    /// Writing an email
    Writing(Writer),
}

impl TuiMode {
    /// Returns `true` when keys go to the email list.
    pub const fn is_reading(&self) -> bool {
        matches!(self, Self::Reading)
    }
}
