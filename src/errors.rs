//! Handles errors, with a custom [`Result`] and [`Error`] type

use core::result;

use crate::{accounts, config, fetch, send, tui};

/// Errors that may occur while running the app.
///
/// The [`Display`](core::fmt::Display) output is what the user sees in the
/// error popup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failure occurred while loading, saving or editing accounts.
    #[error(transparent)]
    Accounts(#[from] accounts::Error),
    /// Failure occurred while loading the settings.
    #[error(transparent)]
    Config(#[from] config::Error),
    /// Failure occurred while interaction with the IMAP protocol.
    #[error(transparent)]
    ImapConnection(#[from] fetch::connection::Error),
    /// Failure occurred while parsing the email body.
    #[error(transparent)]
    Parsing(#[from] fetch::parser::Error),
    /// Failure occurred while sending an email.
    #[error(transparent)]
    Send(#[from] send::Error),
    /// Failure occurred after TUI
    #[error(transparent)]
    Tui(#[from] tui::Error),
}

/// Overloaded result for the [`mailclerk`](crate) crate
pub type Result<T = (), E = Error> = result::Result<T, E>;
