//! Handles the accounts, by loading them from and saving them to the account
//! file.
//!
//! The account file holds one section per account:
//!
//! ```text
//! [account work]
//! email=bob@example.com
//! password=P@ssw0rd
//! imap_server=imap.example.com
//! imap_port=993
//! smtp_server=smtp.example.com
//! smtp_port=587
//! ```

pub mod store;

use core::num::ParseIntError;
use std::io;
use std::path::PathBuf;

/// Connection settings of one mail account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Label under which the account is stored and listed
    ///
    /// Labels are unique within a [`store::AccountStore`].
    pub label: String,
    /// Email address, also used as IMAP and SMTP username
    pub email: String,
    /// Password, stored in plaintext
    pub password: String,
    /// IMAP server host
    pub imap_server: String,
    /// IMAP port
    ///
    /// This is set to 993 if none were provided.
    pub imap_port: u16,
    /// SMTP server host
    pub smtp_server: String,
    /// SMTP port
    ///
    /// This is set to 587 if none were provided.
    pub smtp_port: u16,
}

impl Account {
    /// Default IMAP port, with implicit TLS.
    pub const IMAP_PORT_DEFAULT: u16 = 993;
    /// Default SMTP port, with STARTTLS.
    pub const SMTP_PORT_DEFAULT: u16 = 587;

    /// Creates an account with the given label and the default ports.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            email: String::new(),
            password: String::new(),
            imap_server: String::new(),
            imap_port: Self::IMAP_PORT_DEFAULT,
            smtp_server: String::new(),
            smtp_port: Self::SMTP_PORT_DEFAULT,
        }
    }

    /// Checks the fields the client cannot work without.
    pub fn validate(&self) -> Result<(), Error> {
        if self.label.trim().is_empty() {
            return Err(Error::EmptyLabel);
        }
        if self.email.trim().is_empty() {
            return Err(Error::EmptyEmail);
        }
        Ok(())
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Errors that may occur while managing accounts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Another account already uses the wanted label.
    #[error("an account named '{0}' already exists")]
    DuplicateLabel(String),
    /// The account label is empty.
    #[error("account name cannot be empty")]
    EmptyLabel,
    /// The account email is empty.
    #[error("email cannot be empty")]
    EmptyEmail,
    /// A section header has no label.
    #[error("line {0}: section header has no account name")]
    EmptySectionLabel(usize),
    /// The account file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// Account file
        path: PathBuf,
        /// Underlying failure
        source: io::Error,
    },
    /// A port is not a valid integer.
    #[error("line {line}: {key} must be an integer: {source}")]
    InvalidPort {
        /// Line of the invalid value, starting at 1
        line: usize,
        /// Either `imap_port` or `smtp_port`
        key: &'static str,
        /// Underlying failure
        source: ParseIntError,
    },
    /// A line is neither a section header nor a `key=value` pair.
    #[error("line {0}: expected '[account <name>]' or 'key=value'")]
    MalformedLine(usize),
    /// The wanted account does not exist.
    #[error("account '{0}' not found")]
    NotFound(String),
    /// No account is active.
    #[error("no active account, add one first")]
    NoActiveAccount,
    /// A `key=value` pair appears before any section header.
    #[error("line {0}: value outside of an account section")]
    OrphanValue(usize),
    /// The account file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// Account file
        path: PathBuf,
        /// Underlying failure
        source: io::Error,
    },
}
