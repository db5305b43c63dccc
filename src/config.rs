//! Handles the runtime settings, by loading them from the environment.
//!
//! An optional `.env` file at the root may override the defaults:
//!
//! ```env
//! MAILCLERK_ACCOUNTS=accounts.txt
//! MAILCLERK_LOG=mailclerk.log
//! RUST_LOG=info
//! ```

use std::env::var;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use env_logger::{Env, Target};

/// Settings the client needs before opening the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Path of the account file
    ///
    /// This is set to `accounts.txt` if none were provided.
    accounts_path: PathBuf,
    /// Path of the log file
    ///
    /// The terminal belongs to the TUI, so logs go to a file instead.
    log_path: PathBuf,
}

impl Settings {
    /// Key id for the account file variable.
    const ACCOUNTS: &'static str = "MAILCLERK_ACCOUNTS";
    /// Default account file.
    const ACCOUNTS_DEFAULT: &'static str = "accounts.txt";
    /// Key id for the log file variable.
    const LOG: &'static str = "MAILCLERK_LOG";
    /// Default log file.
    const LOG_DEFAULT: &'static str = "mailclerk.log";
    /// Log filter used when `RUST_LOG` is not set.
    const LOG_FILTER_DEFAULT: &'static str = "info";

    /// Returns the path of the account file
    pub fn as_accounts_path(&self) -> &Path {
        &self.accounts_path
    }

    /// Returns the path of the log file
    pub fn as_log_path(&self) -> &Path {
        &self.log_path
    }

    /// Loads the settings from the `.env` file and the process environment.
    ///
    /// A missing `.env` file is fine; a malformed one is not.
    pub fn load() -> Result<Self, Error> {
        match dotenv::dotenv() {
            Ok(_) => (),
            Err(dotenv::Error::Io(err))
                if err.kind() == io::ErrorKind::NotFound => (),
            Err(err) => return Err(Error::InvalidFile(err)),
        }
        Ok(Self::from_lookup(|key| var(key).ok()))
    }

    /// Builds the settings from a variable lookup, applying defaults.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key).filter(|value: &String| !value.trim().is_empty())
        };
        let accounts_path = non_empty(Self::ACCOUNTS)
            .map_or_else(|| Self::ACCOUNTS_DEFAULT.into(), PathBuf::from);
        let log_path = non_empty(Self::LOG)
            .map_or_else(|| Self::LOG_DEFAULT.into(), PathBuf::from);
        Self { accounts_path, log_path }
    }

    /// Installs `env_logger`, appending to the configured log file.
    pub fn init_logging(&self) -> Result<(), Error> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|source| Error::LogFile {
                path: self.log_path.clone(),
                source,
            })?;
        let env = Env::default().default_filter_or(Self::LOG_FILTER_DEFAULT);
        env_logger::Builder::from_env(env)
            .target(Target::Pipe(Box::new(file)))
            .try_init()
            .map_err(Error::Logger)
    }
}

/// Errors that may occur while loading the settings.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `dotenv` failed to read the `.env` file.
    #[error("invalid .env file: {0}")]
    InvalidFile(dotenv::Error),
    /// A logger was already installed.
    #[error("failed to install the logger: {0}")]
    Logger(log::SetLoggerError),
    /// The log file could not be opened.
    #[error("failed to open log file {}: {source}", .path.display())]
    LogFile {
        /// Configured log file
        path: PathBuf,
        /// Underlying failure
        source: io::Error,
    },
}
