//! Terminal email client, with multiple accounts.
//!
//! Reads the 20 most recent emails of the INBOX of the active account over
//! IMAP, and sends emails over SMTP.

mod accounts;
mod app;
mod config;
mod errors;
mod fetch;
mod security;
mod send;
mod tui;
mod worker;

use std::process::ExitCode;
use std::sync::Arc;

use crate::app::App;
use crate::config::Settings;
use crate::errors::Result;
use crate::tui::Tui;
use crate::worker::{Network, Worker};

/// Loads the settings and the accounts, then hands over to the TUI.
fn run() -> Result {
    let settings = Settings::load()?;
    settings.init_logging()?;
    log::info!(
        "Starting with account file {}",
        settings.as_accounts_path().display()
    );
    let app = App::load(settings.as_accounts_path())?;
    let mut tui = Tui::new(app, Worker::new(Arc::new(Network)));
    tui.run()?;
    log::info!("Exiting");
    Ok(())
}

#[expect(
    clippy::print_stderr,
    reason = "the TUI is closed, stderr is the only output left"
)]
fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("mailclerk: {err}");
            ExitCode::FAILURE
        }
    }
}
