//! Handles the IMAP connections.
//!
//! IMAP is the protocol responsible for fetching emails. This will allow
//! [`mailclerk`](crate) to read the emails.

use core::marker::PhantomData;
use std::io::{Read, Write};
use std::net::TcpStream;

use imap::types::Fetch;
use native_tls::{TlsConnector, TlsStream};

use super::parser::MessageSummary;
use crate::accounts::Account;
use crate::errors::Result;
use crate::security::Security;

/// Type of query made on the IMAP server.
const QUERY: &str = "RFC822";

/// Name of the only mailbox the client reads.
pub const INBOX: &str = "INBOX";

/// Number of most recent emails fetched on every refresh.
pub const WINDOW: usize = 20;

/// Errors that may occur while interaction in `IMAP`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to authenticate on the IMAP server.
    #[error("IMAP login failed: {0}")]
    Authentication(imap::Error),
    /// Failed to connect to the IMAP server.
    #[error("IMAP connection to {host}:{port} failed: {source}")]
    ImapConnection {
        /// Server host
        host: String,
        /// Server port
        port: u16,
        /// Underlying failure
        source: imap::Error,
    },
    /// Failed to fetch from the IMAP server.
    #[error("IMAP fetch failed: {0}")]
    ImapFetch(imap::Error),
    /// Failed to search the selected mailbox.
    #[error("IMAP search failed: {0}")]
    ImapSearch(imap::Error),
    /// Failed to read the wanted mailbox name.
    #[error("could not open mailbox: {0}")]
    InvalidMailboxName(imap::Error),
    /// Given email has no body
    #[error("message {0} was returned without a body")]
    NoBody(u32),
    /// Failed to establish `TLS` connection.
    #[error("TLS setup failed: {0}")]
    TlsConnection(native_tls::Error),
}

/// Represents the Imap session to communicate with the server.
///
/// The stream defaults to the TLS stream used against real servers.
pub struct ImapSession<T, S: Read + Write = TlsStream<TcpStream>> {
    /// Marker to keep the status of the [`ImapSession`]
    ///
    /// This is a zero-sized element that informs on whether a mailbox was
    /// specified or not
    marker: PhantomData<T>,
    /// Active session
    session: imap::Session<S>,
}

impl ImapSession<Unselected> {
    /// Connects to the IMAP server of `account` and logs in.
    ///
    /// Port 993 uses implicit TLS; every other port must accept `STARTTLS`.
    pub fn connect(account: &Account) -> Result<Self> {
        let host = account.imap_server.as_str();
        let port = account.imap_port;
        let security = Security::for_imap_port(port);
        let tls_connector =
            TlsConnector::new().map_err(Error::TlsConnection)?;

        log::info!("Connecting to IMAP server {host}:{port} ({security:?})");
        let client = match security {
            Security::ImplicitTls =>
                imap::connect((host, port), host, &tls_connector),
            Security::StartTls =>
                imap::connect_starttls((host, port), host, &tls_connector),
        }
        .map_err(|source| Error::ImapConnection {
            host: host.to_owned(),
            port,
            source,
        })?;

        Self::login(client, account)
    }
}

impl<S: Read + Write> ImapSession<Unselected, S> {
    /// Logs in on an already established client.
    pub fn login(client: imap::Client<S>, account: &Account) -> Result<Self> {
        let session = client
            .login(&account.email, &account.password)
            .map_err(|(err, _)| Error::Authentication(err))?;
        log::debug!("Logged in as {}", account.email);
        Ok(Self { session, marker: PhantomData })
    }

    /// Selects a mailbox to fetch
    pub fn select_mailbox(
        mut self,
        mailbox_name: &str,
    ) -> Result<ImapSession<MailboxSelected, S>> {
        let mailbox = self
            .session
            .select(mailbox_name)
            .map_err(Error::InvalidMailboxName)?;
        log::debug!(
            "Selected {mailbox_name} with {} message(s)",
            mailbox.exists
        );
        Ok(ImapSession { session: self.session, marker: PhantomData })
    }
}

impl<S: Read + Write> ImapSession<MailboxSelected, S> {
    /// Fetches and parses the emails with the given sequence numbers.
    ///
    /// The summaries are returned newest first.
    pub fn get_summaries(
        &mut self,
        ids: &[u32],
    ) -> Result<Vec<MessageSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sequence_set =
            ids.iter().map(u32::to_string).collect::<Vec<_>>().join(",");
        let fetches = self
            .session
            .fetch(sequence_set, QUERY)
            .map_err(Error::ImapFetch)?;
        let mut summaries =
            fetches.iter().map(get_summary).collect::<Result<Vec<_>>>()?;
        summaries.sort_unstable_by(|lhs, rhs| rhs.id.cmp(&lhs.id));
        Ok(summaries)
    }

    /// Returns the sequence numbers of the `count` most recent emails, newest
    /// first.
    pub fn get_recent_ids(&mut self, count: usize) -> Result<Vec<u32>> {
        let mut ids = self
            .session
            .search("ALL")
            .map_err(Error::ImapSearch)?
            .into_iter()
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids.reverse();
        ids.truncate(count);
        Ok(ids)
    }

    /// Ends the session.
    ///
    /// The mail is already fetched at this point, so a failure is only logged.
    pub fn logout(mut self) {
        if let Err(err) = self.session.logout() {
            log::warn!(
                "Failed to log out from session. May still be active: {err}"
            );
        }
    }
}

/// State of the [`ImapSession`] after a mailbox was selected.
pub struct MailboxSelected;

/// State of the [`ImapSession`] before a mailbox was selected.
pub struct Unselected;

/// Fetches the [`WINDOW`] most recent emails of the inbox of `account`.
pub fn fetch_inbox(account: &Account) -> Result<Vec<MessageSummary>> {
    let session = ImapSession::connect(account)?;
    refresh_inbox(session)
}

/// Selects the inbox of a logged-in session and fetches its most recent
/// emails, then logs out.
///
/// Any failure aborts the whole refresh: nothing partial is returned.
pub fn refresh_inbox<S: Read + Write>(
    session: ImapSession<Unselected, S>,
) -> Result<Vec<MessageSummary>> {
    let mut inbox = session.select_mailbox(INBOX)?;
    let ids = inbox.get_recent_ids(WINDOW)?;
    let summaries = inbox.get_summaries(&ids)?;
    log::info!("Fetched {} message(s) from {INBOX}", summaries.len());
    inbox.logout();
    Ok(summaries)
}

/// Parses the body of a fetched email
///
/// The body of an email also contains all the headers.
fn get_summary(mail: &Fetch) -> Result<MessageSummary> {
    let body = mail.body().ok_or(Error::NoBody(mail.message))?;
    Ok(MessageSummary::try_from((mail.message, body))?)
}
