//! Handles the SMTP connections.
//!
//! SMTP is the protocol responsible for sending emails. A [`Draft`] written
//! in the composer is turned into an RFC 5322 message and submitted with the
//! credentials of the active account.

use core::time::Duration;

use lettre::address::AddressError;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport as _};

use crate::accounts::Account;
use crate::errors::Result;
use crate::security::Security;

/// Time allowed for each SMTP network operation.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Email written by the user, before it is sent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Destination(s) of the email
    ///
    /// If there are multiple destinations, they must be separated with a
    /// comma. Spaces are ignored.
    pub to: String,
    /// Subject of the email
    pub subject: String,
    /// Plain text body of the email
    pub body: String,
}

impl Draft {
    /// Returns the non-empty, trimmed recipients.
    pub fn recipients(&self) -> Vec<&str> {
        self.to
            .split(',')
            .map(str::trim)
            .filter(|recipient| !recipient.is_empty())
            .collect()
    }

    /// Builds the message sent on behalf of `from`.
    pub fn to_message(&self, from: &str) -> Result<Message> {
        let recipients = self.recipients();
        if recipients.is_empty() {
            return Err(Error::NoRecipient.into());
        }
        let sender = parse_mailbox(from)?;
        let mut builder =
            Message::builder().from(sender).subject(self.subject.as_str());
        for recipient in recipients {
            builder = builder.to(parse_mailbox(recipient)?);
        }
        Ok(builder.body(self.body.clone()).map_err(Error::Build)?)
    }
}

/// Parses an address written by the user.
fn parse_mailbox(address: &str) -> Result<Mailbox, Error> {
    address.parse().map_err(|source| Error::InvalidAddress {
        address: address.to_owned(),
        source,
    })
}

/// Sends `draft` with the SMTP server of `account`.
///
/// Port 465 uses implicit TLS; every other port tries `STARTTLS` before
/// authenticating.
pub fn send_draft(account: &Account, draft: &Draft) -> Result {
    let message = draft.to_message(&account.email)?;
    let security = Security::for_smtp_port(account.smtp_port);
    let credentials =
        Credentials::new(account.email.clone(), account.password.clone());
    log::info!(
        "Sending email to {} recipient(s) through {}:{} ({security:?})",
        draft.recipients().len(),
        account.smtp_server,
        account.smtp_port
    );
    deliver(
        &account.smtp_server,
        account.smtp_port,
        security,
        credentials,
        &message,
    )
}

/// Opens an SMTP transport with the given security and submits `message`.
pub fn deliver(
    host: &str,
    port: u16,
    security: Security,
    credentials: Credentials,
    message: &Message,
) -> Result {
    let tls_parameters =
        TlsParameters::new(host.to_owned()).map_err(Error::Tls)?;
    let tls = match security {
        Security::ImplicitTls => Tls::Wrapper(tls_parameters),
        Security::StartTls => Tls::Opportunistic(tls_parameters),
    };
    let transport = SmtpTransport::builder_dangerous(host)
        .port(port)
        .tls(tls)
        .credentials(credentials)
        .timeout(Some(TIMEOUT))
        .build();
    transport.send(message).map_err(Error::Smtp)?;
    log::info!("Email submitted to {host}:{port}");
    Ok(())
}

/// Errors that may occur while sending an email.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The message could not be assembled.
    #[error("could not build the email: {0}")]
    Build(lettre::error::Error),
    /// An address is not a valid mailbox.
    #[error("invalid address '{address}': {source}")]
    InvalidAddress {
        /// Address as written
        address: String,
        /// Underlying failure
        source: AddressError,
    },
    /// The `To` field holds no address.
    #[error("please enter at least one recipient")]
    NoRecipient,
    /// The SMTP exchange failed.
    #[error("SMTP error: {0}")]
    Smtp(lettre::transport::smtp::Error),
    /// The TLS parameters could not be built.
    #[error("TLS setup failed: {0}")]
    Tls(lettre::transport::smtp::Error),
}
