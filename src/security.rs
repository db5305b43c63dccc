//! Chooses how a connection to a mail server is encrypted.

/// Encryption of a mail server connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Security {
    /// TLS from the first byte, on a dedicated port.
    ImplicitTls,
    /// Plaintext connection upgraded in-band with `STARTTLS`.
    StartTls,
}

impl Security {
    /// IMAP port with implicit TLS.
    pub const IMAPS_PORT: u16 = 993;
    /// SMTP submission port with implicit TLS.
    pub const SUBMISSIONS_PORT: u16 = 465;

    /// Security used to reach an IMAP server on `port`.
    pub const fn for_imap_port(port: u16) -> Self {
        if port == Self::IMAPS_PORT {
            Self::ImplicitTls
        } else {
            Self::StartTls
        }
    }

    /// Security used to reach an SMTP server on `port`.
    pub const fn for_smtp_port(port: u16) -> Self {
        if port == Self::SUBMISSIONS_PORT {
            Self::ImplicitTls
        } else {
            Self::StartTls
        }
    }
}

#[cfg(test)]
mod test {
    use super::Security;

    #[test]
    fn well_known_ports_use_implicit_tls() {
        assert_eq!(Security::for_imap_port(993), Security::ImplicitTls);
        assert_eq!(Security::for_imap_port(143), Security::StartTls);
        assert_eq!(Security::for_smtp_port(465), Security::ImplicitTls);
        assert_eq!(Security::for_smtp_port(587), Security::StartTls);
        assert_eq!(Security::for_smtp_port(25), Security::StartTls);
    }
}
