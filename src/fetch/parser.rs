//! Parses a raw RFC 822 message to build a [`MessageSummary`]

use mail_parser::{Address, MessageParser, MimeHeaders as _, PartType};

/// Subject shown for messages without one.
const NO_SUBJECT: &str = "(no subject)";

/// Represents a parsed email, reduced to what the reader displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSummary {
    /// Sequence number assigned by the server
    pub id: u32,
    /// Decoded subject
    pub subject: String,
    /// Decoded senders, as `Name <address>` separated by commas
    pub from: String,
    /// Decoded recipients, same format as `from`
    pub to: String,
    /// Date in RFC 3339 format, if the `Date` header could be parsed
    pub date: Option<String>,
    /// Plain text body
    ///
    /// This is the first `text/plain` part of the message. When there is none,
    /// the HTML body converted to text is used, or an empty string.
    pub body: String,
}

impl TryFrom<(u32, &[u8])> for MessageSummary {
    type Error = Error;

    fn try_from((id, raw): (u32, &[u8])) -> Result<Self, Error> {
        let message = MessageParser::default()
            .parse(raw)
            .ok_or(Error::ParseFailure(id))?;

        let subject = message
            .subject()
            .map(str::trim)
            .filter(|subject| !subject.is_empty())
            .unwrap_or(NO_SUBJECT)
            .to_owned();
        let from = message.from().map(format_address).unwrap_or_default();
        let to = message.to().map(format_address).unwrap_or_default();
        let date = message.date().map(mail_parser::DateTime::to_rfc3339);

        let first_plain_part =
            message.parts.iter().find_map(|part| match &part.body {
                PartType::Text(text)
                    if part.content_type().is_none_or(is_text_plain) =>
                    Some(text.to_string()),
                PartType::Text(_)
                | PartType::Html(_)
                | PartType::Binary(_)
                | PartType::InlineBinary(_)
                | PartType::Message(_)
                | PartType::Multipart(_) => None,
            });
        let body = first_plain_part
            .or_else(|| message.body_text(0).map(|text| text.into_owned()))
            .unwrap_or_default();

        Ok(Self { id, subject, from, to, date, body })
    }
}

/// Checks that a content type is `text/plain`, case insensitively.
fn is_text_plain(content_type: &mail_parser::ContentType<'_>) -> bool {
    content_type.ctype().eq_ignore_ascii_case("text")
        && content_type
            .subtype()
            .is_none_or(|subtype| subtype.eq_ignore_ascii_case("plain"))
}

/// Renders an address header as `Name <address>`, separated by commas.
///
/// Groups are flattened into their members.
fn format_address(address: &Address<'_>) -> String {
    let addrs: Vec<&mail_parser::Addr<'_>> = match address {
        Address::List(list) => list.iter().collect(),
        Address::Group(groups) => groups
            .iter()
            .flat_map(|group| group.addresses.iter())
            .collect(),
    };
    addrs
        .into_iter()
        .map(|addr| {
            match (addr.name.as_deref(), addr.address.as_deref()) {
                (Some(name), Some(mail)) => format!("{name} <{mail}>"),
                (Some(only), None) | (None, Some(only)) => only.to_owned(),
                (None, None) => String::new(),
            }
        })
        .filter(|rendered| !rendered.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that may occur while parsing the email.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to parse the email.
    #[error("message {0} could not be parsed")]
    ParseFailure(u32),
}

#[cfg(test)]
mod test {
    use super::MessageSummary;

    const MULTIPART: &[u8] = b"\
From: =?UTF-8?Q?Jos=C3=A9_Mar=C3=ADa?= <jose@example.com>\r
To: Bob <bob@example.com>, carol@example.com\r
Date: Sat, 20 Nov 2021 14:22:01 -0800\r
Subject: =?utf-8?B?UmFwcG9ydCBtZW5zdWVs?= =?utf-8?Q?_d=C3=A9cembre?=\r
MIME-Version: 1.0\r
Content-Type: multipart/alternative; boundary=\"sep\"\r
\r
--sep\r
Content-Type: text/plain; charset=\"utf-8\"\r
Content-Transfer-Encoding: quoted-printable\r
\r
Bonjour =C3=A0 tous,\r
voici le rapport.\r
--sep\r
Content-Type: text/html; charset=\"utf-8\"\r
\r
<html><body><p>HTML version</p></body></html>\r
--sep--\r
";

    const HTML_ONLY: &[u8] = b"From: news@example.com\r
Subject: Weekly\r
Content-Type: text/html; charset=\"us-ascii\"\r
\r
<html><body><p>Hello reader</p></body></html>\r
";

    #[test]
    #[expect(clippy::unwrap_used, clippy::non_ascii_literal, reason = "test")]
    fn multipart_uses_plain_part_and_decodes_headers() {
        let summary = MessageSummary::try_from((7, MULTIPART)).unwrap();

        assert_eq!(summary.id, 7);
        assert_eq!(summary.subject, "Rapport mensuel décembre");
        assert_eq!(summary.from, "José María <jose@example.com>");
        assert_eq!(summary.to, "Bob <bob@example.com>, carol@example.com");
        assert_eq!(summary.date.as_deref(), Some("2021-11-20T14:22:01-08:00"));
        assert_eq!(
            summary.body.lines().collect::<Vec<_>>(),
            ["Bonjour à tous,", "voici le rapport."]
        );
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn html_only_falls_back_to_converted_text() {
        let summary = MessageSummary::try_from((1, HTML_ONLY)).unwrap();
        assert_eq!(summary.subject, "Weekly");
        assert_eq!(summary.from, "news@example.com");
        assert!(summary.to.is_empty());
        assert!(summary.body.contains("Hello reader"));
        assert!(!summary.body.contains("<p>"));
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn missing_subject_gets_placeholder() {
        let raw = b"From: a@example.com\r\n\r\nplain body\r\n".as_slice();
        let summary = MessageSummary::try_from((3, raw)).unwrap();
        assert_eq!(summary.subject, "(no subject)");
        assert_eq!(summary.body.trim_end(), "plain body");
    }
}
