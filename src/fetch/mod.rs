//! Fetches the most recent emails of an account's inbox.
//!
//! [`connection`] talks IMAP, [`parser`] turns raw messages into
//! [`parser::MessageSummary`]s.

pub mod connection;
pub mod parser;
