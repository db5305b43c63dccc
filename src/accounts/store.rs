//! File-backed, ordered collection of [`Account`]s.

use core::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use super::{Account, Error};

/// Prefix of a section header, closed by `]`.
const SECTION_PREFIX: &str = "[account ";

/// Accounts in file order, unique by label.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AccountStore {
    /// Accounts, in the order they were read or added
    accounts: Vec<Account>,
}

impl AccountStore {
    /// Returns the accounts in store order.
    #[cfg(test)]
    pub fn as_accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Returns the account with the given label.
    pub fn get(&self, label: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.label == label)
    }

    /// Inserts an account.
    ///
    /// An account with the same label is overwritten in place, otherwise the
    /// account is appended.
    pub fn insert(&mut self, account: Account) {
        match self.position(&account.label) {
            Some(index) =>
                if let Some(slot) = self.accounts.get_mut(index) {
                    *slot = account;
                },
            None => self.accounts.push(account),
        }
    }

    /// Returns `true` if the store has no account.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Returns the labels, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels = self
            .accounts
            .iter()
            .map(|account| account.label.as_str())
            .collect::<Vec<_>>();
        labels.sort_unstable();
        labels
    }

    /// Returns the number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Loads the accounts from the account file.
    ///
    /// A missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self, Error> {
        match fs::read_to_string(path) {
            Ok(content) => {
                let store = Self::parse(&content)?;
                if store.is_empty() {
                    log::warn!(
                        "Account file {} holds no account",
                        path.display()
                    );
                } else {
                    log::info!(
                        "Loaded {} account(s) from {}",
                        store.len(),
                        path.display()
                    );
                }
                Ok(store)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!(
                    "No account file at {}, starting empty",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(source) => Err(Error::Read { path: path.to_owned(), source }),
        }
    }

    /// Parses the content of an account file.
    ///
    /// Keys and values are trimmed, except the password value which is kept
    /// as written after the `=`.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let mut store = Self::default();
        let mut current: Option<Account> = None;

        for (index, raw_line) in content.lines().enumerate() {
            let line_nb = index.saturating_add(1);
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(label) = line
                .strip_prefix(SECTION_PREFIX)
                .and_then(|rest| rest.strip_suffix(']'))
            {
                let label = label.trim();
                if label.is_empty() {
                    return Err(Error::EmptySectionLabel(line_nb));
                }
                if let Some(done) = current.replace(Account::new(label)) {
                    store.insert(done);
                }
                continue;
            }

            let (key, value) =
                raw_line.split_once('=').ok_or(Error::MalformedLine(line_nb))?;
            let account =
                current.as_mut().ok_or(Error::OrphanValue(line_nb))?;
            set_field(account, key.trim(), value, line_nb)?;
        }

        if let Some(done) = current {
            store.insert(done);
        }
        Ok(store)
    }

    /// Returns the index of the account with the given label.
    fn position(&self, label: &str) -> Option<usize> {
        self.accounts.iter().position(|account| account.label == label)
    }

    /// Removes the account with the given label and returns it.
    pub fn remove(&mut self, label: &str) -> Result<Account, Error> {
        let index = self
            .position(label)
            .ok_or_else(|| Error::NotFound(label.to_owned()))?;
        Ok(self.accounts.remove(index))
    }

    /// Replaces the account stored under `old_label` with `account`.
    ///
    /// The account keeps its position, even when its label changes. Fails if
    /// the new label already belongs to another account.
    pub fn replace(
        &mut self,
        old_label: &str,
        account: Account,
    ) -> Result<(), Error> {
        let index = self
            .position(old_label)
            .ok_or_else(|| Error::NotFound(old_label.to_owned()))?;
        if account.label != old_label
            && self.position(&account.label).is_some()
        {
            return Err(Error::DuplicateLabel(account.label));
        }
        if let Some(slot) = self.accounts.get_mut(index) {
            *slot = account;
        }
        Ok(())
    }

    /// Saves all the accounts to the account file, overwriting it.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        fs::write(path, self.serialize())
            .map_err(|source| Error::Write { path: path.to_owned(), source })?;
        log::info!("Saved {} account(s) to {}", self.len(), path.display());
        Ok(())
    }

    /// Serializes the accounts in the account file format.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for account in &self.accounts {
            // Writing to a `String` never fails.
            let _ = write!(
                out,
                "{SECTION_PREFIX}{}]\n\
                 email={}\n\
                 password={}\n\
                 imap_server={}\n\
                 imap_port={}\n\
                 smtp_server={}\n\
                 smtp_port={}\n\n",
                account.label,
                account.email,
                account.password,
                account.imap_server,
                account.imap_port,
                account.smtp_server,
                account.smtp_port,
            );
        }
        out
    }
}

/// Sets the field of `account` named by `key`.
///
/// `raw` is the untrimmed text after the `=`. Unknown keys are ignored. Empty
/// ports fall back to their defaults.
fn set_field(
    account: &mut Account,
    key: &str,
    raw: &str,
    line: usize,
) -> Result<(), Error> {
    let value = raw.trim();
    match key {
        "email" => account.email = value.to_owned(),
        "password" => account.password = raw.to_owned(),
        "imap_server" => account.imap_server = value.to_owned(),
        "imap_port" =>
            account.imap_port = parse_port(
                value,
                "imap_port",
                Account::IMAP_PORT_DEFAULT,
                line,
            )?,
        "smtp_server" => account.smtp_server = value.to_owned(),
        "smtp_port" =>
            account.smtp_port = parse_port(
                value,
                "smtp_port",
                Account::SMTP_PORT_DEFAULT,
                line,
            )?,
        _ => log::debug!("Ignoring unknown key '{key}' on line {line}"),
    }
    Ok(())
}

/// Parses a port value, using `default` when it is empty.
fn parse_port(
    value: &str,
    key: &'static str,
    default: u16,
    line: usize,
) -> Result<u16, Error> {
    if value.is_empty() {
        return Ok(default);
    }
    value.parse().map_err(|source| Error::InvalidPort { line, key, source })
}

#[cfg(test)]
mod test {
    use super::{Account, AccountStore};
    use crate::accounts::Error;

    fn account(label: &str, email: &str) -> Account {
        Account {
            label: label.to_owned(),
            email: email.to_owned(),
            password: "s3cr=t".to_owned(),
            imap_server: "imap.example.com".to_owned(),
            imap_port: 993,
            smtp_server: "smtp.example.com".to_owned(),
            smtp_port: 465,
        }
    }

    fn labels_in_order(store: &AccountStore) -> Vec<&str> {
        store.as_accounts().iter().map(|acc| acc.label.as_str()).collect()
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn save_then_load_keeps_order_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");

        let mut store = AccountStore::default();
        store.insert(account("zeta", "z@example.com"));
        store.insert(account("alpha", "a@example.com"));
        store.insert(account("my work", "w@example.com"));
        store.save(&path).unwrap();

        let loaded = AccountStore::load(&path).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(labels_in_order(&loaded), ["zeta", "alpha", "my work"]);
        assert_eq!(loaded.labels(), ["alpha", "my work", "zeta"]);
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn password_keeps_surrounding_spaces_on_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");

        let mut spaced = account("work", "w@example.com");
        spaced.password = " spaced ".to_owned();
        let mut store = AccountStore::default();
        store.insert(spaced);
        store.save(&path).unwrap();

        let loaded = AccountStore::load(&path).unwrap();
        assert_eq!(loaded, store);
        assert_eq!(
            loaded.get("work").map(|acc| acc.password.as_str()),
            Some(" spaced ")
        );
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        assert!(AccountStore::load(&path).unwrap().is_empty());
    }

    #[test]
    fn insert_with_existing_label_overwrites() {
        let mut store = AccountStore::default();
        store.insert(account("work", "old@example.com"));
        store.insert(account("home", "home@example.com"));
        store.insert(account("work", "new@example.com"));

        assert_eq!(store.len(), 2);
        assert_eq!(labels_in_order(&store), ["work", "home"]);
        assert_eq!(
            store.get("work").map(|acc| acc.email.as_str()),
            Some("new@example.com")
        );
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn replace_moves_label_in_place() {
        let mut store = AccountStore::default();
        store.insert(account("work", "w@example.com"));
        store.insert(account("home", "h@example.com"));

        store.replace("work", account("office", "w@example.com")).unwrap();
        assert!(store.get("work").is_none());
        assert_eq!(labels_in_order(&store), ["office", "home"]);

        let err = store
            .replace("office", account("home", "x@example.com"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateLabel(label) if label == "home"));
        assert_eq!(
            store.get("office").map(|acc| acc.email.as_str()),
            Some("w@example.com")
        );
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn parse_tolerates_blank_lines_and_defaults_ports() {
        let content = "\n  [account home]  \n\
                       email = h@example.com\n\
                       password=a=b\n\
                       imap_server=imap.h.com\n\
                       smtp_port=\n\
                       color=blue\n";
        let store = AccountStore::parse(content).unwrap();
        let home = store.get("home").unwrap();
        assert_eq!(home.email, "h@example.com");
        assert_eq!(home.password, "a=b");
        assert_eq!(home.imap_port, 993);
        assert_eq!(home.smtp_port, 587);
    }

    #[test]
    fn parse_reports_line_numbers() {
        assert!(matches!(
            AccountStore::parse("email=x@example.com\n"),
            Err(Error::OrphanValue(1))
        ));
        assert!(matches!(
            AccountStore::parse("[account a]\n\njunk\n"),
            Err(Error::MalformedLine(3))
        ));
        assert!(matches!(
            AccountStore::parse("[account  ]\n"),
            Err(Error::EmptySectionLabel(1))
        ));
        assert!(matches!(
            AccountStore::parse("[account a]\nimap_port=abc\n"),
            Err(Error::InvalidPort { line: 2, key: "imap_port", .. })
        ));
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn remove_unknown_label_fails() {
        let mut store = AccountStore::default();
        store.insert(account("work", "w@example.com"));
        assert!(matches!(store.remove("home"), Err(Error::NotFound(_))));
        assert_eq!(store.remove("work").unwrap().label, "work");
        assert!(store.is_empty());
    }
}
