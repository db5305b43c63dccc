//! State of the client, independent of how it is rendered.
//!
//! [`App`] owns the account store, the reference to the active account and the
//! emails fetched for it. Every account change is saved to the account file
//! right away.

use std::path::{Path, PathBuf};

use crate::accounts::store::AccountStore;
use crate::accounts::{Account, Error};
use crate::errors::Result;
use crate::fetch::parser::MessageSummary;

/// Follows the state of the client.
#[derive(Debug)]
pub struct App {
    /// Label of the account every refresh and send acts on
    active: Option<String>,
    /// Path of the account file
    accounts_path: PathBuf,
    /// Id of the email that is hovered
    ///
    /// The id is computed from the most recent email (i.e., the latest email
    /// will be associated to an id of 0).
    current_id: usize,
    /// Emails fetched for the active account, newest first
    messages: Vec<MessageSummary>,
    /// Id of the opened email
    ///
    /// This is the same id than `current_id`, so the same rules apply.
    open_id: Option<usize>,
    /// All the known accounts
    store: AccountStore,
}

impl App {
    /// Returns the active account, if any.
    pub fn active_account(&self) -> Option<&Account> {
        self.active.as_deref().and_then(|label| self.store.get(label))
    }

    /// Returns the label of the active account, if any.
    pub fn active_label(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Adds an account and saves the store.
    ///
    /// An account with the same label is overwritten. The new account becomes
    /// active if no account was.
    pub fn add_account(&mut self, account: Account) -> Result {
        account.validate()?;
        let label = account.label.clone();
        self.store.insert(account);
        self.store.save(&self.accounts_path)?;
        if self.active.is_none() {
            log::info!("Account '{label}' added and activated");
            self.active = Some(label);
        } else {
            log::info!("Account '{label}' added");
        }
        Ok(())
    }

    /// Returns the accounts, in store order.
    pub fn as_store(&self) -> &AccountStore {
        &self.store
    }

    /// Returns the emails fetched for the active account.
    pub fn as_messages(&self) -> &[MessageSummary] {
        &self.messages
    }

    /// Forgets the fetched emails and the selection.
    fn clear_messages(&mut self) {
        self.messages.clear();
        self.current_id = 0;
        self.open_id = None;
    }

    /// Closes the opened email.
    pub const fn close_message(&mut self) {
        self.open_id = None;
    }

    /// Returns the id of the hovered email.
    pub const fn current_id(&self) -> usize {
        self.current_id
    }

    /// Deletes the account with the given label and saves the store.
    ///
    /// Deleting the active account clears the active reference and the
    /// fetched emails.
    pub fn delete_account(&mut self, label: &str) -> Result {
        self.store.remove(label)?;
        self.store.save(&self.accounts_path)?;
        if self.active.as_deref() == Some(label) {
            self.active = None;
            self.clear_messages();
        }
        log::info!("Account '{label}' deleted");
        Ok(())
    }

    /// Replaces the active account with `account` and saves the store.
    ///
    /// If the label changes, the record moves to the new label and the active
    /// reference follows it.
    pub fn edit_active_account(&mut self, account: Account) -> Result {
        account.validate()?;
        let old_label = self.active.clone().ok_or(Error::NoActiveAccount)?;
        let new_label = account.label.clone();
        self.store.replace(&old_label, account)?;
        self.store.save(&self.accounts_path)?;
        if new_label != old_label {
            log::info!("Account '{old_label}' renamed to '{new_label}'");
        }
        self.active = Some(new_label);
        Ok(())
    }

    /// Loads the accounts from the account file.
    ///
    /// The first account, in label order, becomes active.
    pub fn load(accounts_path: &Path) -> Result<Self> {
        let store = AccountStore::load(accounts_path)?;
        Ok(Self::new(store, accounts_path.to_owned()))
    }

    /// Creates the state from an already loaded store.
    pub fn new(store: AccountStore, accounts_path: PathBuf) -> Self {
        let active = store.labels().first().map(|label| (*label).to_owned());
        Self {
            active,
            accounts_path,
            current_id: 0,
            messages: Vec::new(),
            open_id: None,
            store,
        }
    }

    /// Returns the opened email, if any.
    pub fn opened_message(&self) -> Option<&MessageSummary> {
        self.open_id.and_then(|id| self.messages.get(id))
    }

    /// Opens the hovered email.
    pub fn open_current(&mut self) {
        if self.current_id < self.messages.len() {
            self.open_id = Some(self.current_id);
        }
    }

    /// Hovers the next (older) email.
    pub fn select_next(&mut self) {
        let incremented = self.current_id.saturating_add(1);
        if incremented < self.messages.len() {
            self.current_id = incremented;
        }
    }

    /// Hovers the previous (newer) email.
    pub const fn select_previous(&mut self) {
        self.current_id = self.current_id.saturating_sub(1);
    }

    /// Replaces the emails with a refresh result for the account `label`.
    ///
    /// Returns `false`, and changes nothing, if `label` is no longer the
    /// active account.
    pub fn set_messages(
        &mut self,
        label: &str,
        messages: Vec<MessageSummary>,
    ) -> bool {
        if self.active.as_deref() != Some(label) {
            log::info!("Dropping refresh result of inactive account '{label}'");
            return false;
        }
        self.clear_messages();
        self.messages = messages;
        true
    }

    /// Makes the account with the given label active.
    ///
    /// The emails of the previous account are cleared.
    pub fn switch_account(&mut self, label: &str) -> Result {
        if self.store.get(label).is_none() {
            return Err(Error::NotFound(label.to_owned()).into());
        }
        self.active = Some(label.to_owned());
        self.clear_messages();
        log::info!("Switched to account '{label}'");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use tempfile::TempDir;

    use super::App;
    use crate::accounts::store::AccountStore;
    use crate::accounts::{self, Account};
    use crate::errors::Error;
    use crate::fetch::parser::MessageSummary;

    fn account(label: &str) -> Account {
        let mut account = Account::new(label);
        account.email = format!("{label}@example.com");
        account.imap_server = "imap.example.com".to_owned();
        account.smtp_server = "smtp.example.com".to_owned();
        account
    }

    fn summary(id: u32) -> MessageSummary {
        MessageSummary {
            id,
            subject: format!("Message {id}"),
            from: "a@example.com".to_owned(),
            to: "b@example.com".to_owned(),
            date: None,
            body: String::new(),
        }
    }

    #[expect(clippy::unwrap_used, reason = "test")]
    fn app_with(labels: &[&str]) -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::load(&dir.path().join("accounts.txt")).unwrap();
        for label in labels {
            app.add_account(account(label)).unwrap();
        }
        (app, dir)
    }

    #[expect(clippy::unwrap_used, reason = "test")]
    fn reload(dir: &TempDir) -> AccountStore {
        AccountStore::load(&dir.path().join("accounts.txt")).unwrap()
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn first_label_in_order_is_active_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.txt");
        let mut store = AccountStore::default();
        store.insert(account("work"));
        store.insert(account("home"));
        store.save(&path).unwrap();

        let app = App::load(&path).unwrap();
        assert_eq!(app.active_label(), Some("home"));
        let missing = Path::new("/nonexistent/dir/accounts.txt");
        assert!(App::load(missing).unwrap().active_label().is_none());
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn added_password_is_stored_as_typed() {
        let (mut app, dir) = app_with(&[]);
        let mut spaced = account("work");
        spaced.password = " spaced ".to_owned();
        app.add_account(spaced).unwrap();

        let stored = reload(&dir);
        assert_eq!(
            stored.get("work").map(|acc| acc.password.as_str()),
            Some(" spaced ")
        );
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn adding_existing_label_overwrites_and_persists() {
        let (mut app, dir) = app_with(&["work", "home"]);
        assert_eq!(app.active_label(), Some("work"));

        let mut changed = account("work");
        changed.email = "new@example.com".to_owned();
        app.add_account(changed).unwrap();

        let stored = reload(&dir);
        assert_eq!(stored.len(), 2);
        assert_eq!(stored.get("work").unwrap().email, "new@example.com");
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn renaming_active_account_moves_record_and_reference() {
        let (mut app, dir) = app_with(&["work", "home"]);
        app.edit_active_account(account("office")).unwrap();

        assert_eq!(app.active_label(), Some("office"));
        assert_eq!(
            app.active_account().map(|acc| acc.label.as_str()),
            Some("office")
        );
        let stored = reload(&dir);
        assert_eq!(stored.len(), 2);
        assert!(stored.get("work").is_none());
        assert_eq!(
            stored.as_accounts().first().map(|acc| acc.label.as_str()),
            Some("office")
        );
    }

    #[test]
    fn renaming_onto_another_label_is_refused() {
        let (mut app, _dir) = app_with(&["work", "home"]);
        let result = app.edit_active_account(account("home"));
        assert!(matches!(
            result,
            Err(Error::Accounts(accounts::Error::DuplicateLabel(_)))
        ));
        assert_eq!(app.active_label(), Some("work"));
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn deleting_active_account_clears_reference_and_messages() {
        let (mut app, dir) = app_with(&["work", "home"]);
        assert!(app.set_messages("work", vec![summary(2), summary(1)]));
        app.select_next();
        app.open_current();

        app.delete_account("work").unwrap();
        assert!(app.active_label().is_none());
        assert!(app.as_messages().is_empty());
        assert!(app.opened_message().is_none());
        assert_eq!(app.current_id(), 0);
        assert_eq!(reload(&dir).labels(), ["home"]);
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn deleting_other_account_keeps_messages() {
        let (mut app, _dir) = app_with(&["work", "home"]);
        assert!(app.set_messages("work", vec![summary(1)]));
        app.delete_account("home").unwrap();
        assert_eq!(app.active_label(), Some("work"));
        assert_eq!(app.as_messages().len(), 1);
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn switching_clears_messages_and_ignores_stale_refresh() {
        let (mut app, _dir) = app_with(&["work", "home"]);
        assert!(app.set_messages("work", vec![summary(1)]));

        app.switch_account("home").unwrap();
        assert!(app.as_messages().is_empty());
        assert!(!app.set_messages("work", vec![summary(9)]));
        assert!(app.as_messages().is_empty());
        assert!(app.switch_account("missing").is_err());
    }

    #[test]
    fn selection_stays_in_bounds() {
        let (mut app, _dir) = app_with(&["work"]);
        let messages = vec![summary(3), summary(2), summary(1)];
        assert!(app.set_messages("work", messages));
        app.select_previous();
        assert_eq!(app.current_id(), 0);
        for _ in 0..5 {
            app.select_next();
        }
        assert_eq!(app.current_id(), 2);
        app.open_current();
        assert_eq!(app.opened_message().map(|msg| msg.id), Some(1));
        app.close_message();
        assert!(app.opened_message().is_none());
    }

    #[test]
    fn invalid_account_is_not_stored() {
        let (mut app, dir) = app_with(&[]);
        let result = app.add_account(Account::new(""));
        assert!(matches!(
            result,
            Err(Error::Accounts(accounts::Error::EmptyLabel))
        ));
        assert!(app.active_label().is_none());
        assert!(reload(&dir).is_empty());
    }
}
