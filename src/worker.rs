//! Runs the network operations away from the TUI thread.
//!
//! One operation runs at a time: a [`Job`] is refused while another is still
//! in flight. The TUI polls [`Worker::try_recv`] between two frames.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::accounts::Account;
use crate::errors::Result;
use crate::fetch;
use crate::fetch::parser::MessageSummary;
use crate::send::{self, Draft};

/// Access to the mail servers.
pub trait Gateway: Send + Sync {
    /// Fetches the most recent emails of the inbox of `account`.
    fn fetch_inbox(&self, account: &Account) -> Result<Vec<MessageSummary>>;

    /// Sends `draft` on behalf of `account`.
    fn send(&self, account: &Account, draft: &Draft) -> Result;
}

/// [`Gateway`] talking IMAP and SMTP to the servers of the account.
pub struct Network;

impl Gateway for Network {
    fn fetch_inbox(&self, account: &Account) -> Result<Vec<MessageSummary>> {
        fetch::connection::fetch_inbox(account)
    }

    fn send(&self, account: &Account, draft: &Draft) -> Result {
        send::send_draft(account, draft)
    }
}

/// Network operation requested by the user.
#[derive(Debug)]
pub enum Job {
    /// Fetch the inbox of the account
    Refresh(Account),
    /// Send the draft with the account
    Send(Account, Draft),
}

/// Result of a finished [`Job`].
#[derive(Debug)]
pub enum Outcome {
    /// The job thread stopped without answering.
    Lost,
    /// The inbox of the account `label` was fetched, or failed to be.
    Refreshed {
        /// Label of the refreshed account
        label: String,
        /// Emails, newest first
        result: Result<Vec<MessageSummary>>,
    },
    /// The draft was sent, or failed to be.
    Sent(Result),
}

/// Runs one [`Job`] at a time on a background thread.
pub struct Worker {
    /// Servers the jobs talk to
    gateway: Arc<dyn Gateway>,
    /// Receiving end of the job in flight
    ///
    /// The only sender lives in the job thread, so the channel disconnects
    /// if that thread dies before answering.
    pending: Option<Receiver<Outcome>>,
}

impl Worker {
    /// Returns `true` while a job is in flight.
    pub const fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Creates a worker running its jobs against `gateway`.
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway, pending: None }
    }

    /// Starts `job` on a background thread.
    pub fn submit(&mut self, job: Job) -> Result<(), Error> {
        if self.is_busy() {
            return Err(Error::Busy);
        }
        let gateway = Arc::clone(&self.gateway);
        let (sender, receiver) = mpsc::channel();
        thread::Builder::new()
            .name("mail-worker".to_owned())
            .spawn(move || {
                let outcome = match job {
                    Job::Refresh(account) => {
                        let result = gateway.fetch_inbox(&account);
                        Outcome::Refreshed { label: account.label, result }
                    }
                    Job::Send(account, draft) =>
                        Outcome::Sent(gateway.send(&account, &draft)),
                };
                if sender.send(outcome).is_err() {
                    log::warn!("Worker result dropped: the TUI is gone");
                }
            })
            .map_err(Error::Spawn)?;
        self.pending = Some(receiver);
        Ok(())
    }

    /// Returns the outcome of the job in flight, if it finished.
    pub fn try_recv(&mut self) -> Option<Outcome> {
        let outcome = match self.pending.as_ref()?.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                log::error!("Worker thread stopped without an answer");
                Outcome::Lost
            }
        };
        self.pending = None;
        Some(outcome)
    }
}

/// Errors that may occur while starting a job.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Another job is still running.
    #[error("another operation is still running, please wait")]
    Busy,
    /// The job thread could not be spawned.
    #[error("failed to start the operation: {0}")]
    Spawn(std::io::Error),
}

#[cfg(test)]
mod test {
    use core::time::Duration;
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::{Arc, Mutex};

    use super::{Error, Gateway, Job, Outcome, Worker};
    use crate::accounts::Account;
    use crate::errors::Result;
    use crate::fetch::parser::MessageSummary;
    use crate::send::Draft;

    /// Gateway blocking each call until the test releases it.
    struct Gated {
        /// One message per call allowed to complete
        release: Mutex<Receiver<()>>,
    }

    impl Gated {
        fn new() -> (Self, Sender<()>) {
            let (sender, receiver) = mpsc::channel();
            (Self { release: Mutex::new(receiver) }, sender)
        }

        fn wait(&self) {
            #[expect(clippy::unwrap_used, reason = "test")]
            self.release.lock().unwrap().recv().unwrap();
        }
    }

    impl Gateway for Gated {
        fn fetch_inbox(
            &self,
            account: &Account,
        ) -> Result<Vec<MessageSummary>> {
            self.wait();
            Ok(vec![MessageSummary {
                id: 1,
                subject: account.label.clone(),
                from: String::new(),
                to: String::new(),
                date: None,
                body: String::new(),
            }])
        }

        fn send(&self, _account: &Account, _draft: &Draft) -> Result {
            self.wait();
            Ok(())
        }
    }

    /// Gateway whose refreshes panic.
    struct Crashing;

    impl Gateway for Crashing {
        fn fetch_inbox(&self, _: &Account) -> Result<Vec<MessageSummary>> {
            panic!("connection handler crashed");
        }

        fn send(&self, _account: &Account, _draft: &Draft) -> Result {
            Ok(())
        }
    }

    fn wait_outcome(worker: &mut Worker) -> Outcome {
        for _ in 0..500 {
            if let Some(outcome) = worker.try_recv() {
                return outcome;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("worker did not answer");
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn one_job_at_a_time() {
        let (gateway, release) = Gated::new();
        let mut worker = Worker::new(Arc::new(gateway));

        worker.submit(Job::Refresh(Account::new("work"))).unwrap();
        assert!(worker.is_busy());
        let second = Job::Send(Account::new("work"), Draft::default());
        assert!(matches!(worker.submit(second), Err(Error::Busy)));
        assert!(worker.try_recv().is_none());

        release.send(()).unwrap();
        match wait_outcome(&mut worker) {
            Outcome::Refreshed { label, result } => {
                assert_eq!(label, "work");
                let messages = result.unwrap();
                assert_eq!(
                    messages.first().map(|msg| msg.subject.as_str()),
                    Some("work")
                );
            }
            Outcome::Lost | Outcome::Sent(_) => panic!("unexpected outcome"),
        }
        assert!(!worker.is_busy());

        let job = Job::Send(Account::new("work"), Draft::default());
        worker.submit(job).unwrap();
        release.send(()).unwrap();
        assert!(matches!(wait_outcome(&mut worker), Outcome::Sent(Ok(()))));
    }

    #[test]
    #[expect(clippy::unwrap_used, reason = "test")]
    fn crashed_job_frees_the_worker() {
        let mut worker = Worker::new(Arc::new(Crashing));

        worker.submit(Job::Refresh(Account::new("work"))).unwrap();
        assert!(matches!(wait_outcome(&mut worker), Outcome::Lost));
        assert!(!worker.is_busy());

        let job = Job::Send(Account::new("work"), Draft::default());
        worker.submit(job).unwrap();
        assert!(matches!(wait_outcome(&mut worker), Outcome::Sent(Ok(()))));
    }
}
