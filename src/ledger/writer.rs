//! Single-writer actor owning the ledger.
//!
//! Every job runs on one dedicated thread in submission order, so the
//! funds check and the debit of a transaction can never interleave with
//! another mutation.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::domain::Transaction;
use crate::errors::LedgerError;

use super::book::Ledger;

type Job = Box<dyn FnOnce(&mut Ledger) + Send + 'static>;

enum Message {
    Run { job: Job, simulated: bool },
    SetDelay(Duration),
}

/// Writer tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterOptions {
    /// Pause applied before simulated-remote jobs (CRUD and transaction submits).
    pub simulated_delay: Duration,
}

impl WriterOptions {
    pub fn with_delay_ms(millis: u64) -> Self {
        Self {
            simulated_delay: Duration::from_millis(millis),
        }
    }
}

/// Cloneable handle used to send jobs to the writer thread.
#[derive(Clone)]
pub struct LedgerHandle {
    tx: mpsc::Sender<Message>,
}

impl LedgerHandle {
    /// Runs `job` against the ledger on the writer thread and returns its result.
    pub fn exec<F, T>(&self, job: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Ledger) -> T + Send + 'static,
        T: Send + 'static,
    {
        self.dispatch(job, false)
    }

    /// Like [`exec`](Self::exec), but waits the configured simulated delay first.
    pub fn exec_simulated<F, T>(&self, job: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Ledger) -> T + Send + 'static,
        T: Send + 'static,
    {
        self.dispatch(job, true)
    }

    /// Applies a transaction through the ledger's mutator.
    pub fn submit(&self, transaction: Transaction) -> Result<Transaction, LedgerError> {
        self.exec_simulated(move |ledger| ledger.submit(transaction))?
    }

    /// Returns a copy of the current ledger state.
    pub fn snapshot(&self) -> Result<Ledger, LedgerError> {
        self.exec(|ledger| ledger.clone())
    }

    pub fn set_simulated_delay(&self, delay: Duration) -> Result<(), LedgerError> {
        self.tx
            .send(Message::SetDelay(delay))
            .map_err(|_| LedgerError::WriterClosed)
    }

    fn dispatch<F, T>(&self, job: F, simulated: bool) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Ledger) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = mpsc::sync_channel(1);
        let job: Job = Box::new(move |ledger| {
            // The caller may have gone away; the result is then discarded.
            let _ = reply_tx.send(job(ledger));
        });
        self.tx
            .send(Message::Run { job, simulated })
            .map_err(|_| LedgerError::WriterClosed)?;
        reply_rx.recv().map_err(|_| LedgerError::WriterClosed)
    }
}

/// Spawns the writer thread.
pub struct LedgerWriter;

impl LedgerWriter {
    /// Moves `ledger` onto a dedicated thread. The thread exits once every
    /// handle has been dropped.
    pub fn spawn(ledger: Ledger, options: WriterOptions) -> LedgerHandle {
        let (tx, rx) = mpsc::channel::<Message>();

        thread::spawn(move || {
            let mut ledger = ledger;
            let mut delay = options.simulated_delay;
            tracing::debug!(?delay, "Ledger writer started");

            while let Ok(message) = rx.recv() {
                match message {
                    Message::Run { job, simulated } => {
                        if simulated && !delay.is_zero() {
                            thread::sleep(delay);
                        }
                        job(&mut ledger);
                    }
                    Message::SetDelay(next) => {
                        tracing::debug!(?next, "Simulated delay updated");
                        delay = next;
                    }
                }
            }
            tracing::debug!("Ledger writer stopped");
        });

        LedgerHandle { tx }
    }
}
