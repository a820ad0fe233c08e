//! Bounded parallel dispatch of per-entry work.
//!
//! The [`Dispatcher`] owns a dedicated rayon pool of `K` threads and an
//! [`AdmissionGate`] of `K` permits. Submission happens on the caller's
//! thread: each entry first takes a permit, then is spawned onto the pool with
//! the permit moved into the job. Once `K` jobs are in flight the caller
//! blocks until one finishes, so the pool's queue never grows past `K`.
//!
//! ```text
//! caller:  acquire ─ spawn ─ on_submit ─ acquire ─ spawn ─ … ─ wait for scope
//! worker:            └─ task(entry) ─ drop(permit)
//! ```
//!
//! [`Dispatcher::run`] returns only after every spawned job has finished; the
//! rayon scope is the completion barrier. Permits are released by `Drop`, so a
//! job that fails or unwinds still hands its slot back exactly once.

use crate::types::DictionaryEntry;
use std::sync::{Condvar, Mutex, PoisonError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("worker count must be at least 1")]
    NoWorkers,
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Counting semaphore limiting how many jobs are in flight.
#[derive(Debug)]
pub struct AdmissionGate {
    available: Mutex<usize>,
    released: Condvar,
}

impl AdmissionGate {
    pub fn new(permits: usize) -> Self {
        Self {
            available: Mutex::new(permits),
            released: Condvar::new(),
        }
    }

    /// Take a permit, blocking until one is free.
    pub fn acquire(&self) -> Permit<'_> {
        // The guarded value is a plain counter; a panic elsewhere cannot leave it torn.
        let mut available = self
            .available
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while *available == 0 {
            available = self
                .released
                .wait(available)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *available -= 1;
        Permit { gate: self }
    }

    /// Permits not currently held.
    pub fn available(&self) -> usize {
        *self
            .available
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self) {
        let mut available = self
            .available
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *available += 1;
        self.released.notify_one();
    }
}

/// A held slot; returned to its gate when dropped.
#[derive(Debug)]
pub struct Permit<'a> {
    gate: &'a AdmissionGate,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}

pub struct Dispatcher {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl Dispatcher {
    pub fn new(workers: usize) -> Result<Self, DispatchError> {
        if workers == 0 {
            return Err(DispatchError::NoWorkers);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("generate-{i}"))
            .build()?;
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `task` once per entry with at most `workers` running at a time.
    ///
    /// `on_submit` is called on the caller's thread right after each entry is
    /// handed to the pool, interleaved with running jobs. Returns the number
    /// of entries submitted, after all of them have completed.
    pub fn run<'d, I, T, S>(&self, entries: I, task: T, mut on_submit: S) -> usize
    where
        I: IntoIterator<Item = &'d DictionaryEntry>,
        T: Fn(&'d DictionaryEntry) + Sync,
        S: FnMut(&'d DictionaryEntry),
    {
        let gate = AdmissionGate::new(self.workers);
        let task = &task;
        let mut submitted = 0;

        self.pool.in_place_scope(|scope| {
            for entry in entries {
                let permit = gate.acquire();
                scope.spawn(move |_| {
                    let _permit = permit;
                    task(entry);
                });
                on_submit(entry);
                submitted += 1;
            }
        });

        tracing::debug!(submitted, workers = self.workers, "dispatch finished");
        submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::numbered_entries;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn zero_workers_rejected() {
        assert!(matches!(Dispatcher::new(0), Err(DispatchError::NoWorkers)));
    }

    #[test]
    fn permit_returns_on_drop() {
        let gate = AdmissionGate::new(2);
        let first = gate.acquire();
        let second = gate.acquire();
        assert_eq!(gate.available(), 0);
        drop(first);
        assert_eq!(gate.available(), 1);
        drop(second);
        assert_eq!(gate.available(), 2);
    }

    #[test]
    fn permit_returns_on_unwind() {
        let gate = AdmissionGate::new(1);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _permit = gate.acquire();
            panic!("task failed");
        }));
        assert!(result.is_err());
        assert_eq!(gate.available(), 1);
    }

    #[test]
    fn acquire_blocks_until_release() {
        let gate = AdmissionGate::new(1);
        let acquired = AtomicUsize::new(0);
        let held = gate.acquire();

        thread::scope(|s| {
            s.spawn(|| {
                let _permit = gate.acquire();
                acquired.fetch_add(1, Ordering::SeqCst);
            });
            thread::sleep(Duration::from_millis(50));
            assert_eq!(acquired.load(Ordering::SeqCst), 0);
            drop(held);
        });
        assert_eq!(acquired.load(Ordering::SeqCst), 1);
        assert_eq!(gate.available(), 1);
    }

    #[test]
    fn runs_every_entry_once() {
        let entries = numbered_entries(500);
        let dispatcher = Dispatcher::new(8).unwrap();
        let seen = Mutex::new(Vec::new());
        let mut submitted_order = Vec::new();

        let submitted = dispatcher.run(
            &entries,
            |entry| seen.lock().unwrap().push(entry.headword().to_string()),
            |entry| submitted_order.push(entry.headword().to_string()),
        );

        assert_eq!(submitted, 500);
        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        let mut expected: Vec<_> = entries.iter().map(|e| e.headword().to_string()).collect();
        expected.sort();
        assert_eq!(seen, expected);
        assert_eq!(submitted_order.len(), 500);
    }

    #[test]
    fn never_exceeds_worker_limit() {
        let entries = numbered_entries(64);
        for workers in [1, 3, 8] {
            let dispatcher = Dispatcher::new(workers).unwrap();
            let in_flight = AtomicUsize::new(0);
            let peak = AtomicUsize::new(0);

            dispatcher.run(
                &entries,
                |_| {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(2));
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                },
                |_| {},
            );

            assert!(peak.load(Ordering::SeqCst) <= workers);
            assert_eq!(in_flight.load(Ordering::SeqCst), 0);
        }
    }

    #[test]
    fn single_worker_does_not_deadlock() {
        let entries = numbered_entries(32);
        let dispatcher = Dispatcher::new(1).unwrap();
        let done = AtomicUsize::new(0);
        dispatcher.run(
            &entries,
            |_| {
                done.fetch_add(1, Ordering::SeqCst);
            },
            |_| {},
        );
        assert_eq!(done.load(Ordering::SeqCst), 32);
    }

    #[test]
    fn empty_input_returns_immediately() {
        let dispatcher = Dispatcher::new(4).unwrap();
        let submitted = dispatcher.run(
            std::iter::empty::<&DictionaryEntry>(),
            |_| {},
            |_| {},
        );
        assert_eq!(submitted, 0);
    }
}
