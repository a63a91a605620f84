// SPDX-License-Identifier: AGPL-3.0
// Artshelf Core - Trailing-edge debounce for the search box

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Debounce state as seen by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending,
}

/// Pure debounce state machine driven by explicit instants
///
/// Every `input` restarts the window. `poll` hands out the latest value
/// once the window has elapsed with no further input.
#[derive(Debug)]
pub struct DebounceTimer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> DebounceTimer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a keystroke, cancelling any outstanding deadline
    pub fn input(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    /// Commit the pending value if its window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((_, deadline)) if now >= deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    pub fn state(&self) -> DebounceState {
        if self.pending.is_some() {
            DebounceState::Pending
        } else {
            DebounceState::Idle
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value will commit, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Drop the pending value without committing it
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Search query debounced on tokio timers
///
/// Keystrokes go in through [`input`]; committed queries come out of a
/// watch channel. Must be created inside a tokio runtime.
///
/// [`input`]: DebouncedQuery::input
pub struct DebouncedQuery {
    input_tx: mpsc::UnboundedSender<(u64, String)>,
    committed_rx: watch::Receiver<String>,
    sent: Arc<AtomicU64>,
    committed: Arc<AtomicU64>,
    commits: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl DebouncedQuery {
    pub fn spawn(window: Duration) -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (committed_tx, committed_rx) = watch::channel(String::new());
        let committed = Arc::new(AtomicU64::new(0));
        let commits = Arc::new(AtomicU64::new(0));

        let task = tokio::spawn(Self::run(
            window,
            input_rx,
            committed_tx,
            committed.clone(),
            commits.clone(),
        ));

        Self {
            input_tx,
            committed_rx,
            sent: Arc::new(AtomicU64::new(0)),
            committed,
            commits,
            task,
        }
    }

    async fn run(
        window: Duration,
        mut input_rx: mpsc::UnboundedReceiver<(u64, String)>,
        committed_tx: watch::Sender<String>,
        committed: Arc<AtomicU64>,
        commits: Arc<AtomicU64>,
    ) {
        let mut timer = DebounceTimer::new(window);
        let mut latest = 0;

        loop {
            let deadline = timer.deadline();
            tokio::select! {
                msg = input_rx.recv() => match msg {
                    Some((generation, value)) => {
                        latest = generation;
                        timer.input(value, Instant::now());
                    }
                    None => break,
                },
                _ = sleep_until_opt(deadline), if deadline.is_some() => {
                    if let Some(value) = timer.poll(Instant::now()) {
                        tracing::debug!("Search query settled: {:?}", value);
                        committed.store(latest, Ordering::SeqCst);
                        commits.fetch_add(1, Ordering::SeqCst);
                        committed_tx.send_replace(value);
                    }
                }
            }
        }
    }

    /// Feed a keystroke (the full current text of the search box)
    pub fn input(&self, value: impl Into<String>) {
        let generation = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        if self.input_tx.send((generation, value.into())).is_err() {
            tracing::warn!("Debounce task is gone, dropping search input");
        }
    }

    /// True while a keystroke has not yet been committed
    pub fn is_pending(&self) -> bool {
        self.sent.load(Ordering::SeqCst) != self.committed.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> DebounceState {
        if self.is_pending() {
            DebounceState::Pending
        } else {
            DebounceState::Idle
        }
    }

    /// Last committed query
    pub fn current(&self) -> String {
        self.committed_rx.borrow().clone()
    }

    /// Receiver that wakes on every commit
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.committed_rx.clone()
    }

    /// Number of commits so far
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }
}

impl Drop for DebouncedQuery {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
