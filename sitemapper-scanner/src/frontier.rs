//! Work queue shared by the crawl workers.
//!
//! Items are handed out one depth level at a time: the next level only opens
//! once every item of the current level has been completed. That makes each
//! URL land at its shortest distance from the seed regardless of how many
//! workers run, so the set of pages found does not depend on scheduling.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, Notify};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub url: String,
    pub depth: usize,
}

impl WorkItem {
    pub fn new(url: impl Into<String>, depth: usize) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Cloneable switch that stops a running crawl. Pages already being fetched
/// are finished; queued pages stay in the site map as leaves.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    inner: Arc<StopInner>,
}

#[derive(Debug, Default)]
struct StopInner {
    stopped: AtomicBool,
    notify: Notify,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.inner.stopped.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    /// Resolves once `stop` has been called.
    pub async fn stopped(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_stopped() {
                return;
            }
            notified.await;
        }
    }
}

#[derive(Debug, Default)]
struct FrontierState {
    current: VecDeque<WorkItem>,
    next: VecDeque<WorkItem>,
    in_flight: usize,
}

#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    notify: Notify,
    stop: StopHandle,
}

impl Frontier {
    pub fn new(initial: Vec<WorkItem>, stop: StopHandle) -> Self {
        Self {
            state: Mutex::new(FrontierState {
                current: initial.into(),
                ..FrontierState::default()
            }),
            notify: Notify::new(),
            stop,
        }
    }

    /// Next item to visit. Waits while the current level is empty but other
    /// workers may still produce work; returns `None` once the queue is drained
    /// with nothing in flight, or after a stop.
    pub async fn pop(&self) -> Option<WorkItem> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.stop.is_stopped() {
                return None;
            }

            {
                let mut guard = self.state.lock().await;
                let state = &mut *guard;

                if state.current.is_empty() && state.in_flight == 0 && !state.next.is_empty() {
                    std::mem::swap(&mut state.current, &mut state.next);
                    debug!("Frontier advanced to a level of {} items", state.current.len());
                }

                if let Some(item) = state.current.pop_front() {
                    state.in_flight += 1;
                    return Some(item);
                }

                if state.in_flight == 0 {
                    drop(guard);
                    self.notify.notify_waiters();
                    return None;
                }
            }

            tokio::select! {
                _ = notified => {}
                _ = self.stop.stopped() => {}
            }
        }
    }

    /// Mark one popped item as done and queue the work it produced.
    pub async fn complete(&self, produced: Vec<WorkItem>) {
        {
            let mut state = self.state.lock().await;
            state.next.extend(produced);
            state.in_flight = state.in_flight.saturating_sub(1);
        }
        self.notify.notify_waiters();
    }
}
