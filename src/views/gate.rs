//! Request generations
//!
//! Every time a view's inputs change a new request is issued. Responses can
//! resolve out of order, so each carries the generation it was issued under
//! and only the latest generation may become visible.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Generation stamp of one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Holds the visible result of the most recent request
#[derive(Debug)]
pub struct RequestGate<T> {
    issued: AtomicU64,
    visible: Mutex<Option<(u64, T)>>,
}

impl<T> Default for RequestGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RequestGate<T> {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            visible: Mutex::new(None),
        }
    }

    /// Start a new request, superseding every earlier one
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest_generation(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest_generation()
    }

    /// Publish a response. Returns false, dropping `value`, when a newer
    /// request has been issued since `ticket`.
    pub fn resolve(&self, ticket: Ticket, value: T) -> bool {
        let mut visible = self.visible.lock().unwrap_or_else(|e| e.into_inner());

        let latest = self.latest_generation();
        if ticket.0 != latest {
            tracing::debug!(stale = ticket.0, latest, "Discarding superseded response");
            return false;
        }
        if matches!(visible.as_ref(), Some((shown, _)) if *shown >= ticket.0) {
            return false;
        }

        *visible = Some((ticket.0, value));
        true
    }

    /// Generation of the visible result
    pub fn visible_generation(&self) -> Option<u64> {
        let visible = self.visible.lock().unwrap_or_else(|e| e.into_inner());
        visible.as_ref().map(|(generation, _)| *generation)
    }
}

impl<T: Clone> RequestGate<T> {
    /// Currently visible result
    pub fn latest(&self) -> Option<T> {
        let visible = self.visible.lock().unwrap_or_else(|e| e.into_inner());
        visible.as_ref().map(|(_, value)| value.clone())
    }
}
