use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use log::*;
use tokio::sync::{mpsc, Mutex};

use crate::db_types::OrderNumber;

/// An unbounded, multi-producer, multi-consumer queue of order numbers awaiting a status check.
///
/// Cloning the queue gives another handle onto the same channel. `push` never blocks, and never drops an entry.
/// Consumers share the single receiver, so every entry is delivered to exactly one of them. Entries arrive in roughly
/// the order they were pushed.
#[derive(Clone)]
pub struct ReconciliationQueue {
    sender: mpsc::UnboundedSender<OrderNumber>,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<OrderNumber>>>,
    pending: Arc<AtomicUsize>,
}

impl Default for ReconciliationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReconciliationQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconciliationQueue ({} pending)", self.len())
    }
}

impl ReconciliationQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver: Arc::new(Mutex::new(receiver)), pending: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn push(&self, number: OrderNumber) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        // The queue owns a receiver, so the channel cannot be closed while `self` is alive
        if let Err(e) = self.sender.send(number) {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            error!("🔁️ Could not queue order {} for reconciliation", e.0);
        } else {
            trace!("🔁️ Order queued for reconciliation. {} pending", self.len());
        }
    }

    /// Waits for the next order number. Returns `None` only if the channel has been closed.
    pub async fn pop(&self) -> Option<OrderNumber> {
        let mut receiver = self.receiver.lock().await;
        let number = receiver.recv().await;
        if number.is_some() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }
        number
    }

    /// Takes the next order number if one is immediately available.
    pub fn try_pop(&self) -> Option<OrderNumber> {
        let mut receiver = self.receiver.try_lock().ok()?;
        let number = receiver.try_recv().ok();
        if number.is_some() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }
        number
    }

    /// The number of entries waiting to be popped.
    pub fn len(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
