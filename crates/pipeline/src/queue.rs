//! Bounded work queue between the scanner and the worker pool.
//!
//! A thin wrapper over a bounded crossbeam channel. Pushes block while the
//! queue is full (backpressure on the scanner); pops block while it is
//! empty and return `None` once every sender is gone and the remaining
//! items are drained. Closing therefore falls out of ownership: the scanner
//! holds the only sender and drops it when the scan ends.
//!
//! Queues are constructed explicitly and their handles passed to the
//! scanner and pool; there is no process-wide shared queue.

use crossbeam_channel::{Receiver, Sender};

/// One source record awaiting conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Raw address bytes, the source store key.
    pub key: Vec<u8>,
    /// Raw encoded account record.
    pub value: Vec<u8>,
}

/// Creates a bounded work queue with the given capacity.
///
/// The receiver side is cloneable so multiple workers can drain the same
/// queue; each item is delivered to exactly one of them.
pub fn bounded(capacity: usize) -> (WorkSender, WorkReceiver) {
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    (WorkSender { tx }, WorkReceiver { rx })
}

/// Producer handle of the work queue.
pub struct WorkSender {
    tx: Sender<WorkItem>,
}

impl WorkSender {
    /// Pushes an item, blocking while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns the item back if every receiver has been dropped.
    pub fn push(&self, item: WorkItem) -> Result<(), WorkItem> {
        self.tx.send(item).map_err(|err| err.into_inner())
    }
}

/// Consumer handle of the work queue.
#[derive(Clone)]
pub struct WorkReceiver {
    rx: Receiver<WorkItem>,
}

impl WorkReceiver {
    /// Pops the next item, blocking while the queue is empty.
    ///
    /// Returns `None` once the queue is closed (all senders dropped) and
    /// fully drained.
    pub fn pop(&self) -> Option<WorkItem> {
        self.rx.recv().ok()
    }
}
