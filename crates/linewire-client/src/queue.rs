//! Unbounded hand-off queues.
//!
//! A hand-off queue moves ownership of messages from one loop to another.
//! Queues are unbounded, with no priority and no drop policy.
//!
//! Each direction gets its own queue. The sender half is cloneable; the
//! receiver half belongs to exactly one loop.

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TryRecvError};

/// Why [`HandoffReceiver::try_pop`] returned nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PopError {
    /// No message queued right now.
    #[error("queue is empty")]
    Empty,
    /// Queue drained and every sender dropped. Nothing will ever arrive.
    #[error("queue is closed")]
    Closed,
}

/// Create a connected sender/receiver pair.
pub fn handoff<T>() -> (HandoffSender<T>, HandoffReceiver<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (HandoffSender { tx }, HandoffReceiver { rx })
}

/// Producer half.
#[derive(Debug)]
pub struct HandoffSender<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for HandoffSender<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> HandoffSender<T> {
    /// Enqueue `item`. Never blocks.
    ///
    /// If the consumer is gone the item is dropped: a loop that has already
    /// exited has nobody left to tell.
    pub fn push(&self, item: T) {
        if self.tx.send(item).is_err() {
            tracing::debug!("hand-off consumer gone, message dropped");
        }
    }

    /// Whether the receiving half has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half.
#[derive(Debug)]
pub struct HandoffReceiver<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> HandoffReceiver<T> {
    /// Wait for the next item in FIFO order.
    ///
    /// Returns `None` once all senders are dropped and the queue is drained.
    /// Cancel safe: dropping the future never loses an item.
    pub async fn pop(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Block the current thread until the next item arrives.
    ///
    /// For plain threads only; panics if called from within an async
    /// runtime.
    pub fn pop_blocking(&mut self) -> Option<T> {
        self.rx.blocking_recv()
    }

    /// Take the next item if one is queued, without waiting.
    pub fn try_pop(&mut self) -> Result<T, PopError> {
        self.rx.try_recv().map_err(|e| match e {
            TryRecvError::Empty => PopError::Empty,
            TryRecvError::Disconnected => PopError::Closed,
        })
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
