use crate::Subscription;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Pull-style view of a channel subscription.
///
/// The first item is the value the channel held at subscribe time. The stream
/// ends once the channel is completed and every queued value was read.
/// Dropping the stream unsubscribes.
///
/// The queue is unbounded: every publish is retained until read. A stream
/// that is never read grows with each publish (for mapped streams, by one
/// mapped value each), so drop streams that are no longer consumed or use a
/// callback subscription instead. [`queued`](Self::queued) reports the backlog.
#[derive(Debug)]
pub struct Stream<T> {
    rx: UnboundedReceiver<Arc<T>>,
    _subscription: Subscription,
}

impl<T> Stream<T> {
    pub(crate) fn new(rx: UnboundedReceiver<Arc<T>>, subscription: Subscription) -> Self {
        Self {
            rx,
            _subscription: subscription,
        }
    }

    /// Next queued value without waiting.
    pub fn try_next(&mut self) -> Option<Arc<T>> {
        self.rx.try_recv().ok()
    }

    /// Waits for the next value. `None` once the channel completed and drained.
    pub async fn next(&mut self) -> Option<Arc<T>> {
        self.rx.recv().await
    }

    /// Number of values waiting to be read.
    pub fn queued(&self) -> usize {
        self.rx.len()
    }

    /// Every value queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<Arc<T>> {
        let mut out = Vec::new();
        while let Ok(value) = self.rx.try_recv() {
            out.push(value);
        }
        out
    }
}
