//! Replay-latest multicast notification channel.
//!
//! A [`ReplayChannel`] retains exactly one value, the most recently published
//! one (or the seed it was created with). Every new subscriber receives that
//! value synchronously at subscribe time, then every later publish in order.
//!
//! Values are stored once behind an [`Arc`] and handed to each subscriber by
//! reference, so a published value is never recomputed per subscriber.
//!
//! Two subscriber shapes are offered:
//! - callbacks via [`ReplayChannel::subscribe`], detached when the returned
//!   [`Subscription`] is dropped
//! - pull-style [`Stream`]s backed by an unbounded `tokio` mpsc queue
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Callbacks run outside the channel lock; a callback may subscribe to or
//!    publish on the same channel. A publish made while values are being
//!    delivered is queued, so every subscriber still sees publish order.
//! 3. After [`ReplayChannel::complete`] no subscriber is retained, streams end,
//!    and publishes are ignored.

mod stream;
mod subscription;

pub use stream::Stream;
pub use subscription::Subscription;

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use subscription::Detach;
use tracing::trace;

type Callback<T> = Arc<dyn Fn(&Arc<T>) + Send + Sync>;

struct Inner<T> {
    latest: Arc<T>,
    /// Value replayed to new subscribers. Trails `latest` only while queued
    /// values are still being delivered.
    replay: Arc<T>,
    /// Published values not yet handed to subscribers.
    pending: VecDeque<Arc<T>>,
    delivering: bool,
    subscribers: Vec<(u64, Callback<T>)>,
    next_id: u64,
    completed: bool,
}

/// Releases the delivery flag if a callback panics mid-delivery.
struct Delivery<'a, T> {
    inner: &'a Mutex<Inner<T>>,
    finished: bool,
}

impl<T> Drop for Delivery<'_, T> {
    fn drop(&mut self) {
        if !self.finished {
            let mut inner = self.inner.lock();
            inner.delivering = false;
            inner.pending.clear();
            inner.replay = Arc::clone(&inner.latest);
        }
    }
}

impl<T: Send + Sync> Detach for Mutex<Inner<T>> {
    fn detach(&self, id: u64) {
        let removed = {
            let mut inner = self.lock();
            let pos = inner.subscribers.iter().position(|(sid, _)| *sid == id);
            pos.map(|pos| inner.subscribers.remove(pos))
        };
        // Dropped outside the lock: a callback may own a stream sender.
        drop(removed);
    }
}

/// Multicast publish channel that replays its latest value to new subscribers.
///
/// Cloning a channel yields another handle to the same subscriber list.
pub struct ReplayChannel<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for ReplayChannel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for ReplayChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ReplayChannel")
            .field("subscribers", &inner.subscribers.len())
            .field("completed", &inner.completed)
            .finish()
    }
}

impl<T: Send + Sync + 'static> ReplayChannel<T> {
    /// Creates a channel whose first replayed value is `initial`.
    pub fn new(initial: T) -> Self {
        let initial = Arc::new(initial);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                latest: Arc::clone(&initial),
                replay: initial,
                pending: VecDeque::new(),
                delivering: false,
                subscribers: Vec::new(),
                next_id: 0,
                completed: false,
            })),
        }
    }

    /// Stores `value` as the latest and delivers it to every current subscriber.
    ///
    /// A publish issued while another is delivering (from a callback, or from
    /// another thread) is queued and delivered by the outermost call, after
    /// the values published before it.
    pub fn publish(&self, value: T) {
        {
            let mut inner = self.inner.lock();
            if inner.completed {
                trace!("publish on completed channel ignored");
                return;
            }
            let value = Arc::new(value);
            inner.latest = Arc::clone(&value);
            inner.pending.push_back(value);
            if inner.delivering {
                trace!(queued = inner.pending.len(), "publish queued");
                return;
            }
            inner.delivering = true;
        }

        let mut delivery = Delivery {
            inner: &self.inner,
            finished: false,
        };
        loop {
            let (value, subscribers) = {
                let mut inner = self.inner.lock();
                let Some(value) = inner.pending.pop_front() else {
                    inner.delivering = false;
                    break;
                };
                inner.replay = Arc::clone(&value);
                let subscribers: Vec<Callback<T>> =
                    inner.subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect();
                (value, subscribers)
            };
            trace!(subscribers = subscribers.len(), "publishing");
            for callback in subscribers {
                callback(&value);
            }
        }
        delivery.finished = true;
    }

    /// The most recently published value (or the seed).
    pub fn latest(&self) -> Arc<T> {
        Arc::clone(&self.inner.lock().latest)
    }

    /// Registers `callback`, invoking it immediately with the latest value.
    ///
    /// Subscribing from inside a callback replays the value being delivered;
    /// values queued behind it follow in order.
    ///
    /// On a completed channel the latest value is still replayed once, but the
    /// callback is not retained.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.register(Arc::new(move |value: &Arc<T>| callback(&**value)))
    }

    /// Subscribes a queue that receives every value, starting with the latest.
    pub fn stream(&self) -> Stream<T> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let subscription = self.register(Arc::new(move |value: &Arc<T>| {
            // Publishing never fails because a reader went away.
            let _ = tx.send(Arc::clone(value));
        }));
        Stream::new(rx, subscription)
    }

    /// Like [`stream`](Self::stream), transforming each value on delivery.
    pub fn stream_map<U, F>(&self, map: F) -> Stream<U>
    where
        U: Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let subscription = self.register(Arc::new(move |value: &Arc<T>| {
            let _ = tx.send(Arc::new(map(&**value)));
        }));
        Stream::new(rx, subscription)
    }

    fn register(&self, callback: Callback<T>) -> Subscription {
        let (id, latest, completed) = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            if !inner.completed {
                inner.subscribers.push((id, Arc::clone(&callback)));
            }
            (id, Arc::clone(&inner.replay), inner.completed)
        };
        callback(&latest);
        if completed {
            return Subscription::detached();
        }
        let handle: Arc<dyn Detach> = self.inner.clone();
        Subscription::new(id, Arc::downgrade(&handle))
    }

    /// Number of retained subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// Drops every subscriber and ignores later publishes. Idempotent.
    pub fn complete(&self) {
        let dropped = {
            let mut inner = self.inner.lock();
            inner.completed = true;
            inner.pending.clear();
            inner.replay = Arc::clone(&inner.latest);
            std::mem::take(&mut inner.subscribers)
        };
        trace!(subscribers = dropped.len(), "channel completed");
        drop(dropped);
    }

    pub fn is_completed(&self) -> bool {
        self.inner.lock().completed
    }
}
