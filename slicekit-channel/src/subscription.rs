use std::fmt;
use std::sync::Weak;

pub(crate) trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

/// Keeps a channel subscriber attached. Dropping it unsubscribes.
///
/// Unsubscribing only stops delivery to this subscriber; it never touches the
/// publisher's state.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    channel: Option<Weak<dyn Detach>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, channel: Weak<dyn Detach>) -> Self {
        Self {
            id,
            channel: Some(channel),
        }
    }

    /// A subscription with nothing to detach from (completed channel).
    pub(crate) fn detached() -> Self {
        Self {
            id: u64::MAX,
            channel: None,
        }
    }

    /// Explicitly unsubscribes. Equivalent to dropping.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(channel) = self.channel.take().and_then(|weak| weak.upgrade()) {
            channel.detach(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("detached", &self.channel.is_none())
            .finish()
    }
}
