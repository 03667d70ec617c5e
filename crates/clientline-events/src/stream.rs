use std::pin::Pin;
use std::task::{ready, Context, Poll};

use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::warn;

use crate::event::ClientEvent;

/// What a subscription does when its bounded queue overflows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Discard the oldest undelivered events and keep streaming.
    #[default]
    DropOldest,
    /// End the stream on the first overflow.
    Disconnect,
}

/// Identifier of a live subscription, unique per hub.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub:{}", self.0)
    }
}

/// A live sequence of [`ClientEvent`]s for one subscriber.
///
/// The stream is lazy and non-restartable. It ends when the hub is closed,
/// or on overflow under [`OverflowPolicy::Disconnect`]. Dropping it
/// unsubscribes; the hub prunes the slot on its next publish.
pub struct ClientEventStream {
    id: SubscriptionId,
    inner: BroadcastStream<ClientEvent>,
    policy: OverflowPolicy,
    dropped: u64,
    finished: bool,
}

impl ClientEventStream {
    pub(crate) fn new(
        id: SubscriptionId,
        inner: BroadcastStream<ClientEvent>,
        policy: OverflowPolicy,
    ) -> Self {
        Self {
            id,
            inner,
            policy,
            dropped: 0,
            finished: false,
        }
    }

    /// Total events discarded because this subscriber fell behind.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Stream for ClientEventStream {
    type Item = ClientEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }
        loop {
            match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
                Some(Ok(event)) => return Poll::Ready(Some(event)),
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    this.dropped += skipped;
                    match this.policy {
                        OverflowPolicy::DropOldest => {
                            warn!(subscription = %this.id, skipped, "subscriber lagging, oldest events dropped");
                        }
                        OverflowPolicy::Disconnect => {
                            warn!(subscription = %this.id, skipped, "subscriber lagging, disconnecting");
                            this.finished = true;
                            return Poll::Ready(None);
                        }
                    }
                }
                None => {
                    this.finished = true;
                    return Poll::Ready(None);
                }
            }
        }
    }
}

impl std::fmt::Debug for ClientEventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientEventStream")
            .field("id", &self.id)
            .field("policy", &self.policy)
            .field("dropped", &self.dropped)
            .field("finished", &self.finished)
            .finish()
    }
}
