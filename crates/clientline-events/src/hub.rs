use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info};

use clientline_types::Client;

use crate::error::{EventError, Result};
use crate::event::{ClientEvent, ClientEventKind};
use crate::stream::{ClientEventStream, OverflowPolicy, SubscriptionId};

/// Filter selecting which channels a subscriber listens on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// If set, only events of these kinds are delivered.
    pub kinds: Option<Vec<ClientEventKind>>,
}

impl EventFilter {
    /// Listen on every channel.
    pub fn all() -> Self {
        Self::default()
    }

    /// Listen on the given channels only.
    pub fn channels(kinds: impl IntoIterator<Item = ClientEventKind>) -> Self {
        Self {
            kinds: Some(kinds.into_iter().collect()),
        }
    }

    /// Returns `true` if an event of the given kind passes this filter.
    pub fn matches(&self, kind: ClientEventKind) -> bool {
        match &self.kinds {
            Some(kinds) => kinds.contains(&kind),
            None => true,
        }
    }
}

/// Internal subscriber: a filter paired with its bounded queue.
struct Subscriber {
    id: SubscriptionId,
    filter: EventFilter,
    sender: broadcast::Sender<ClientEvent>,
}

/// Fan-out router that delivers events to matching subscribers.
struct EventRouter {
    subscribers: RwLock<Vec<Subscriber>>,
    next_seq: AtomicU64,
    /// Only flipped while `subscribers` is write-locked.
    closed: AtomicBool,
}

impl EventRouter {
    fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_seq: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Register a new subscriber with the given filter, or `None` once the
    /// router is closed.
    fn subscribe(
        &self,
        id: SubscriptionId,
        filter: EventFilter,
        capacity: usize,
    ) -> Option<broadcast::Receiver<ClientEvent>> {
        let mut subs = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if self.is_closed() {
            return None;
        }
        let (sender, rx) = broadcast::channel(capacity);
        subs.push(Subscriber { id, filter, sender });
        Some(rx)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Stamp the next sequence number and route the event to all matching
    /// subscribers. Subscribers whose streams are gone are pruned.
    ///
    /// Sequence assignment and delivery happen under one write lock, so
    /// every subscriber observes the same order.
    fn route(&self, kind: ClientEventKind, client: Client) -> (u64, usize) {
        let mut subs = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let event = ClientEvent {
            seq,
            event_type: kind,
            client_changes: client,
        };

        let mut delivered = 0;
        subs.retain(|sub| {
            if sub.sender.receiver_count() == 0 {
                debug!(subscription = %sub.id, "pruning closed subscriber");
                return false;
            }
            if sub.filter.matches(kind) && sub.sender.send(event.clone()).is_ok() {
                delivered += 1;
            }
            true
        });
        (seq, delivered)
    }

    /// Number of subscribers whose streams are still alive.
    fn live_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|sub| sub.sender.receiver_count() > 0)
            .count()
    }

    /// Mark the router closed and drop every subscriber, ending their
    /// streams. Returns `None` if it was already closed.
    fn close(&self) -> Option<usize> {
        let mut subs = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if self.closed.swap(true, Ordering::SeqCst) {
            return None;
        }
        let count = subs.len();
        subs.clear();
        Some(count)
    }
}

/// Configuration for the [`EventHub`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Capacity of each subscriber's bounded queue.
    pub channel_capacity: usize,
    /// What a subscriber's stream does when its queue overflows.
    pub overflow: OverflowPolicy,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            overflow: OverflowPolicy::DropOldest,
        }
    }
}

/// Process-local change notification hub.
///
/// Constructed explicitly and shared by `Arc`; there is no global
/// instance. Publishing never blocks and never fails: each subscriber owns a
/// bounded queue and a slow subscriber only ever loses its own events.
pub struct EventHub {
    router: EventRouter,
    config: HubConfig,
    next_subscription: AtomicU64,
}

impl EventHub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            router: EventRouter::new(),
            config,
            next_subscription: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Publish a change on the channel for `kind`.
    ///
    /// Returns the number of subscribers the event was queued for. After
    /// [`close`](Self::close) this is a no-op returning `0`.
    pub fn publish(&self, kind: ClientEventKind, client: Client) -> usize {
        if self.is_closed() {
            debug!(kind = %kind, "hub closed, event discarded");
            return 0;
        }
        let client_id = client.id;
        let (seq, delivered) = self.router.route(kind, client);
        debug!(seq, kind = %kind, client = %client_id, delivered, "event published");
        delivered
    }

    /// Register a subscriber on the channels selected by `filter`.
    ///
    /// Fails with [`EventError::Closed`] once [`close`](Self::close) has
    /// started, so no stream can outlive the hub.
    pub fn subscribe(&self, filter: EventFilter) -> Result<ClientEventStream> {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        let capacity = self.config.channel_capacity.max(1);
        let rx = self
            .router
            .subscribe(id, filter, capacity)
            .ok_or(EventError::Closed)?;
        info!(subscription = %id, live = self.subscriber_count(), "subscriber registered");
        Ok(ClientEventStream::new(
            id,
            BroadcastStream::new(rx),
            self.config.overflow,
        ))
    }

    /// Register a subscriber on every channel.
    pub fn subscribe_all(&self) -> Result<ClientEventStream> {
        self.subscribe(EventFilter::all())
    }

    /// Close the hub: every live stream ends and further subscriptions are
    /// rejected.
    pub fn close(&self) {
        if let Some(dropped) = self.router.close() {
            info!(subscribers = dropped, "event hub closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.router.is_closed()
    }

    /// Current number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.router.live_count()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("config", &self.config)
            .field("subscribers", &self.subscriber_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}
