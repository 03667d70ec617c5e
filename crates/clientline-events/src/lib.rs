//! Change notification hub for Clientline.
//!
//! Every successful create, update or delete is published to an
//! [`EventHub`], which fans it out to the subscribers listening on that
//! channel. Each subscriber reads from its own bounded queue through a
//! [`ClientEventStream`]; what happens when the queue overflows is chosen by
//! [`OverflowPolicy`].

pub mod error;
pub mod event;
pub mod hub;
pub mod stream;

pub use error::EventError;
pub use event::{ClientEvent, ClientEventKind};
pub use hub::{EventFilter, EventHub, HubConfig};
pub use stream::{ClientEventStream, OverflowPolicy, SubscriptionId};
