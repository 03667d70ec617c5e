//! Mutation and query handlers for Clientline.
//!
//! [`ClientService`] is the single entry point request handlers use: it
//! writes through the [`ClientStore`](clientline_store::ClientStore) port
//! and, on success, publishes the matching change event on the
//! [`EventHub`](clientline_events::EventHub).

pub mod error;
pub mod service;

pub use error::{OptionalExt, ServiceError, ServiceResult};
pub use service::ClientService;

// Re-export key types
pub use clientline_events::{ClientEvent, ClientEventKind, ClientEventStream, EventFilter, EventHub, HubConfig};
pub use clientline_types::{Client, ClientId, ClientUpdate, NewClient, PhoneEntry, PhoneNumber, PhonePatch};
