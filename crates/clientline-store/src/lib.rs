//! Document storage for Clientline.
//!
//! The rest of the system talks to storage only through the
//! [`ClientStore`] port, so mutation handlers and the notification core can
//! be exercised without a live database.
//!
//! # Storage Backends
//!
//! - [`InMemoryClientStore`] -- `BTreeMap`-based store for tests and
//!   single-process deployments
//!
//! # Design Rules
//!
//! 1. The store assigns ids and timestamps; callers never pick them.
//! 2. Every write is validated and all-or-nothing.
//! 3. A patch (phone operations plus field changes) is one atomic write.
//! 4. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryClientStore;
pub use traits::ClientStore;
