/// Errors produced by the event hub.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EventError {
    /// The hub has been closed and accepts no new subscribers.
    #[error("event hub is closed")]
    Closed,
}

/// Convenience alias used throughout the events crate.
pub type Result<T> = std::result::Result<T, EventError>;
