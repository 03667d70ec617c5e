//! Foundation types for Clientline.
//!
//! This crate provides the document, identifier and input types shared by
//! every other Clientline crate, together with the field-level validation
//! rules the store enforces.
//!
//! # Key Types
//!
//! - [`Client`]: a client document with names, phone list and timestamps
//! - [`PhoneEntry`]: one phone number with its stable [`NumberId`]
//! - [`ClientId`]: store-assigned, time-ordered document identifier
//! - [`NewClient`] / [`ClientUpdate`]: mutation inputs
//! - [`PhonePatch`]: a single add/update/delete against the phone list

pub mod client;
pub mod error;
pub mod identity;
pub mod phone;

pub use client::{Client, ClientUpdate, NewClient, MIN_NAME_LEN};
pub use error::{ValidationError, ValidationResult};
pub use identity::{ClientId, NumberId};
pub use phone::{PhoneEntry, PhoneNumber, PhonePatch, PhoneStatus};
