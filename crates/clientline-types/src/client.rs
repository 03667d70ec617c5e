use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::identity::ClientId;
use crate::phone::{PhoneEntry, PhoneNumber, PhonePatch};

/// Minimum length, in characters, of `clientName` and `clientLastName`.
pub const MIN_NAME_LEN: usize = 2;

/// A client document as stored and as returned to API callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub client_name: String,
    pub client_last_name: String,
    pub cell_phones: Vec<PhoneEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Check the document-level constraints: both names long enough and
    /// every phone entry carrying a distinct number id.
    pub fn validate(&self) -> ValidationResult<()> {
        check_name("clientName", &self.client_name)?;
        check_name("clientLastName", &self.client_last_name)?;

        let mut seen = HashSet::with_capacity(self.cell_phones.len());
        for phone in &self.cell_phones {
            if !seen.insert(phone.number_id) {
                return Err(ValidationError::DuplicateNumberId(phone.number_id.to_string()));
            }
        }
        Ok(())
    }

    /// Refresh `updated_at`. Never moves the timestamp backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}

fn check_name(field: &'static str, value: &str) -> ValidationResult<()> {
    let actual = value.chars().count();
    if actual < MIN_NAME_LEN {
        return Err(ValidationError::TooShort {
            field,
            min: MIN_NAME_LEN,
            actual,
        });
    }
    Ok(())
}

/// Input for creating a client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewClient {
    pub client_name: String,
    pub client_last_name: String,
    pub cell_phones: Vec<PhoneNumber>,
}

impl NewClient {
    pub fn new(
        client_name: impl Into<String>,
        client_last_name: impl Into<String>,
        cell_phones: Vec<PhoneNumber>,
    ) -> Self {
        Self {
            client_name: client_name.into(),
            client_last_name: client_last_name.into(),
            cell_phones,
        }
    }

    /// Materialize the document: assign the id, stamp both timestamps and
    /// generate a number id for every phone.
    pub fn into_client(self, id: ClientId, now: DateTime<Utc>) -> Client {
        Client {
            id,
            client_name: self.client_name,
            client_last_name: self.client_last_name,
            cell_phones: self.cell_phones.into_iter().map(PhoneEntry::new).collect(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for updating a client.
///
/// `None` means "leave unchanged", which is distinct from an empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientUpdate {
    pub client_name: Option<String>,
    pub client_last_name: Option<String>,
    pub cell_phones: Vec<PhonePatch>,
}

impl ClientUpdate {
    /// Apply the update to a document: phone patches first, in submission
    /// order, then the top-level fields and the timestamp.
    ///
    /// Returns how many phone patches matched an entry.
    pub fn apply_to(&self, client: &mut Client, now: DateTime<Utc>) -> usize {
        let matched = self
            .cell_phones
            .iter()
            .filter(|patch| patch.apply(&mut client.cell_phones))
            .count();

        if let Some(name) = &self.client_name {
            client.client_name = name.clone();
        }
        if let Some(last_name) = &self.client_last_name {
            client.client_last_name = last_name.clone();
        }
        client.touch(now);
        matched
    }
}
