//! GraphQL object and input types.

use async_graphql::{Enum, ErrorExtensions, InputObject, Object, SimpleObject, ID};
use chrono::{DateTime, SecondsFormat, Utc};

use clientline_service::{ClientEvent, ClientEventKind, ServiceError};
use clientline_types::{Client, ClientId, PhoneEntry, PhoneNumber, PhonePatch, ValidationResult};

/// Error code placed under `extensions.code` for every failed resolver.
pub fn error_code(err: &ServiceError) -> &'static str {
    match err {
        ServiceError::Validation(_) => "VALIDATION_ERROR",
        ServiceError::NotFound(_) => "NOT_FOUND",
        ServiceError::Store(_) => "STORE_ERROR",
        ServiceError::Events(_) => "INTERNAL_ERROR",
    }
}

pub fn to_gql_error(err: ServiceError) -> async_graphql::Error {
    let code = error_code(&err);
    async_graphql::Error::new(err.to_string()).extend_with(|_, e| e.set("code", code))
}

pub fn parse_client_id(id: &ID) -> Result<ClientId, ServiceError> {
    Ok(id.parse::<ClientId>()?)
}

fn iso(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A stored client document.
pub struct ClientNode(pub Client);

#[Object(name = "Client")]
impl ClientNode {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn client_name(&self) -> &str {
        &self.0.client_name
    }

    async fn client_last_name(&self) -> &str {
        &self.0.client_last_name
    }

    async fn cell_phones(&self) -> Option<Vec<Option<PhoneNode>>> {
        Some(self.0.cell_phones.iter().map(|p| Some(PhoneNode::from(p))).collect())
    }

    /// RFC 3339 timestamp, UTC with millisecond precision.
    async fn created_at(&self) -> String {
        iso(&self.0.created_at)
    }

    async fn updated_at(&self) -> String {
        iso(&self.0.updated_at)
    }
}

impl From<Client> for ClientNode {
    fn from(client: Client) -> Self {
        Self(client)
    }
}

#[derive(SimpleObject)]
#[graphql(name = "Phone")]
pub struct PhoneNode {
    pub number_id: ID,
    pub number: String,
}

impl From<&PhoneEntry> for PhoneNode {
    fn from(entry: &PhoneEntry) -> Self {
        Self {
            number_id: ID(entry.number_id.to_string()),
            number: entry.number.as_str().to_owned(),
        }
    }
}

/// Phone number supplied when creating a client.
#[derive(InputObject)]
pub struct PhoneInput {
    pub number: String,
}

impl PhoneInput {
    pub fn into_number(self) -> ValidationResult<PhoneNumber> {
        PhoneNumber::parse(self.number)
    }
}

/// One phone list change: `status` is `ADD`, `UPDATE` or `DELETE`.
#[derive(InputObject)]
pub struct PhoneUpdateInput {
    pub status: String,
    pub number_id: Option<String>,
    pub number: Option<String>,
}

impl PhoneUpdateInput {
    pub fn into_patch(self) -> ValidationResult<PhonePatch> {
        PhonePatch::from_parts(
            &self.status,
            self.number_id.as_deref(),
            self.number.as_deref(),
        )
    }
}

pub fn phone_numbers(inputs: Vec<PhoneInput>) -> ValidationResult<Vec<PhoneNumber>> {
    inputs.into_iter().map(PhoneInput::into_number).collect()
}

pub fn phone_patches(inputs: Vec<PhoneUpdateInput>) -> ValidationResult<Vec<PhonePatch>> {
    inputs.into_iter().map(PhoneUpdateInput::into_patch).collect()
}

#[derive(Enum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClientEventType {
    ClientAdded,
    ClientUpdated,
    ClientDeleted,
}

impl From<ClientEventKind> for ClientEventType {
    fn from(kind: ClientEventKind) -> Self {
        match kind {
            ClientEventKind::ClientAdded => Self::ClientAdded,
            ClientEventKind::ClientUpdated => Self::ClientUpdated,
            ClientEventKind::ClientDeleted => Self::ClientDeleted,
        }
    }
}

/// Payload delivered to `onClientChange` subscribers.
#[derive(SimpleObject)]
pub struct ClientChangeEvent {
    pub event_type: ClientEventType,
    pub client_changes: ClientNode,
}

impl From<ClientEvent> for ClientChangeEvent {
    fn from(event: ClientEvent) -> Self {
        Self {
            event_type: event.event_type.into(),
            client_changes: ClientNode(event.client_changes),
        }
    }
}
