use serde::{Deserialize, Serialize};

use clientline_types::Client;

/// The channel an event is published on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientEventKind {
    /// A client was created.
    ClientAdded,
    /// A client's fields or phone list changed.
    ClientUpdated,
    /// A client was removed.
    ClientDeleted,
}

impl ClientEventKind {
    /// Every channel, in publication-type order.
    pub const ALL: [ClientEventKind; 3] = [
        ClientEventKind::ClientAdded,
        ClientEventKind::ClientUpdated,
        ClientEventKind::ClientDeleted,
    ];

    /// The channel name as seen on the wire.
    pub fn channel(&self) -> &'static str {
        match self {
            Self::ClientAdded => "CLIENT_ADDED",
            Self::ClientUpdated => "CLIENT_UPDATED",
            Self::ClientDeleted => "CLIENT_DELETED",
        }
    }
}

impl std::fmt::Display for ClientEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.channel())
    }
}

/// A change notification delivered to subscribers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEvent {
    /// Hub-assigned sequence number. Strictly increasing in publication
    /// order; every subscriber sees events in this order.
    pub seq: u64,
    /// The channel the event was published on.
    pub event_type: ClientEventKind,
    /// The affected document: the new state for adds and updates, the last
    /// known state for deletes.
    pub client_changes: Client,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use clientline_types::{ClientId, NewClient};

    #[test]
    fn kind_display_matches_channel_names() {
        assert_eq!(format!("{}", ClientEventKind::ClientAdded), "CLIENT_ADDED");
        assert_eq!(format!("{}", ClientEventKind::ClientUpdated), "CLIENT_UPDATED");
        assert_eq!(format!("{}", ClientEventKind::ClientDeleted), "CLIENT_DELETED");
    }

    #[test]
    fn kind_serializes_as_channel_name() {
        for kind in ClientEventKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.channel()));
        }
    }

    #[test]
    fn event_wire_shape() {
        let client = NewClient::new("Ana", "Lopez", vec![])
            .into_client(ClientId::generate(), Utc::now());
        let event = ClientEvent {
            seq: 1,
            event_type: ClientEventKind::ClientDeleted,
            client_changes: client,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["eventType"], "CLIENT_DELETED");
        assert_eq!(json["clientChanges"]["clientName"], "Ana");
    }
}
